//! Error types shared by the privacy engine, targeting lookups and the
//! bidder-request post-processing chain.
//!
//! Errors are always carried inside an [`error_stack::Report`] so callers can
//! attach context as they propagate. Expected outcomes such as a bidder being
//! rejected for an unacceptable currency are *not* errors; see
//! [`crate::postprocess::PostProcessOutcome`].

use derive_more::Display;

/// Errors raised by the core.
#[derive(Debug, Display)]
pub enum BidGuardError {
    /// Settings or activity configuration could not be loaded or is invalid.
    #[display("Configuration error: {message}")]
    Configuration { message: String },

    /// A targeting category was malformed or used with the wrong lookup.
    #[display("Targeting syntax error: {message}")]
    TargetingSyntax { message: String },

    /// The bidder catalog has no usable entry for a bidder.
    #[display("Bidder catalog error: {message}")]
    BidderCatalog { message: String },

    /// A post-processing stage failed outside its rejection contract.
    #[display("Post-processing failed for bidder {bidder}: {message}")]
    PostProcessing { bidder: String, message: String },

    /// The inbound request could not be parsed or is malformed.
    #[display("Invalid request: {message}")]
    InvalidRequest { message: String },
}

impl core::error::Error for BidGuardError {}

impl BidGuardError {
    /// Shorthand for a [`BidGuardError::TargetingSyntax`] error.
    pub(crate) fn targeting_syntax(message: impl Into<String>) -> Self {
        Self::TargetingSyntax {
            message: message.into(),
        }
    }

    /// Shorthand for a [`BidGuardError::Configuration`] error.
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use error_stack::Report;

    use super::*;

    #[test]
    fn test_display_includes_message() {
        let err = BidGuardError::targeting_syntax("Unexpected category");
        assert_eq!(
            err.to_string(),
            "Targeting syntax error: Unexpected category"
        );

        let err = BidGuardError::PostProcessing {
            bidder: "rubicon".to_string(),
            message: "catalog lookup failed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Post-processing failed for bidder rubicon: catalog lookup failed"
        );
    }

    #[test]
    fn test_report_keeps_current_context() {
        let report = Report::new(BidGuardError::configuration("unknown activity 'foo'"));
        assert!(
            format!("{report:?}").contains("unknown activity 'foo'"),
            "Report debug output should carry the message"
        );
        assert!(matches!(
            report.current_context(),
            BidGuardError::Configuration { .. }
        ));
    }
}
