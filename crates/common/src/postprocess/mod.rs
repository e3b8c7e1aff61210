//! Per-bidder request post-processing.
//!
//! Before a bid request goes to a bidder adapter it runs through an ordered
//! chain of post-processors. Each stage either hands a (possibly replaced)
//! request on to the next stage together with warnings, or rejects the
//! bidder with a typed reason. A stage returning `Err` is a hard failure for
//! that bidder only.
//!
//! - [`bidder`]: bidder catalog and alias lookups
//! - [`currency`]: currency blocker
//! - [`media_type`]: media type filter
//! - [`preferred_media`]: preferred media type selector
//! - [`cleaner`]: bidder-scoped `ext.prebid` cleanup
//! - [`composite`]: the chain runner

use std::sync::Arc;

use error_stack::Report;
use serde::Serialize;

use crate::error::BidGuardError;
use crate::openrtb::BidRequest;
use crate::settings::Account;

pub mod bidder;
pub mod cleaner;
pub mod composite;
pub mod currency;
pub mod media_type;
pub mod preferred_media;

pub use bidder::{BidderAliases, BidderCatalog, BidderInfo, Channel};
pub use cleaner::BidderRequestCleaner;
pub use composite::CompositeBidderRequestPostProcessor;
pub use currency::BidderRequestCurrencyBlocker;
pub use media_type::BidderRequestMediaFilter;
pub use preferred_media::BidderRequestPreferredMediaProcessor;

/// Message attached when filtering leaves a request without impressions.
pub(crate) const NO_IMPRESSIONS_AFTER_FILTERING: &str =
    "Bid request contains 0 impressions after filtering.";

/// An OpenRTB request scoped to one bidder.
///
/// Stages replace `bid_request` with a new `Arc` when they change it and hand
/// the same `Arc` back when they do not.
#[derive(Debug, Clone)]
pub struct BidderRequest {
    pub bidder: String,
    pub bid_request: Arc<BidRequest>,
}

impl BidderRequest {
    pub fn new(bidder: impl Into<String>, bid_request: impl Into<Arc<BidRequest>>) -> Self {
        Self {
            bidder: bidder.into(),
            bid_request: bid_request.into(),
        }
    }

    /// Same bidder, new request body.
    #[must_use]
    pub fn with_bid_request(self, bid_request: BidRequest) -> Self {
        Self {
            bidder: self.bidder,
            bid_request: Arc::new(bid_request),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BidderErrorKind {
    Generic,
    BadInput,
}

/// A non-fatal problem reported for one bidder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BidderError {
    pub kind: BidderErrorKind,
    pub message: String,
}

impl BidderError {
    pub fn generic(message: impl Into<String>) -> Self {
        Self {
            kind: BidderErrorKind::Generic,
            message: message.into(),
        }
    }

    pub fn bad_input(message: impl Into<String>) -> Self {
        Self {
            kind: BidderErrorKind::BadInput,
            message: message.into(),
        }
    }
}

/// Why a bidder was dropped from the auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BidRejectionReason {
    RequestBlockedUnacceptableCurrency,
    RequestBlockedUnsupportedMediaType,
}

/// Request handed to the next stage plus the warnings collected so far.
#[derive(Debug, Clone)]
pub struct BidderRequestPostProcessingResult {
    pub value: BidderRequest,
    pub errors: Vec<BidderError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BidderRequestRejection {
    pub reason: BidRejectionReason,
    pub errors: Vec<BidderError>,
}

#[derive(Debug, Clone)]
pub enum PostProcessOutcome {
    Continue(BidderRequestPostProcessingResult),
    Reject(BidderRequestRejection),
}

impl PostProcessOutcome {
    /// Continue with `value` unchanged and no warnings.
    #[must_use]
    pub fn pass_through(value: BidderRequest) -> Self {
        Self::proceed(value, Vec::new())
    }

    #[must_use]
    pub fn proceed(value: BidderRequest, errors: Vec<BidderError>) -> Self {
        Self::Continue(BidderRequestPostProcessingResult { value, errors })
    }

    #[must_use]
    pub fn reject(reason: BidRejectionReason, errors: Vec<BidderError>) -> Self {
        Self::Reject(BidderRequestRejection { reason, errors })
    }
}

/// Auction-wide data a stage may consult. Already resolved; stages never
/// fetch anything.
#[derive(Debug, Clone, Copy)]
pub struct AuctionContext<'a> {
    pub account: &'a Account,
}

/// One stage of the bidder request chain.
pub trait BidderRequestPostProcessor: Send + Sync {
    /// Short identifier used in logs and error context.
    fn name(&self) -> &'static str;

    /// Process one bidder's request.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures outside the rejection contract,
    /// such as a bidder missing from the catalog.
    fn process(
        &self,
        request: BidderRequest,
        aliases: &dyn BidderAliases,
        context: &AuctionContext<'_>,
    ) -> Result<PostProcessOutcome, Report<BidGuardError>>;
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use serde_json::{json, Value};

    use super::bidder::{StaticBidderAliases, StaticBidderCatalog};
    use super::*;

    pub(crate) fn bid_request(value: Value) -> BidRequest {
        serde_json::from_value(value).expect("should parse bid request")
    }

    pub(crate) fn bidder_request(bidder: &str, value: Value) -> BidderRequest {
        BidderRequest::new(bidder, bid_request(value))
    }

    pub(crate) fn catalog(entries: Value) -> Arc<StaticBidderCatalog> {
        let bidders: HashMap<String, BidderInfo> =
            serde_json::from_value(entries).expect("should parse bidder catalog");
        Arc::new(StaticBidderCatalog::new(bidders))
    }

    pub(crate) fn no_aliases() -> StaticBidderAliases {
        StaticBidderAliases::default()
    }

    pub(crate) fn expect_continue(outcome: PostProcessOutcome) -> BidderRequestPostProcessingResult {
        match outcome {
            PostProcessOutcome::Continue(result) => result,
            PostProcessOutcome::Reject(rejection) => {
                panic!("expected the request to continue, got {rejection:?}")
            }
        }
    }

    pub(crate) fn expect_reject(outcome: PostProcessOutcome) -> BidderRequestRejection {
        match outcome {
            PostProcessOutcome::Reject(rejection) => rejection,
            PostProcessOutcome::Continue(result) => {
                panic!("expected a rejection, got {:?}", result.value.bid_request)
            }
        }
    }

    pub(crate) fn messages(errors: &[BidderError]) -> Vec<&str> {
        errors.iter().map(|error| error.message.as_str()).collect()
    }

    #[test]
    fn test_rejection_reason_serializes_as_code() {
        assert_eq!(
            serde_json::to_value(BidRejectionReason::RequestBlockedUnacceptableCurrency)
                .expect("should serialize"),
            json!("REQUEST_BLOCKED_UNACCEPTABLE_CURRENCY")
        );
        assert_eq!(
            serde_json::to_value(BidRejectionReason::RequestBlockedUnsupportedMediaType)
                .expect("should serialize"),
            json!("REQUEST_BLOCKED_UNSUPPORTED_MEDIA_TYPE")
        );
    }

    #[test]
    fn test_with_bid_request_keeps_bidder() {
        let request = bidder_request("rubicon", json!({"id": "1"}));
        let original = Arc::clone(&request.bid_request);

        let replaced = request.with_bid_request(BidRequest {
            id: "2".to_string(),
            ..BidRequest::default()
        });

        assert_eq!(replaced.bidder, "rubicon");
        assert_eq!(replaced.bid_request.id, "2");
        assert!(!Arc::ptr_eq(&original, &replaced.bid_request));
    }
}
