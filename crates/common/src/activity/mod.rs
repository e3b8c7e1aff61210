//! Activity gate: decides whether a component may perform a data-processing
//! activity for the current request.
//!
//! - [`config`]: serde configuration of activities, rules and privacy modules
//! - [`rule`]: condition rules and privacy-module rules
//! - [`usnat`]: the `iab.usgeneral` privacy module over US GPP sections
//! - [`debug`]: optional invocation trace
//! - [`infrastructure`]: the compiled gate

use std::fmt;
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::error::BidGuardError;
use crate::gpp::ConsentModel;
use crate::targeting::{RequestContext, TargetingCategory, TargetingCategoryType};

pub mod config;
pub mod debug;
pub mod infrastructure;
pub mod rule;
pub mod usnat;

pub use config::{ActivityConfig, PrivacyConfig};
pub use debug::{ActivityDebug, TraceLevel};
pub use infrastructure::ActivityInfrastructure;

/// A gateable data-processing action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Activity {
    #[serde(rename = "syncUser")]
    SyncUser,
    #[serde(rename = "fetchBids")]
    CallBidder,
    #[serde(rename = "enrichUfpd")]
    EnrichUfpd,
    #[serde(rename = "reportAnalytics")]
    ReportAnalytics,
    #[serde(rename = "transmitUfpd")]
    TransmitUfpd,
    #[serde(rename = "transmitEids")]
    TransmitEids,
    #[serde(rename = "transmitPreciseGeo")]
    TransmitPreciseGeo,
    #[serde(rename = "transmitTid")]
    TransmitTid,
}

impl Activity {
    pub const ALL: [Activity; 8] = [
        Self::SyncUser,
        Self::CallBidder,
        Self::EnrichUfpd,
        Self::ReportAnalytics,
        Self::TransmitUfpd,
        Self::TransmitEids,
        Self::TransmitPreciseGeo,
        Self::TransmitTid,
    ];

    /// Name used in configuration.
    #[must_use]
    pub fn config_name(&self) -> &'static str {
        match self {
            Self::SyncUser => "syncUser",
            Self::CallBidder => "fetchBids",
            Self::EnrichUfpd => "enrichUfpd",
            Self::ReportAnalytics => "reportAnalytics",
            Self::TransmitUfpd => "transmitUfpd",
            Self::TransmitEids => "transmitEids",
            Self::TransmitPreciseGeo => "transmitPreciseGeo",
            Self::TransmitTid => "transmitTid",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_name())
    }
}

impl FromStr for Activity {
    type Err = Report<BidGuardError>;

    /// Config names compare without regard to ASCII case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|activity| activity.config_name().eq_ignore_ascii_case(value))
            .ok_or_else(|| {
                Report::new(BidGuardError::configuration(format!(
                    "Unknown activity '{value}'"
                )))
            })
    }
}

/// Kind of component asking to perform an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Bidder,
    Analytics,
    Userid,
    Rtd,
    General,
}

impl ComponentType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bidder => "bidder",
            Self::Analytics => "analytics",
            Self::Userid => "userid",
            Self::Rtd => "rtd",
            Self::General => "general",
        }
    }
}

/// Result of a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleResult {
    Allow,
    Disallow,
    Abstain,
}

impl RuleResult {
    #[must_use]
    pub fn from_allow(allow: bool) -> Self {
        if allow {
            Self::Allow
        } else {
            Self::Disallow
        }
    }
}

/// Country and optional region the request originates from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoScope {
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Who is asking, plus the request facts rules may condition on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityInvocationPayload {
    pub component_type: ComponentType,
    pub component_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpp_sid: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoScope>,
}

impl ActivityInvocationPayload {
    pub fn new(component_type: ComponentType, component_name: impl Into<String>) -> Self {
        Self {
            component_type,
            component_name: component_name.into(),
            gpp_sid: None,
            geo: None,
        }
    }

    /// Adds the GPP scope (`regs.gpp_sid`) and device geo of the request.
    #[must_use]
    pub fn with_request(mut self, context: &RequestContext<'_>) -> Self {
        self.gpp_sid = context
            .bid_request()
            .regs
            .as_ref()
            .and_then(|regs| regs.gpp_sid.clone());

        let country = lookup_geo(context, TargetingCategoryType::DeviceGeoCountry);
        self.geo = country.map(|country| GeoScope {
            country,
            region: lookup_geo(context, TargetingCategoryType::DeviceGeoRegion),
        });
        self
    }
}

fn lookup_geo(context: &RequestContext<'_>, category_type: TargetingCategoryType) -> Option<String> {
    let category = TargetingCategory::new(category_type).ok()?;
    context
        .lookup_string(&category)
        .ok()
        .flatten()
        .map(str::to_string)
}

/// Request-scoped inputs of one gate evaluation.
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    pub activity: Activity,
    pub payload: &'a ActivityInvocationPayload,
    pub consent: Option<&'a dyn ConsentModel>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::openrtb::BidRequest;

    use super::*;

    #[test]
    fn test_activity_names_parse_ignoring_case() {
        assert_eq!("fetchBids".parse::<Activity>().ok(), Some(Activity::CallBidder));
        assert_eq!(
            "transmitprecisegeo".parse::<Activity>().ok(),
            Some(Activity::TransmitPreciseGeo)
        );

        let err = "sellEverything".parse::<Activity>().expect_err("should fail");
        assert!(matches!(
            err.current_context(),
            BidGuardError::Configuration { .. }
        ));
        assert!(err.to_string().contains("sellEverything"));
    }

    #[test]
    fn test_payload_picks_up_request_scope_and_geo() {
        let request: BidRequest = serde_json::from_value(json!({
            "imp": [{"id": "1"}],
            "device": {"geo": {"country": "USA", "region": "CA"}},
            "regs": {"gpp_sid": [8]}
        }))
        .expect("should parse");
        let context = RequestContext::new(&request, &request.imp[0]);

        let payload =
            ActivityInvocationPayload::new(ComponentType::Bidder, "rubicon").with_request(&context);

        assert_eq!(payload.gpp_sid, Some(vec![8]));
        assert_eq!(
            payload.geo,
            Some(GeoScope {
                country: "USA".to_string(),
                region: Some("CA".to_string()),
            })
        );
    }

    #[test]
    fn test_payload_without_country_has_no_geo() {
        let request: BidRequest = serde_json::from_value(json!({
            "imp": [{"id": "1"}],
            "device": {"geo": {"region": "CA"}}
        }))
        .expect("should parse");
        let context = RequestContext::new(&request, &request.imp[0]);

        let payload =
            ActivityInvocationPayload::new(ComponentType::Bidder, "rubicon").with_request(&context);

        assert_eq!(payload.geo, None);
        assert_eq!(payload.gpp_sid, None);
    }
}
