//! Dry run of the per-bidder pipeline: activity gate, then the default
//! post-processor chain.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use bidguard_common::activity::debug::TraceEntry;
use bidguard_common::activity::{Activity, ActivityInvocationPayload, ComponentType};
use bidguard_common::gpp::{ConsentModel, GppModel};
use bidguard_common::openrtb::BidRequest;
use bidguard_common::postprocess::{
    AuctionContext, BidRejectionReason, BidderCatalog, BidderError, BidderRequest,
    BidderRequestPostProcessor, CompositeBidderRequestPostProcessor, PostProcessOutcome,
};
use bidguard_common::settings::Settings;
use bidguard_common::targeting::RequestContext;
use serde::Serialize;

use crate::config::{build_infrastructure, load_settings};
use crate::error::CliError;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub(crate) enum BidderOutcome {
    /// The `fetchBids` activity was denied.
    Blocked,
    Rejected {
        reason: BidRejectionReason,
        errors: Vec<BidderError>,
    },
    Accepted {
        errors: Vec<BidderError>,
        request: BidRequest,
    },
    /// The chain failed outside its rejection contract.
    Failed { error: String },
}

#[derive(Debug, Serialize)]
pub(crate) struct BidderReport {
    pub bidder: String,
    #[serde(flatten)]
    pub outcome: BidderOutcome,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<TraceEntry>,
}

/// Run every bidder in `bidders` (or every catalog bidder when empty)
/// through the gate and the chain.
pub(crate) fn evaluate_bidders(
    settings: &Settings,
    request: BidRequest,
    consent: Option<&GppModel>,
    bidders: &[String],
) -> Result<Vec<BidderReport>, CliError> {
    let infrastructure = build_infrastructure(settings)?;
    let catalog: Arc<dyn BidderCatalog> = Arc::new(settings.bidder_catalog());
    let aliases = settings.bidder_aliases();
    let chain = CompositeBidderRequestPostProcessor::with_default_chain(catalog);
    let context = AuctionContext {
        account: &settings.account,
    };
    let consent = consent.map(|model| model as &dyn ConsentModel);

    let bidders: Vec<String> = if bidders.is_empty() {
        let mut names: Vec<String> = settings.bidders.keys().cloned().collect();
        names.sort();
        names
    } else {
        bidders.to_vec()
    };

    let request = Arc::new(request);
    let mut reports = Vec::with_capacity(bidders.len());
    for bidder in bidders {
        let mut payload = ActivityInvocationPayload::new(ComponentType::Bidder, bidder.as_str());
        if let Some(imp) = request.imp.first() {
            payload = payload.with_request(&RequestContext::new(&request, imp));
        }

        let mut debug = infrastructure.new_debug();
        let allowed = infrastructure.evaluate(Activity::CallBidder, &payload, consent, &mut debug);
        let trace = debug.trace().to_vec();
        if !allowed {
            log::info!("Bidder {bidder} blocked by activity rules");
            reports.push(BidderReport {
                bidder,
                outcome: BidderOutcome::Blocked,
                trace,
            });
            continue;
        }

        let outcome = match chain.process(
            BidderRequest::new(bidder.as_str(), Arc::clone(&request)),
            &aliases,
            &context,
        ) {
            Ok(PostProcessOutcome::Continue(result)) => BidderOutcome::Accepted {
                errors: result.errors,
                request: result.value.bid_request.as_ref().clone(),
            },
            Ok(PostProcessOutcome::Reject(rejection)) => BidderOutcome::Rejected {
                reason: rejection.reason,
                errors: rejection.errors,
            },
            Err(report) => {
                log::error!("Bidder {bidder} failed: {report:?}");
                BidderOutcome::Failed {
                    error: report.current_context().to_string(),
                }
            }
        };
        reports.push(BidderReport {
            bidder,
            outcome,
            trace,
        });
    }

    Ok(reports)
}

/// Load the inputs from disk, evaluate and print the reports as JSON.
pub fn run(
    settings_file: &Path,
    request_file: &Path,
    gpp_file: Option<&Path>,
    bidders: &[String],
) -> Result<(), CliError> {
    let settings = load_settings(settings_file)?;

    let body = fs::read(request_file)?;
    let request = BidRequest::from_slice(&body)
        .map_err(|e| CliError::Input(format!("{}: {e:?}", request_file.display())))?;

    let consent: Option<GppModel> = match gpp_file {
        Some(path) => Some(serde_json::from_slice(&fs::read(path)?)?),
        None => None,
    };

    let reports = evaluate_bidders(&settings, request, consent.as_ref(), bidders)?;
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn settings() -> Settings {
        Settings::from_toml(
            r#"
[account.auction.preferredmediatypes]
rubicon = "video"

[bidders.rubicon]
multiformat_supported = false
capabilities.site.mediatypes = ["banner", "video"]

[bidders.appnexus]
accepted_currencies = ["EUR"]
capabilities.site.mediatypes = ["banner"]

[bidders.openx]
capabilities.site.mediatypes = ["banner"]

[privacy]
trace = "basic"

[[privacy.activities.fetchBids.rules]]
allow = false
condition = { component_name = ["openx"] }
"#,
        )
        .expect("should parse settings")
    }

    fn request() -> BidRequest {
        serde_json::from_value(json!({
            "id": "req-1",
            "cur": ["USD"],
            "site": {"domain": "example.com"},
            "imp": [{"id": "1", "banner": {"format": [{"w": 300, "h": 250}]}, "video": {}}]
        }))
        .expect("should parse request")
    }

    #[test]
    fn test_each_bidder_gets_its_own_outcome() {
        let reports =
            evaluate_bidders(&settings(), request(), None, &[]).expect("should evaluate");

        let names: Vec<&str> = reports.iter().map(|r| r.bidder.as_str()).collect();
        assert_eq!(names, vec!["appnexus", "openx", "rubicon"]);

        assert!(matches!(
            reports[0].outcome,
            BidderOutcome::Rejected {
                reason: BidRejectionReason::RequestBlockedUnacceptableCurrency,
                ..
            }
        ));
        assert!(matches!(reports[1].outcome, BidderOutcome::Blocked));
        assert!(!reports[1].trace.is_empty(), "Basic trace should be recorded");

        let BidderOutcome::Accepted { request, .. } = &reports[2].outcome else {
            panic!("rubicon should be accepted");
        };
        assert!(request.imp[0].video.is_some());
        assert!(
            request.imp[0].banner.is_none(),
            "Preferred video should strip the banner"
        );
    }

    #[test]
    fn test_failing_bidder_does_not_affect_siblings() {
        let bidders = ["openx".to_string(), "ghost".to_string()];
        let reports =
            evaluate_bidders(&settings(), request(), None, &bidders).expect("should evaluate");

        assert_eq!(reports.len(), 2);
        assert!(matches!(reports[0].outcome, BidderOutcome::Blocked));
        let BidderOutcome::Failed { error } = &reports[1].outcome else {
            panic!("ghost should fail: {:?}", reports[1].outcome);
        };
        assert!(error.contains("ghost"), "Error should name the bidder: {error}");

        let value = serde_json::to_value(&reports).expect("should serialize");
        assert_eq!(value[1]["status"], "failed");
    }

    #[test]
    fn test_report_serializes_with_status_tag() {
        let reports = evaluate_bidders(&settings(), request(), None, &["openx".to_string()])
            .expect("should evaluate");

        let value = serde_json::to_value(&reports).expect("should serialize");
        assert_eq!(value[0]["bidder"], "openx");
        assert_eq!(value[0]["status"], "blocked");
    }
}
