use std::collections::BTreeMap;

use error_stack::Report;

use crate::error::BidGuardError;
use crate::openrtb::{
    AlternateBidderCodes, BidAdjustmentFactors, BidAdjustments, ExtRequestPrebid,
};

use super::bidder::BidderAliases;
use super::{AuctionContext, BidderRequest, BidderRequestPostProcessor, PostProcessOutcome};

/// Removes auction-wide `ext.prebid` data a single bidder must not see.
///
/// Bidder-keyed maps are narrowed to the bidder's own entry (keys compared
/// without regard to case) and server-only fields are dropped. Running the
/// cleaner on its own output is a no-op that keeps the same request.
#[derive(Debug, Default)]
pub struct BidderRequestCleaner;

impl BidderRequestCleaner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn retain_bidder<V>(entries: &mut BTreeMap<String, V>, bidder: &str) {
    entries.retain(|key, _| key.eq_ignore_ascii_case(bidder));
}

fn clean_adjustment_factors(
    factors: Option<BidAdjustmentFactors>,
    bidder: &str,
) -> Option<BidAdjustmentFactors> {
    let mut factors = factors?;
    retain_bidder(&mut factors.bidders, bidder);
    factors.mediatypes = factors.mediatypes.and_then(|mut mediatypes| {
        for per_bidder in mediatypes.values_mut() {
            retain_bidder(per_bidder, bidder);
        }
        mediatypes.retain(|_, per_bidder| !per_bidder.is_empty());
        (!mediatypes.is_empty()).then_some(mediatypes)
    });

    (factors.mediatypes.is_some() || !factors.bidders.is_empty()).then_some(factors)
}

fn clean_adjustments(adjustments: Option<BidAdjustments>, bidder: &str) -> Option<BidAdjustments> {
    let mut adjustments = adjustments?;
    for per_bidder in adjustments.mediatype.values_mut() {
        retain_bidder(per_bidder, bidder);
    }
    adjustments
        .mediatype
        .retain(|_, per_bidder| !per_bidder.is_empty());

    (!adjustments.mediatype.is_empty()).then_some(adjustments)
}

fn clean_alternate_codes(
    codes: Option<AlternateBidderCodes>,
    bidder: &str,
) -> Option<AlternateBidderCodes> {
    let mut codes = codes?;
    codes.bidders = codes.bidders.and_then(|mut bidders| {
        retain_bidder(&mut bidders, bidder);
        (!bidders.is_empty()).then_some(bidders)
    });

    (codes.enabled.is_some() || codes.bidders.is_some()).then_some(codes)
}

fn clean_prebid(prebid: &ExtRequestPrebid, bidder: &str) -> ExtRequestPrebid {
    let prebid = prebid.clone();
    ExtRequestPrebid {
        bidadjustmentfactors: clean_adjustment_factors(prebid.bidadjustmentfactors, bidder),
        bidadjustments: clean_adjustments(prebid.bidadjustments, bidder),
        alternatebiddercodes: clean_alternate_codes(prebid.alternatebiddercodes, bidder),
        biddercontrols: None,
        returnallbidstatus: None,
        aliasgvlids: None,
        targeting: None,
        cache: None,
        events: None,
        nosale: None,
        analytics: None,
        passthrough: None,
        kvps: None,
        extra: prebid.extra,
    }
}

impl BidderRequestPostProcessor for BidderRequestCleaner {
    fn name(&self) -> &'static str {
        "cleaner"
    }

    fn process(
        &self,
        request: BidderRequest,
        _aliases: &dyn BidderAliases,
        _context: &AuctionContext<'_>,
    ) -> Result<PostProcessOutcome, Report<BidGuardError>> {
        let Some(prebid) = request.bid_request.ext_prebid() else {
            return Ok(PostProcessOutcome::pass_through(request));
        };

        let cleaned = clean_prebid(prebid, &request.bidder);
        if &cleaned == prebid {
            return Ok(PostProcessOutcome::pass_through(request));
        }

        log::debug!("Cleaned ext.prebid for bidder {}", request.bidder);
        let mut bid_request = request.bid_request.as_ref().clone();
        if let Some(ext) = bid_request.ext.as_mut() {
            ext.prebid = Some(cleaned);
        }
        Ok(PostProcessOutcome::pass_through(
            request.with_bid_request(bid_request),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::postprocess::tests::{bidder_request, expect_continue, no_aliases};
    use crate::settings::Account;

    use super::*;

    fn clean(request: BidderRequest) -> BidderRequest {
        let account = Account::default();
        let outcome = BidderRequestCleaner::new()
            .process(request, &no_aliases(), &AuctionContext { account: &account })
            .expect("should process");
        let result = expect_continue(outcome);
        assert!(result.errors.is_empty(), "Cleaning never warns");
        result.value
    }

    #[test]
    fn test_narrows_bidder_scoped_maps() {
        let request = bidder_request(
            "rubicon",
            json!({
                "ext": {"prebid": {
                    "bidadjustmentfactors": {
                        "Rubicon": 0.9,
                        "appnexus": 0.8,
                        "mediatypes": {
                            "banner": {"rubicon": 0.7, "appnexus": 0.6},
                            "video": {"appnexus": 0.5}
                        }
                    },
                    "bidadjustments": {"mediatype": {
                        "banner": {"rubicon": {"*": []}, "appnexus": {"*": []}},
                        "video": {"appnexus": {"*": []}}
                    }},
                    "alternatebiddercodes": {
                        "enabled": true,
                        "bidders": {"rubicon": {"enabled": true}, "pubmatic": {"enabled": true}}
                    },
                    "debug": true
                }}
            }),
        );

        let cleaned = clean(request);
        let prebid = serde_json::to_value(cleaned.bid_request.ext_prebid())
            .expect("should serialize");

        assert_eq!(
            prebid,
            json!({
                "bidadjustmentfactors": {
                    "Rubicon": 0.9,
                    "mediatypes": {"banner": {"rubicon": 0.7}}
                },
                "bidadjustments": {"mediatype": {"banner": {"rubicon": {"*": []}}}},
                "alternatebiddercodes": {"enabled": true, "bidders": {"rubicon": {"enabled": true}}},
                "debug": true
            })
        );
    }

    #[test]
    fn test_strips_server_only_fields_and_empty_containers() {
        let request = bidder_request(
            "rubicon",
            json!({
                "ext": {"prebid": {
                    "bidadjustmentfactors": {"appnexus": 0.8},
                    "bidadjustments": {"mediatype": {"banner": {"appnexus": {}}}},
                    "alternatebiddercodes": {"bidders": {"appnexus": {}}},
                    "returnallbidstatus": true,
                    "aliasgvlids": {"alias": 1},
                    "targeting": {},
                    "cache": {"bids": {}},
                    "events": {},
                    "nosale": ["rubicon"],
                    "biddercontrols": {"rubicon": {"prefmtype": "video"}},
                    "analytics": {},
                    "passthrough": {},
                    "kvps": {}
                }}
            }),
        );

        let cleaned = clean(request);

        assert_eq!(
            cleaned.bid_request.ext_prebid(),
            Some(&ExtRequestPrebid::default())
        );
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let request = bidder_request(
            "rubicon",
            json!({"ext": {"prebid": {
                "bidadjustmentfactors": {"rubicon": 0.9, "appnexus": 0.8},
                "returnallbidstatus": true
            }}}),
        );

        let once = clean(request);
        let snapshot = Arc::clone(&once.bid_request);
        let twice = clean(once);

        assert!(
            Arc::ptr_eq(&snapshot, &twice.bid_request),
            "Already clean request should be handed back unchanged"
        );
    }

    #[test]
    fn test_request_without_prebid_ext_is_same_arc() {
        let request = bidder_request("rubicon", json!({"id": "1"}));
        let original = Arc::clone(&request.bid_request);

        let cleaned = clean(request);

        assert!(Arc::ptr_eq(&original, &cleaned.bid_request));
    }
}
