use std::sync::Arc;

use error_stack::Report;
use serde_json::Value;

use crate::error::BidGuardError;
use crate::openrtb::{BidRequest, Imp, MediaType};

use super::bidder::{require_bidder_info, BidderAliases, BidderCatalog};
use super::{
    AuctionContext, BidRejectionReason, BidderError, BidderRequest, BidderRequestPostProcessor,
    PostProcessOutcome, NO_IMPRESSIONS_AFTER_FILTERING,
};

/// Narrows multi-format impressions to the preferred media type for bidders
/// that cannot take several formats at once.
pub struct BidderRequestPreferredMediaProcessor {
    catalog: Arc<dyn BidderCatalog>,
}

impl BidderRequestPreferredMediaProcessor {
    #[must_use]
    pub fn new(catalog: Arc<dyn BidderCatalog>) -> Self {
        Self { catalog }
    }
}

/// `ext.prebid.biddercontrols.<bidder>.prefmtype`, matching the bidder key
/// without regard to case.
fn requested_media_type(bid_request: &BidRequest, bidder: &str) -> Option<MediaType> {
    let controls = bid_request.ext_prebid()?.biddercontrols.as_ref()?.as_object()?;
    let (_, control) = controls
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(bidder))?;

    let value = control.get("prefmtype").and_then(Value::as_str)?;
    let media_type = MediaType::parse(value);
    if media_type.is_none() {
        log::debug!("Ignoring unknown prefmtype '{value}' for bidder {bidder}");
    }
    media_type
}

fn preferred_media_type(
    request: &BidderRequest,
    resolved: &str,
    context: &AuctionContext<'_>,
) -> Option<MediaType> {
    requested_media_type(&request.bid_request, &request.bidder)
        .or_else(|| requested_media_type(&request.bid_request, resolved))
        .or_else(|| {
            context
                .account
                .auction
                .preferred_media_types
                .get(resolved)
                .copied()
        })
}

fn is_multi_format(imp: &Imp) -> bool {
    imp.media_types().len() > 1
}

impl BidderRequestPostProcessor for BidderRequestPreferredMediaProcessor {
    fn name(&self) -> &'static str {
        "preferred-media"
    }

    fn process(
        &self,
        request: BidderRequest,
        aliases: &dyn BidderAliases,
        context: &AuctionContext<'_>,
    ) -> Result<PostProcessOutcome, Report<BidGuardError>> {
        let resolved = aliases.resolve_bidder(&request.bidder);
        let info = require_bidder_info(self.catalog.as_ref(), resolved)?;
        if info.multiformat_supported {
            return Ok(PostProcessOutcome::pass_through(request));
        }

        let Some(preferred) = preferred_media_type(&request, resolved, context) else {
            return Ok(PostProcessOutcome::pass_through(request));
        };
        if !request.bid_request.imp.iter().any(is_multi_format) {
            return Ok(PostProcessOutcome::pass_through(request));
        }

        let mut errors = Vec::new();
        let mut imps = Vec::with_capacity(request.bid_request.imp.len());
        for imp in &request.bid_request.imp {
            if !is_multi_format(imp) {
                imps.push(imp.clone());
            } else if imp.has_media_type(preferred) {
                let mut imp = imp.clone();
                for media_type in MediaType::ALL {
                    if media_type != preferred {
                        imp.clear_media_type(media_type);
                    }
                }
                imps.push(imp);
            } else {
                errors.push(BidderError::bad_input(format!(
                    "Imp {} does not have a media type after filtering and has been removed from the request for this bidder.",
                    imp.id
                )));
            }
        }

        if imps.is_empty() {
            errors.push(BidderError::bad_input(NO_IMPRESSIONS_AFTER_FILTERING));
            return Ok(PostProcessOutcome::reject(
                BidRejectionReason::RequestBlockedUnsupportedMediaType,
                errors,
            ));
        }

        log::debug!(
            "Applied preferred media type {preferred} for bidder {}",
            request.bidder
        );
        let mut bid_request = request.bid_request.as_ref().clone();
        bid_request.imp = imps;
        Ok(PostProcessOutcome::proceed(
            request.with_bid_request(bid_request),
            errors,
        ))
    }
}
