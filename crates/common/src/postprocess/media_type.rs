use std::sync::Arc;

use error_stack::Report;

use crate::error::BidGuardError;
use crate::openrtb::{Imp, MediaType};

use super::bidder::{require_bidder_info, BidderAliases, BidderCatalog, Channel};
use super::{
    AuctionContext, BidRejectionReason, BidderError, BidderRequest, BidderRequestPostProcessor,
    PostProcessOutcome, NO_IMPRESSIONS_AFTER_FILTERING,
};

/// Strips media objects the bidder does not support on the request's channel
/// and drops impressions left without any. Only dropped impressions are
/// reported.
pub struct BidderRequestMediaFilter {
    catalog: Arc<dyn BidderCatalog>,
}

impl BidderRequestMediaFilter {
    #[must_use]
    pub fn new(catalog: Arc<dyn BidderCatalog>) -> Self {
        Self { catalog }
    }
}

enum ImpFilter {
    Keep,
    Strip(Vec<MediaType>),
    Drop,
}

fn classify(imp: &Imp, supported: &[MediaType]) -> ImpFilter {
    let present = imp.media_types();
    let unsupported: Vec<MediaType> = present
        .iter()
        .copied()
        .filter(|media_type| !supported.contains(media_type))
        .collect();

    if unsupported.is_empty() {
        ImpFilter::Keep
    } else if unsupported.len() == present.len() {
        ImpFilter::Drop
    } else {
        ImpFilter::Strip(unsupported)
    }
}

impl BidderRequestPostProcessor for BidderRequestMediaFilter {
    fn name(&self) -> &'static str {
        "media-type-filter"
    }

    fn process(
        &self,
        request: BidderRequest,
        aliases: &dyn BidderAliases,
        _context: &AuctionContext<'_>,
    ) -> Result<PostProcessOutcome, Report<BidGuardError>> {
        let resolved = aliases.resolve_bidder(&request.bidder);
        let info = require_bidder_info(self.catalog.as_ref(), resolved)?;
        let supported = info.supported_media_types(Channel::of(&request.bid_request));

        if supported.is_empty() {
            return Ok(PostProcessOutcome::reject(
                BidRejectionReason::RequestBlockedUnsupportedMediaType,
                vec![BidderError::bad_input(
                    "Bidder does not support any media types.",
                )],
            ));
        }

        let verdicts: Vec<ImpFilter> = request
            .bid_request
            .imp
            .iter()
            .map(|imp| classify(imp, supported))
            .collect();
        if verdicts.iter().all(|verdict| matches!(verdict, ImpFilter::Keep)) {
            return Ok(PostProcessOutcome::pass_through(request));
        }

        let mut errors = Vec::new();
        let mut imps = Vec::with_capacity(verdicts.len());
        for (imp, verdict) in request.bid_request.imp.iter().zip(verdicts) {
            match verdict {
                ImpFilter::Keep => imps.push(imp.clone()),
                ImpFilter::Strip(unsupported) => {
                    let mut imp = imp.clone();
                    for media_type in unsupported {
                        imp.clear_media_type(media_type);
                    }
                    imps.push(imp);
                }
                ImpFilter::Drop => errors.push(BidderError::bad_input(format!(
                    "Imp {} does not have a supported media type and has been removed from the request for this bidder.",
                    imp.id
                ))),
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
            "Filtered media types for bidder {}: {} warning(s)",
            request.bidder,
            errors.len()
        );
        let mut bid_request = request.bid_request.as_ref().clone();
        bid_request.imp = imps;
        Ok(PostProcessOutcome::proceed(
            request.with_bid_request(bid_request),
            errors,
        ))
    }
}
