use std::sync::Arc;

use error_stack::Report;

use crate::error::BidGuardError;

use super::bidder::{require_bidder_info, BidderAliases, BidderCatalog};
use super::{
    AuctionContext, BidRejectionReason, BidderError, BidderRequest, BidderRequestPostProcessor,
    PostProcessOutcome,
};

/// Rejects a bidder whose accepted currencies share nothing with the
/// request's `cur`.
pub struct BidderRequestCurrencyBlocker {
    catalog: Arc<dyn BidderCatalog>,
}

impl BidderRequestCurrencyBlocker {
    #[must_use]
    pub fn new(catalog: Arc<dyn BidderCatalog>) -> Self {
        Self { catalog }
    }
}

impl BidderRequestPostProcessor for BidderRequestCurrencyBlocker {
    fn name(&self) -> &'static str {
        "currency-blocker"
    }

    fn process(
        &self,
        request: BidderRequest,
        aliases: &dyn BidderAliases,
        _context: &AuctionContext<'_>,
    ) -> Result<PostProcessOutcome, Report<BidGuardError>> {
        let resolved = aliases.resolve_bidder(&request.bidder);
        let info = require_bidder_info(self.catalog.as_ref(), resolved)?;

        let accepted = info.accepted_currencies.as_deref().unwrap_or_default();
        let requested = &request.bid_request.cur;
        if accepted.is_empty() || requested.is_empty() {
            return Ok(PostProcessOutcome::pass_through(request));
        }

        if requested.iter().any(|currency| accepted.contains(currency)) {
            return Ok(PostProcessOutcome::pass_through(request));
        }

        log::debug!(
            "Blocking bidder {}: accepts {:?}, request allows {:?}",
            request.bidder,
            accepted,
            requested
        );
        Ok(PostProcessOutcome::reject(
            BidRejectionReason::RequestBlockedUnacceptableCurrency,
            vec![BidderError::generic(
                "No match between the configured currencies and bidRequest.cur",
            )],
        ))
    }
}
