use std::sync::Arc;

use error_stack::Report;

use crate::error::BidGuardError;

use super::bidder::{BidderAliases, BidderCatalog};
use super::{
    AuctionContext, BidderRequest, BidderRequestCleaner, BidderRequestCurrencyBlocker,
    BidderRequestMediaFilter, BidderRequestPostProcessor, BidderRequestPreferredMediaProcessor,
    BidderRequestRejection, PostProcessOutcome,
};

/// Runs stages strictly in order, threading each stage's request into the
/// next and accumulating warnings.
///
/// A rejection stops the chain; its errors are every warning collected so far
/// followed by the rejecting stage's own. A hard failure stops the chain and
/// is returned as is, with the stage name attached.
pub struct CompositeBidderRequestPostProcessor {
    stages: Vec<Box<dyn BidderRequestPostProcessor>>,
}

impl CompositeBidderRequestPostProcessor {
    #[must_use]
    pub fn new(stages: Vec<Box<dyn BidderRequestPostProcessor>>) -> Self {
        Self { stages }
    }

    /// Currency blocker, media-type filter, preferred media, cleaner.
    #[must_use]
    pub fn with_default_chain(catalog: Arc<dyn BidderCatalog>) -> Self {
        Self::new(vec![
            Box::new(BidderRequestCurrencyBlocker::new(Arc::clone(&catalog))),
            Box::new(BidderRequestMediaFilter::new(Arc::clone(&catalog))),
            Box::new(BidderRequestPreferredMediaProcessor::new(catalog)),
            Box::new(BidderRequestCleaner::new()),
        ])
    }

    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }
}

impl BidderRequestPostProcessor for CompositeBidderRequestPostProcessor {
    fn name(&self) -> &'static str {
        "composite"
    }

    fn process(
        &self,
        request: BidderRequest,
        aliases: &dyn BidderAliases,
        context: &AuctionContext<'_>,
    ) -> Result<PostProcessOutcome, Report<BidGuardError>> {
        let mut current = request;
        let mut errors = Vec::new();

        for stage in &self.stages {
            let bidder = current.bidder.clone();
            let outcome = stage.process(current, aliases, context).map_err(|report| {
                report.attach(format!(
                    "Post-processor '{}' failed for bidder {bidder}",
                    stage.name()
                ))
            })?;

            match outcome {
                PostProcessOutcome::Continue(result) => {
                    errors.extend(result.errors);
                    current = result.value;
                }
                PostProcessOutcome::Reject(rejection) => {
                    log::info!(
                        "Bidder {bidder} rejected by '{}': {:?}",
                        stage.name(),
                        rejection.reason
                    );
                    errors.extend(rejection.errors);
                    return Ok(PostProcessOutcome::Reject(BidderRequestRejection {
                        reason: rejection.reason,
                        errors,
                    }));
                }
            }
        }

        Ok(PostProcessOutcome::proceed(current, errors))
    }
}
