use std::collections::HashMap;

use tokio::task::JoinSet;
use tracing::{debug, instrument, warn};

use super::assessor::Engine;
use super::types::BatchOptions;
use crate::check::{AssessmentResult, CheckTier};
use crate::error::ErrorKind;
use crate::source::SourceDescriptor;

impl Engine {
    /// Assesses many sources in fixed-size batches, returning results in input order.
    ///
    /// Each check runs on its own task, so a panic or internal error in one source
    /// becomes a Failing verdict for that source and leaves the rest of the batch alone.
    /// Dropping the returned future aborts the checks still in flight.
    #[instrument(skip_all, fields(sources = sources.len(), tier = %options.tier))]
    pub async fn assess_batch(
        &self,
        sources: &[SourceDescriptor],
        options: BatchOptions,
    ) -> Vec<AssessmentResult> {
        let concurrency = options
            .concurrency
            .unwrap_or(self.inner.config.concurrency)
            .max(1);
        let pacing = options.pacing.unwrap_or(self.inner.config.batch_pacing);
        let assess_options = options.assess_options();
        let tier = options.tier;

        let mut results = Vec::with_capacity(sources.len());
        for (batch_index, batch) in sources.chunks(concurrency).enumerate() {
            if batch_index > 0 && !pacing.is_zero() {
                tokio::time::sleep(pacing).await;
            }
            debug!(batch = batch_index, size = batch.len(), "Starting batch");

            let mut tasks = JoinSet::new();
            let mut slots = HashMap::with_capacity(batch.len());
            for (index, source) in batch.iter().cloned().enumerate() {
                let engine = self.clone();
                let keyword = options.keyword.clone();
                let handle = tasks.spawn(async move {
                    let outcome = engine
                        .assess(&source, tier, keyword.as_deref(), assess_options)
                        .await;
                    (index, outcome)
                });
                slots.insert(handle.id(), index);
            }

            let mut finished: Vec<Option<AssessmentResult>> =
                batch.iter().map(|_| None).collect();
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((index, Ok(result))) => finished[index] = Some(result),
                    Ok((index, Err(e))) => {
                        let source = &batch[index];
                        warn!(
                            source_id = %source.id,
                            error = %e,
                            "Assessment failed internally"
                        );
                        finished[index] =
                            Some(self.isolated_failure(source, tier, e.to_string()));
                    }
                    Err(e) => {
                        let Some(&index) = slots.get(&e.id()) else {
                            continue;
                        };
                        let source = &batch[index];
                        warn!(source_id = %source.id, error = %e, "Assessment task aborted");
                        let reason = if e.is_panic() {
                            "assessment panicked"
                        } else {
                            "assessment was cancelled"
                        };
                        finished[index] = Some(self.isolated_failure(source, tier, reason));
                    }
                }
            }

            for (source, slot) in batch.iter().zip(finished) {
                let result = match slot {
                    Some(result) => result,
                    None => self.isolated_failure(source, tier, "assessment did not finish"),
                };
                results.push(result);
            }
        }
        results
    }

    fn isolated_failure(
        &self,
        source: &SourceDescriptor,
        tier: CheckTier,
        message: impl Into<String>,
    ) -> AssessmentResult {
        let result = AssessmentResult::failing(
            &source.id,
            tier,
            ErrorKind::Internal,
            message,
            0,
            self.inner.clock.now(),
        );
        self.inner
            .tracker
            .record_at(&source.id, false, 0, result.checked_at);
        result
    }
}
