use super::retry::RetryPolicy;
use super::sink::{ClassificationSink, SinkError};
use super::summary::BatchSummary;
use crate::classification::{ClassificationEngine, ClassificationResult};
use crate::config::PipelineConfig;
use crate::grants::GrantRecord;
use crate::review::{apply_verdict, ReviewClassifier, ReviewError, ReviewVerdict};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Final results plus counters for one run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub results: Vec<ClassificationResult>,
    pub summary: BatchSummary,
}

/// Drives a batch through classification, the optional review pass and
/// every configured sink. External failures are counted per record and
/// never abort the batch.
pub struct BatchRunner {
    engine: Arc<ClassificationEngine>,
    reviewer: Option<Arc<dyn ReviewClassifier>>,
    sinks: Vec<Arc<dyn ClassificationSink>>,
    retry: RetryPolicy,
    workers: usize,
    review_batch_size: usize,
}

struct ChunkOutcome {
    application_ids: Vec<String>,
    verdicts: Result<Vec<ReviewVerdict>, ReviewError>,
}

impl BatchRunner {
    pub fn new(engine: Arc<ClassificationEngine>) -> Self {
        Self::from_config(engine, &PipelineConfig::default())
    }

    pub fn from_config(engine: Arc<ClassificationEngine>, config: &PipelineConfig) -> Self {
        Self {
            engine,
            reviewer: None,
            sinks: Vec::new(),
            retry: RetryPolicy::from_config(config),
            workers: config.workers.max(1),
            review_batch_size: config.review_batch_size.max(1),
        }
    }

    pub fn with_reviewer(mut self, reviewer: Arc<dyn ReviewClassifier>) -> Self {
        self.reviewer = Some(reviewer);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ClassificationSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_review_batch_size(mut self, size: usize) -> Self {
        self.review_batch_size = size.max(1);
        self
    }

    pub async fn run(&self, records: &[GrantRecord]) -> BatchReport {
        let mut summary = BatchSummary::started(Utc::now());
        info!(
            records = records.len(),
            workers = self.workers,
            review = self.reviewer.is_some(),
            sinks = self.sinks.len(),
            "batch started"
        );

        let mut results = self.engine.classify_all(records);
        summary.record_first_pass(&results);

        if let Some(reviewer) = &self.reviewer {
            self.review_flagged(reviewer.as_ref(), records, &mut results, &mut summary)
                .await;
        }

        if !self.sinks.is_empty() {
            self.store_all(&results, &mut summary).await;
        }

        summary.record_final(&results);
        summary.finished_at = Utc::now();
        summary.log();

        BatchReport { results, summary }
    }

    async fn review_flagged(
        &self,
        reviewer: &dyn ReviewClassifier,
        records: &[GrantRecord],
        results: &mut [ClassificationResult],
        summary: &mut BatchSummary,
    ) {
        let flagged: Vec<GrantRecord> = records
            .iter()
            .zip(results.iter())
            .filter(|(_, result)| result.needs_review)
            .map(|(record, _)| record.clone())
            .collect();
        if flagged.is_empty() {
            return;
        }

        let chunks: Vec<Vec<GrantRecord>> = flagged
            .chunks(self.review_batch_size)
            .map(|chunk| chunk.to_vec())
            .collect();
        info!(
            flagged = flagged.len(),
            chunks = chunks.len(),
            "sending flagged records to review"
        );

        let outcomes: Vec<ChunkOutcome> = stream::iter(chunks)
            .map(|chunk| self.review_chunk(reviewer, chunk))
            .buffer_unordered(self.workers)
            .collect()
            .await;

        let mut index: HashMap<String, usize> = HashMap::new();
        for (position, result) in results.iter().enumerate() {
            if result.needs_review {
                index.entry(result.application_id.clone()).or_insert(position);
            }
        }

        for outcome in outcomes {
            match outcome.verdicts {
                Ok(verdicts) => {
                    let mut by_id: HashMap<&str, &ReviewVerdict> = verdicts
                        .iter()
                        .map(|verdict| (verdict.application_id.as_str(), verdict))
                        .collect();
                    for application_id in &outcome.application_ids {
                        let verdict = by_id.remove(application_id.as_str());
                        match (verdict, index.get(application_id)) {
                            (Some(verdict), Some(&position)) => {
                                apply_verdict(&mut results[position], verdict);
                                summary.reviewed += 1;
                            }
                            (None, _) => {
                                warn!(%application_id, "review returned no verdict; keeping first pass");
                            }
                            (Some(_), None) => {}
                        }
                    }
                }
                Err(err) => {
                    warn!(
                        records = outcome.application_ids.len(),
                        error = %err,
                        "review chunk failed; keeping first pass"
                    );
                    summary.errors += outcome.application_ids.len();
                }
            }
        }
    }

    async fn review_chunk(
        &self,
        reviewer: &dyn ReviewClassifier,
        chunk: Vec<GrantRecord>,
    ) -> ChunkOutcome {
        let verdicts = self
            .retry
            .run("review", ReviewError::is_retryable, || reviewer.review(&chunk))
            .await;
        ChunkOutcome {
            application_ids: chunk
                .into_iter()
                .map(|record| record.application_id)
                .collect(),
            verdicts,
        }
    }

    async fn store_all(&self, results: &[ClassificationResult], summary: &mut BatchSummary) {
        let outcomes: Vec<Result<(), SinkError>> = stream::iter(results)
            .map(|result| self.store_one(result))
            .buffer_unordered(self.workers)
            .collect()
            .await;

        for outcome in outcomes {
            match outcome {
                Ok(()) => summary.stored += 1,
                Err(_) => summary.errors += 1,
            }
        }

        for sink in &self.sinks {
            if let Err(err) = sink.flush().await {
                warn!(error = %err, "sink flush failed");
            }
        }
    }

    /// Stored only when every sink accepted the result.
    async fn store_one(&self, result: &ClassificationResult) -> Result<(), SinkError> {
        for sink in &self.sinks {
            let stored = self
                .retry
                .run("store", SinkError::is_retryable, || sink.store(result))
                .await;
            if let Err(err) = stored {
                warn!(
                    application_id = %result.application_id,
                    error = %err,
                    "failed to store classification"
                );
                return Err(err);
            }
        }
        Ok(())
    }
}
