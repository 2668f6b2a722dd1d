//! End-to-end batch runs against in-process reviewers and sinks.

mod common {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use grant_classifier::classification::{ClassificationEngine, ClassificationResult};
    use grant_classifier::pipeline::{BatchRunner, ClassificationSink, RetryPolicy, SinkError};
    use grant_classifier::review::{ReviewClassifier, ReviewError, ReviewVerdict};
    use grant_classifier::{Category, GrantRecord, OrgType};

    pub(super) fn runner() -> BatchRunner {
        let engine = ClassificationEngine::standard().expect("standard rules compile");
        BatchRunner::new(Arc::new(engine)).with_retry(RetryPolicy::new(3, Duration::ZERO))
    }

    pub(super) fn grants() -> Vec<GrantRecord> {
        vec![
            GrantRecord::new("1001", "T32")
                .with_title("Predoctoral training in neuroscience")
                .with_org("UNIVERSITY OF IOWA"),
            GrantRecord::new("1002", "R01")
                .with_title("Development of a novel CRISPR screening platform")
                .with_abstract(
                    "We will develop a high-throughput screening platform for the research \
                     community and distribute protocols and reagents to laboratories \
                     studying gene function.",
                )
                .with_org("BROAD INSTITUTE, INC."),
            GrantRecord::new("1003", "R21")
                .with_title("Pilot study")
                .with_abstract("Too short to classify."),
        ]
    }

    /// Returns a therapeutics verdict for every record it is given.
    #[derive(Default)]
    pub(super) struct AgreeableReviewer {
        pub calls: AtomicUsize,
    }

    #[async_trait]
    impl ReviewClassifier for AgreeableReviewer {
        async fn review(&self, records: &[GrantRecord]) -> Result<Vec<ReviewVerdict>, ReviewError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(records
                .iter()
                .map(|record| ReviewVerdict {
                    application_id: record.application_id.clone(),
                    category: Category::Therapeutics,
                    confidence: 77,
                    org_type: OrgType::ResearchInstitute,
                })
                .collect())
        }
    }

    #[derive(Default)]
    pub(super) struct GarbledReviewer {
        pub calls: AtomicUsize,
    }

    #[async_trait]
    impl ReviewClassifier for GarbledReviewer {
        async fn review(&self, _records: &[GrantRecord]) -> Result<Vec<ReviewVerdict>, ReviewError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ReviewError::Malformed("expected a JSON array".to_string()))
        }
    }

    /// Accepts everything except one application id, which always fails
    /// with a server error.
    pub(super) struct FlakySink {
        pub failing_id: String,
        pub attempts: Mutex<HashMap<String, usize>>,
        pub stored: Mutex<Vec<String>>,
    }

    impl FlakySink {
        pub(super) fn failing_on(id: &str) -> Self {
            Self {
                failing_id: id.to_string(),
                attempts: Mutex::new(HashMap::new()),
                stored: Mutex::new(Vec::new()),
            }
        }

        pub(super) fn attempts_for(&self, id: &str) -> usize {
            self.attempts
                .lock()
                .expect("attempts lock")
                .get(id)
                .copied()
                .unwrap_or(0)
        }
    }

    #[async_trait]
    impl ClassificationSink for FlakySink {
        async fn store(&self, result: &ClassificationResult) -> Result<(), SinkError> {
            *self
                .attempts
                .lock()
                .expect("attempts lock")
                .entry(result.application_id.clone())
                .or_default() += 1;
            if result.application_id == self.failing_id {
                return Err(SinkError::Rejected {
                    application_id: result.application_id.clone(),
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            self.stored
                .lock()
                .expect("stored lock")
                .push(result.application_id.clone());
            Ok(())
        }
    }
}

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{grants, runner, AgreeableReviewer, FlakySink, GarbledReviewer};
use grant_classifier::pipeline::MemorySink;
use grant_classifier::Category;

#[tokio::test]
async fn classifies_and_stores_every_record() {
    let sink = Arc::new(MemorySink::new());
    let report = runner().with_sink(sink.clone()).run(&grants()).await;

    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.accepted, 1);
    assert_eq!(report.summary.flagged, 2);
    assert_eq!(report.summary.reviewed, 0);
    assert_eq!(report.summary.stored, 3);
    assert_eq!(report.summary.errors, 0);
    assert_eq!(sink.results().len(), 3);
    assert_eq!(report.summary.by_category.get(&Category::Training), Some(&1));
    assert!(report.summary.finished_at >= report.summary.started_at);
}

#[tokio::test]
async fn review_verdicts_replace_flagged_results() {
    let reviewer = Arc::new(AgreeableReviewer::default());
    let report = runner()
        .with_reviewer(reviewer.clone())
        .run(&grants())
        .await;

    assert_eq!(report.summary.reviewed, 2);
    assert_eq!(report.summary.errors, 0);
    assert_eq!(reviewer.calls.load(Ordering::SeqCst), 1);

    let training = &report.results[0];
    assert_eq!(training.category, Category::Training);
    assert!(training.reasoning.contains("T32"));

    for reviewed in &report.results[1..] {
        assert_eq!(reviewed.category, Category::Therapeutics);
        assert_eq!(reviewed.confidence, 77);
        assert!(!reviewed.needs_review);
        assert!(reviewed.reasoning.starts_with("review pass:"));
    }
    assert_eq!(report.summary.by_category.get(&Category::Therapeutics), Some(&2));
}

#[tokio::test]
async fn review_chunks_respect_batch_size() {
    let reviewer = Arc::new(AgreeableReviewer::default());
    let report = runner()
        .with_reviewer(reviewer.clone())
        .with_review_batch_size(1)
        .with_workers(2)
        .run(&grants())
        .await;

    assert_eq!(reviewer.calls.load(Ordering::SeqCst), 2);
    assert_eq!(report.summary.reviewed, 2);
}

#[tokio::test]
async fn malformed_review_keeps_first_pass_and_counts_errors() {
    let reviewer = Arc::new(GarbledReviewer::default());
    let report = runner()
        .with_reviewer(reviewer.clone())
        .run(&grants())
        .await;

    assert_eq!(reviewer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.summary.reviewed, 0);
    assert_eq!(report.summary.errors, 2);
    assert!(report.results[1].needs_review);
    assert_eq!(report.results[2].category, Category::Unclassified);
}

#[tokio::test]
async fn failing_sink_is_retried_then_counted_without_aborting() {
    let sink = Arc::new(FlakySink::failing_on("1002"));
    let report = runner().with_sink(sink.clone()).run(&grants()).await;

    assert_eq!(sink.attempts_for("1002"), 3);
    assert_eq!(sink.attempts_for("1001"), 1);
    assert_eq!(report.summary.stored, 2);
    assert_eq!(report.summary.errors, 1);
    assert_eq!(report.results.len(), 3);

    let mut stored = sink.stored.lock().expect("stored lock").clone();
    stored.sort();
    assert_eq!(stored, vec!["1001".to_string(), "1003".to_string()]);
}
