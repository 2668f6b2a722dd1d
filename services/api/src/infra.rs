use grant_classifier::classification::ClassificationEngine;
use grant_classifier::config::AppConfig;
use grant_classifier::error::AppError;
use grant_classifier::review::{AnthropicReviewer, ReviewClassifier};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Engine compiled from the configured rules file or the built-in tables.
pub(crate) fn build_engine(config: &AppConfig) -> Result<ClassificationEngine, AppError> {
    let rules = config.classification.rule_set()?;
    if let Some(path) = &config.classification.rules_path {
        info!(path = %path.display(), "loaded classification rules");
    }
    Ok(ClassificationEngine::new(rules)?)
}

pub(crate) fn build_reviewer(
    config: &AppConfig,
) -> Result<Option<Arc<dyn ReviewClassifier>>, AppError> {
    let reviewer = AnthropicReviewer::from_config(&config.review)?;
    Ok(reviewer.map(|reviewer| Arc::new(reviewer) as Arc<dyn ReviewClassifier>))
}
