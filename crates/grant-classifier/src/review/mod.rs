//! Secondary classification pass for records the rule engine could not
//! settle on its own.

mod anthropic;
mod prompt;
mod response;

pub use anthropic::AnthropicReviewer;
pub use prompt::{build_prompt, ReviewItem};
pub use response::parse_verdicts;

use crate::classification::ClassificationResult;
use crate::grants::GrantRecord;
use crate::taxonomy::{Category, OrgType};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Replacement classification returned by a reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewVerdict {
    pub application_id: String,
    pub category: Category,
    pub confidence: u8,
    pub org_type: OrgType,
}

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("review transport failed: {0}")]
    Transport(String),
    #[error("review service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("review response could not be parsed: {0}")]
    Malformed(String),
}

impl ReviewError {
    /// Malformed replies are deterministic for a given prompt and are not retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            ReviewError::Transport(_) => true,
            ReviewError::Status { status, .. } => *status == 429 || *status >= 500,
            ReviewError::Malformed(_) => false,
        }
    }
}

impl From<reqwest::Error> for ReviewError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

/// Classifies a chunk of grants in one call.
#[async_trait]
pub trait ReviewClassifier: Send + Sync {
    async fn review(&self, records: &[GrantRecord]) -> Result<Vec<ReviewVerdict>, ReviewError>;
}

/// Overwrites a first-pass result with a reviewer's verdict.
pub fn apply_verdict(result: &mut ClassificationResult, verdict: &ReviewVerdict) {
    let previous = result.category;
    result.category = verdict.category;
    result.confidence = verdict.confidence.min(100);
    result.org_type = verdict.org_type;
    result.secondary_category = None;
    result.needs_review = false;
    result.reasoning = format!(
        "review pass: {} at {} (rules suggested {}; {})",
        verdict.category, verdict.confidence, previous, result.reasoning
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flagged() -> ClassificationResult {
        ClassificationResult {
            application_id: "1".to_string(),
            category: Category::Biotools,
            confidence: 80,
            secondary_category: Some(Category::Diagnostics),
            org_type: OrgType::University,
            reasoning: "biotools scored 9".to_string(),
            needs_review: true,
            scores: Vec::new(),
            biotools_evidence: None,
        }
    }

    #[test]
    fn verdict_replaces_first_pass_fields() {
        let mut result = flagged();
        apply_verdict(
            &mut result,
            &ReviewVerdict {
                application_id: "1".to_string(),
                category: Category::Diagnostics,
                confidence: 88,
                org_type: OrgType::Hospital,
            },
        );

        assert_eq!(result.category, Category::Diagnostics);
        assert_eq!(result.confidence, 88);
        assert_eq!(result.org_type, OrgType::Hospital);
        assert_eq!(result.secondary_category, None);
        assert!(!result.needs_review);
        assert!(result.reasoning.starts_with("review pass:"));
    }

    #[test]
    fn only_transient_failures_are_retryable() {
        assert!(ReviewError::Transport("reset".to_string()).is_retryable());
        assert!(ReviewError::Status {
            status: 529,
            body: String::new()
        }
        .is_retryable());
        assert!(!ReviewError::Status {
            status: 401,
            body: String::new()
        }
        .is_retryable());
        assert!(!ReviewError::Malformed("x".to_string()).is_retryable());
    }
}
