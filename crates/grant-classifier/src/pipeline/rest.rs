use super::sink::{ClassificationSink, SinkError};
use crate::classification::ClassificationResult;
use crate::config::StorageConfig;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Writes classification columns back to the `projects` table of a
/// PostgREST endpoint.
pub struct RestSink {
    base_url: String,
    service_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize, PartialEq)]
struct ProjectUpdate<'a> {
    primary_category: &'static str,
    category_confidence: u8,
    secondary_category: Option<&'static str>,
    org_type: &'static str,
    #[serde(skip)]
    application_id: &'a str,
}

impl<'a> From<&'a ClassificationResult> for ProjectUpdate<'a> {
    fn from(result: &'a ClassificationResult) -> Self {
        Self {
            primary_category: result.category.label(),
            category_confidence: result.confidence,
            secondary_category: result.secondary_category.map(|category| category.label()),
            org_type: result.org_type.label(),
            application_id: &result.application_id,
        }
    }
}

impl RestSink {
    pub fn new(
        base_url: impl Into<String>,
        service_key: impl Into<String>,
    ) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            client,
        })
    }

    /// `None` unless both the URL and the service key are configured.
    pub fn from_config(config: &StorageConfig) -> Result<Option<Self>, SinkError> {
        match (&config.base_url, &config.service_key) {
            (Some(url), Some(key)) => Ok(Some(Self::new(url.clone(), key.clone())?)),
            _ => Ok(None),
        }
    }

    fn update_url(&self, application_id: &str) -> String {
        format!(
            "{}/rest/v1/projects?application_id=eq.{}",
            self.base_url, application_id
        )
    }
}

#[async_trait]
impl ClassificationSink for RestSink {
    async fn store(&self, result: &ClassificationResult) -> Result<(), SinkError> {
        let update = ProjectUpdate::from(result);
        let response = self
            .client
            .patch(self.update_url(update.application_id))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=minimal")
            .json(&update)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Rejected {
                application_id: result.application_id.clone(),
                status: status.as_u16(),
                body,
            });
        }

        debug!(application_id = %result.application_id, "classification stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{Category, OrgType};

    #[test]
    fn update_targets_the_application_row() {
        let sink = RestSink::new("https://db.example.org/", "service").expect("client");
        assert_eq!(
            sink.update_url("10945821"),
            "https://db.example.org/rest/v1/projects?application_id=eq.10945821"
        );
    }

    #[test]
    fn update_body_carries_classification_columns() {
        let result = ClassificationResult {
            application_id: "42".to_string(),
            category: Category::MedicalDevice,
            confidence: 80,
            secondary_category: None,
            org_type: OrgType::Company,
            reasoning: "medical_device scored 12".to_string(),
            needs_review: false,
            scores: Vec::new(),
            biotools_evidence: None,
        };
        let body = serde_json::to_value(ProjectUpdate::from(&result)).expect("serialize");
        assert_eq!(
            body,
            serde_json::json!({
                "primary_category": "medical_device",
                "category_confidence": 80,
                "secondary_category": null,
                "org_type": "company",
            })
        );
    }

    #[test]
    fn storage_is_optional() {
        let config = StorageConfig {
            base_url: Some("https://db.example.org".to_string()),
            service_key: None,
        };
        assert!(RestSink::from_config(&config).expect("no client").is_none());
    }
}
