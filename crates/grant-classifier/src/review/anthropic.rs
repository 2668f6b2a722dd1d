use super::prompt::build_prompt;
use super::response::parse_verdicts;
use super::{ReviewClassifier, ReviewError, ReviewVerdict};
use crate::config::ReviewConfig;
use crate::grants::GrantRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4_096;

/// Reviewer backed by the Anthropic messages API.
pub struct AnthropicReviewer {
    api_key: String,
    model: String,
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicReviewer {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, ReviewError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            endpoint: MESSAGES_URL.to_string(),
            client,
        })
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &ReviewConfig) -> Result<Option<Self>, ReviewError> {
        match &config.api_key {
            Some(key) => Ok(Some(Self::new(key.clone(), config.model.clone())?)),
            None => Ok(None),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl ReviewClassifier for AnthropicReviewer {
    async fn review(&self, records: &[GrantRecord]) -> Result<Vec<ReviewVerdict>, ReviewError> {
        let prompt = build_prompt(records).map_err(|err| ReviewError::Malformed(err.to_string()))?;
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: &prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ReviewError::Status { status, body });
        }

        let payload: MessagesResponse = response
            .json()
            .await
            .map_err(|err| ReviewError::Malformed(err.to_string()))?;
        let text = payload
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n");

        let verdicts = parse_verdicts(&text)?;
        debug!(
            requested = records.len(),
            returned = verdicts.len(),
            model = %self.model,
            "review chunk parsed"
        );
        Ok(verdicts)
    }
}
