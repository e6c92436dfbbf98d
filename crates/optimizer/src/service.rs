//! The external recommendation service behind a trait.

use crate::error::OptimizerError;
use crate::request::{response_schema, OptimizationRequest};
use adalloc_core::config::OptimizerConfig;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Produces the raw JSON reply text for an optimization request.
#[async_trait]
pub trait RecommendationService: Send + Sync {
    async fn generate(&self, request: &OptimizationRequest) -> Result<String, OptimizerError>;
}

// ─── Gemini ────────────────────────────────────────────────────────────────

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &OptimizerConfig, api_key: impl Into<String>) -> Result<Self, OptimizerError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Concatenated text parts of the first candidate.
fn reply_text(envelope: GenerateContentResponse) -> Result<String, OptimizerError> {
    let text: String = envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        Err(OptimizerError::EmptyReply)
    } else {
        Ok(text)
    }
}

#[async_trait]
impl RecommendationService for GeminiClient {
    async fn generate(&self, request: &OptimizationRequest) -> Result<String, OptimizerError> {
        let body = json!({
            "systemInstruction": { "parts": [{ "text": request.system_instruction() }] },
            "contents": [{ "role": "user", "parts": [{ "text": request.prompt() }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            },
        });

        debug!(model = %self.model, channels = request.channels.len(), "Sending optimization request");
        let resp = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OptimizerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope = resp.json::<GenerateContentResponse>().await?;
        reply_text(envelope)
    }
}

// ─── Disabled ──────────────────────────────────────────────────────────────

/// Stand-in used when no API key is configured.
pub struct DisabledClient;

#[async_trait]
impl RecommendationService for DisabledClient {
    async fn generate(&self, _request: &OptimizationRequest) -> Result<String, OptimizerError> {
        Err(OptimizerError::NotConfigured)
    }
}

/// Gemini when an API key is configured, otherwise the disabled client.
pub fn select_service(config: &OptimizerConfig) -> Arc<dyn RecommendationService> {
    match config.api_key() {
        Some(key) => match GeminiClient::new(config, key) {
            Ok(client) => {
                info!(model = %config.model, "AI strategist enabled");
                Arc::new(client)
            }
            Err(e) => {
                warn!(error = %e, "Failed to build HTTP client, AI strategist disabled");
                Arc::new(DisabledClient)
            }
        },
        None => {
            info!("No optimizer API key configured, AI strategist disabled");
            Arc::new(DisabledClient)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_text_joins_first_candidate_parts() {
        let envelope: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [
                {"content": {"parts": [{"text": "{\"recommendations\": [], "}, {"text": "\"globalStrategy\": \"hold\"}"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]}"#,
        )
        .unwrap();
        let text = reply_text(envelope).unwrap();
        assert_eq!(text, r#"{"recommendations": [], "globalStrategy": "hold"}"#);
    }

    #[test]
    fn test_reply_text_empty_envelope() {
        let envelope: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(reply_text(envelope), Err(OptimizerError::EmptyReply)));

        let envelope: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert!(matches!(reply_text(envelope), Err(OptimizerError::EmptyReply)));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = OptimizerConfig {
            base_url: "http://localhost:9000/".into(),
            ..Default::default()
        };
        let client = GeminiClient::new(&config, "k").unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_disabled_client() {
        let req = OptimizationRequest::new(&[], 0.0);
        let err = DisabledClient.generate(&req).await.unwrap_err();
        assert!(matches!(err, OptimizerError::NotConfigured));
    }

    #[tokio::test]
    async fn test_blank_key_selects_disabled() {
        let config = OptimizerConfig {
            api_key: Some("   ".into()),
            ..Default::default()
        };
        let service = select_service(&config);
        let err = service
            .generate(&OptimizationRequest::new(&[], 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, OptimizerError::NotConfigured));
    }
}
