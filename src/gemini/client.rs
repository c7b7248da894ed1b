//! Vertex AI `generateContent` client over reqwest.

use super::types::{GenerateContentRequest, GenerateContentResponse};
use super::GenerativeModel;
use crate::config::VertexSettings;
use crate::error::{PostbotError, Result};
use crate::parse::preview;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Vertex AI client bound to one model.
pub struct VertexClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
}

impl VertexClient {
    /// Create a client from the vertex settings.
    pub fn new(settings: &VertexSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: Self::endpoint_for(settings)?,
            access_token: settings.access_token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Full `generateContent` URL for the configured project, region and model.
    pub fn endpoint_for(settings: &VertexSettings) -> Result<String> {
        if settings.project_id.is_empty() {
            return Err(PostbotError::Config("vertex.project_id is not set".to_string()));
        }
        if settings.location.is_empty() {
            return Err(PostbotError::Config("vertex.location is not set".to_string()));
        }

        let base = match &settings.base_url {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("https://{}-aiplatform.googleapis.com/v1", settings.location),
        };

        Ok(format!(
            "{}/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            base, settings.project_id, settings.location, settings.model
        ))
    }
}

#[async_trait]
impl GenerativeModel for VertexClient {
    #[instrument(skip(self, request), fields(turns = request.contents.len()))]
    async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let mut builder = self.http.post(&self.endpoint).json(&request);
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(PostbotError::Model(format!(
                "generateContent returned {}: {}",
                status,
                preview(&body, 500)
            )));
        }

        debug!("Model response: {}", preview(&body, 500));

        Ok(serde_json::from_str(&body)?)
    }
}
