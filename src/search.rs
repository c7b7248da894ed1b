//! Third-party video search API.

use crate::config::SearchSettings;
use crate::error::Result;
use crate::parse::preview;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Trait for video search backends.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Run one search and return the raw response body.
    async fn search(&self, params: &[(String, String)]) -> Result<String>;
}

/// Issue a single GET and return the body text.
///
/// The body is returned whatever the status code; callers decide what a
/// provider error body means.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    headers: &[(&str, &str)],
    params: &[(String, String)],
) -> Result<String> {
    let mut request = client.get(url).query(params);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!(status = %status, "Search API returned an error: {}", preview(&body, 200));
    }

    Ok(body)
}

/// TikTok keyword search through RapidAPI.
pub struct RapidApiSearch {
    client: reqwest::Client,
    endpoint: String,
    host: String,
    api_key: String,
}

impl RapidApiSearch {
    pub fn new(settings: &SearchSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            host: settings.host.clone(),
            api_key: settings.api_key.clone().unwrap_or_default(),
        })
    }
}

#[async_trait]
impl VideoSearch for RapidApiSearch {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn search(&self, params: &[(String, String)]) -> Result<String> {
        let headers = [
            ("x-rapidapi-key", self.api_key.as_str()),
            ("x-rapidapi-host", self.host.as_str()),
        ];

        let body = fetch(&self.client, &self.endpoint, &headers, params).await?;
        debug!("Search response: {}", preview(&body, 500));
        Ok(body)
    }
}
