use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::WeatherError, model::WeatherReport};

use super::WeatherClient;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Client for WeatherAPI.com `current.json`.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    base_url: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    /// Like [`WeatherApiClient::new`], but every request is bounded by `timeout`.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    fn current_url(&self) -> String {
        format!("{}/current.json", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl WeatherClient for WeatherApiClient {
    async fn fetch_current(
        &self,
        city: &str,
        api_key: &str,
    ) -> Result<WeatherReport, WeatherError> {
        let url = self.current_url();
        tracing::debug!(%url, city, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("key", api_key)])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "WeatherAPI request failed");
                WeatherError::Transport(format!("Failed to reach WeatherAPI.com: {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::Transport(format!("Failed to read WeatherAPI response body: {e}"))
        })?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "WeatherAPI returned an error status");
            return Err(WeatherError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&body)
                    .or_else(|| status.canonical_reason().map(str::to_string))
                    .unwrap_or_else(|| "request failed".to_string()),
            });
        }

        let report = WeatherReport::from_json(&body)?;
        tracing::debug!(location = %report.location.name, "current weather received");
        Ok(report)
    }
}

#[derive(Debug, Deserialize)]
struct WaErrorEnvelope {
    error: WaErrorBody,
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    message: String,
}

/// Extract the message of an error envelope, falling back to the raw body.
fn upstream_message(body: &str) -> Option<String> {
    if let Ok(envelope) = serde_json::from_str::<WaErrorEnvelope>(body) {
        return Some(envelope.error.message);
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(truncate_body(trimmed))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
