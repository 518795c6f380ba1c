use std::{fmt::Debug, sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{Config, WeatherError, WeatherReport, provider::weatherapi::WeatherApiClient};

pub mod weatherapi;

/// A source of current weather for a city.
///
/// One call is one outbound request; implementations do not retry or cache.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch_current(
        &self,
        city: &str,
        api_key: &str,
    ) -> Result<WeatherReport, WeatherError>;
}

/// Construct the WeatherAPI.com client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherClient>> {
    let base_url = config.base_url();

    let client = match config.timeout_secs {
        Some(secs) => WeatherApiClient::with_timeout(base_url, Duration::from_secs(secs))?,
        None => WeatherApiClient::new(base_url),
    };

    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_default_config_builds() {
        let cfg = Config::default();
        assert!(client_from_config(&cfg).is_ok());
    }

    #[test]
    fn client_from_config_with_timeout_builds() {
        let cfg = Config {
            timeout_secs: Some(5),
            ..Config::default()
        };
        assert!(client_from_config(&cfg).is_ok());
    }
}
