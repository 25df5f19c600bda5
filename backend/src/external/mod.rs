//! External data source integrations
//!
//! Every client returns an explicit `SourceError` on failure. Nothing here
//! retries; each call is a single bounded-timeout request. Only the Earth
//! Engine access token is cached.

pub mod earth_engine;
pub mod geocoder;
pub mod service_account;
pub mod shops;
pub mod soil;
pub mod weather;

pub use earth_engine::EarthEngineClient;
pub use geocoder::Geocoder;
pub use service_account::{CredentialsError, ServiceAccountKey, TokenProvider};
pub use shops::ShopLocator;
pub use soil::SoilClient;
pub use weather::WeatherClient;

use std::time::Duration;

use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::config::HttpConfig;

/// Failure of an external data source
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SourceError {
    /// Geocoding produced no result
    #[error("no location found for '{0}'")]
    NotFound(String),

    /// Non-success status, transport failure, timeout or malformed payload
    #[error("{service} unavailable: {reason}")]
    Unavailable {
        service: &'static str,
        reason: String,
    },

    /// Soil classification is indeterminate
    #[error("soil classification indeterminate: {0}")]
    Unknown(String),
}

/// Data source clients that cannot be built at startup
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Earth Engine credentials: {0}")]
    Credentials(#[from] CredentialsError),
}

/// Failure kind reported to the front end
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotFound,
    Unavailable,
    Unknown,
}

impl SourceError {
    pub fn unavailable(service: &'static str, reason: impl Into<String>) -> Self {
        SourceError::Unavailable {
            service,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            SourceError::NotFound(_) => FailureKind::NotFound,
            SourceError::Unavailable { .. } => FailureKind::Unavailable,
            SourceError::Unknown(_) => FailureKind::Unknown,
        }
    }
}

/// Build the HTTP client shared by all data sources
pub fn http_client(config: &HttpConfig) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()
}

/// Check the status and decode a JSON body, mapping every failure to
/// `SourceError::Unavailable`.
async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    response: reqwest::Result<Response>,
) -> Result<T, SourceError> {
    let response = response.map_err(|e| {
        tracing::warn!("{} request failed: {}", service, e);
        SourceError::unavailable(service, format!("request failed: {}", e))
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!("{} returned status {}: {}", service, status, body);
        return Err(SourceError::unavailable(service, format!("HTTP {}", status)));
    }

    response.json::<T>().await.map_err(|e| {
        tracing::warn!("Failed to parse {} response: {}", service, e);
        SourceError::unavailable(service, format!("malformed response: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kinds() {
        assert_eq!(
            SourceError::NotFound("x".into()).kind(),
            FailureKind::NotFound
        );
        assert_eq!(
            SourceError::unavailable("soil", "HTTP 500").kind(),
            FailureKind::Unavailable
        );
        assert_eq!(
            serde_json::to_value(FailureKind::Unknown).unwrap(),
            serde_json::json!("unknown")
        );
    }
}
