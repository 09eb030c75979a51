//! Remote commerce API client.
//!
//! Plain JSON over HTTP with `reqwest`: one endpoint for shipping rate
//! lookup and one for order placement. A single client-wide timeout from
//! [`CommerceApiConfig`] applies to every request; there is no
//! per-operation tuning and no retry. Responses are read as text first
//! so parse failures can be logged with their payload.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::config::{CommerceApiConfig, ConfigError};
use crate::error::{CheckoutError, Result};
use crate::orders::{OrderConfirmation, OrderRequest, OrderService};
use crate::shipping::{RateRequest, RateResponse, RateService};

/// Error body the commerce API returns on failures.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for the remote commerce API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    client: reqwest::Client,
    base: Url,
    api_token: String,
}

impl CommerceClient {
    /// Create a new commerce API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL does not parse or the
    /// HTTP client cannot be constructed.
    pub fn new(config: &CommerceApiConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            CheckoutError::Config(ConfigError::InvalidEnvVar(
                "STONELINE_COMMERCE_URL".to_string(),
                e.to_string(),
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(CommerceClientInner {
                client,
                base: versioned_base(&base, &config.api_version)?,
                api_token: config.api_token.expose_secret().to_string(),
            }),
        })
    }

    /// POST a JSON body and decode a JSON response.
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.inner.base.join(path).map_err(|e| {
            CheckoutError::Service(format!("invalid endpoint path {path}: {e}"))
        })?;

        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(&self.inner.api_token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "Commerce API returned non-success status"
            );
            return Err(CheckoutError::Service(
                parse_error_message(&text)
                    .unwrap_or_else(|| format!("The store is unavailable (HTTP {status})")),
            ));
        }

        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %text.chars().take(500).collect::<String>(),
                    "Failed to parse commerce API response"
                );
                Err(CheckoutError::Parse(e))
            }
        }
    }
}

impl RateService for CommerceClient {
    #[instrument(skip(self), fields(country = %request.country))]
    async fn resolve_rates(&self, request: &RateRequest) -> Result<RateResponse> {
        self.post_json("shipping/rates", request).await
    }
}

impl OrderService for CommerceClient {
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderConfirmation> {
        self.post_json("orders", request).await
    }
}

/// Resolve the versioned API base, e.g. `https://host/v1/`.
///
/// The trailing slash matters: `Url::join` replaces the last segment
/// otherwise.
fn versioned_base(base: &Url, api_version: &str) -> Result<Url> {
    base.join(&format!("{}/", api_version.trim_matches('/')))
        .map_err(|e| {
            CheckoutError::Config(ConfigError::InvalidEnvVar(
                "STONELINE_COMMERCE_API_VERSION".to_string(),
                e.to_string(),
            ))
        })
}

/// Pull the customer-facing message out of an error body, if present.
fn parse_error_message(text: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(text)
        .ok()
        .map(|body| body.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versioned_base_keeps_trailing_slash() {
        let base = Url::parse("https://api.example-tiles.com").unwrap();
        let versioned = versioned_base(&base, "v1").unwrap();
        assert_eq!(versioned.as_str(), "https://api.example-tiles.com/v1/");
        assert_eq!(
            versioned.join("shipping/rates").unwrap().as_str(),
            "https://api.example-tiles.com/v1/shipping/rates"
        );
    }

    #[test]
    fn test_parse_error_message() {
        assert_eq!(
            parse_error_message(r#"{"message": "No coverage for this postcode"}"#).as_deref(),
            Some("No coverage for this postcode")
        );
        assert_eq!(parse_error_message("<html>502</html>"), None);
    }
}
