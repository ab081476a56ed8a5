use std::sync::Once;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{GlanceError, Result};

static CRYPTO_PROVIDER: Once = Once::new();

fn ensure_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        // Err means another provider is already installed, which is fine
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Thin JSON-over-HTTPS helper shared by the provider clients
#[derive(Debug, Clone)]
pub(crate) struct ApiClient {
    http: reqwest::Client,
    base: String,
    auth: Option<(&'static str, String)>,
}

impl ApiClient {
    /// `auth` is a header name/value pair attached to every request
    pub fn new(base: &str, auth: Option<(&'static str, String)>, timeout: Duration) -> Result<Self> {
        ensure_crypto_provider();
        let http = reqwest::Client::builder()
            .user_agent(concat!("gitglance/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base, path))
            .map_err(|e| GlanceError::Config(format!("Invalid API URL {}: {}", self.base, e)))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn send(&self, url: Url) -> Result<reqwest::Response> {
        debug!(%url, "GET");
        let mut request = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some((header, value)) = &self.auth {
            request = request.header(*header, value);
        }
        Ok(request.send().await?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.send(url).await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json::<T>().await?)
    }

    /// Like [`ApiClient::get_json`], mapping 404 to `None`
    pub async fn get_optional<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>> {
        let response = self.send(url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(Some(response.json::<T>().await?))
    }
}

async fn api_error(response: reqwest::Response) -> GlanceError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    GlanceError::Api {
        status,
        message: error_message(&body),
    }
}

/// Providers wrap errors as `{"message": ...}`; fall back to the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .map(|m| match m {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
        })
        .unwrap_or_else(|| body.trim().to_string())
}
