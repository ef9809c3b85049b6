//! Client for the upstream firewall management API.
//!
//! Every call carries `Authorization: Bearer <token>`. The API wraps
//! collections as `{"results": [...]}`; some deployments return a bare
//! array for the policy listing, which is accepted too.
//!
//! ```ignore
//! let client = FirewallClient::new("http://localhost:3000")?;
//! let policies = client.list_policies(&token).await?;
//! ```

pub mod model;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

pub use model::{AddressRef, OnetimeSchedule, Policy, UrlFilter, UrlFilterEntry};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The API answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),

    #[error("url: {0}")]
    Url(String),
}

impl UpstreamError {
    /// Upstream HTTP status, when the API produced one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ── FirewallClient ──────────────────────────────────────────────────

/// Thin typed wrapper over the firewall REST endpoints.
#[derive(Clone)]
pub struct FirewallClient {
    http: reqwest::Client,
    base_url: Url,
}

impl FirewallClient {
    pub fn new(base_url: &str) -> Result<Self, UpstreamError> {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    /// Use a preconfigured `reqwest::Client` (proxies, timeouts, ...).
    pub fn with_http(http: reqwest::Client, base_url: &str) -> Result<Self, UpstreamError> {
        let trimmed = base_url.trim_end_matches('/');
        let parsed = Url::parse(trimmed)
            .map_err(|e| UpstreamError::Url(format!("{}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(UpstreamError::Url(format!("{} cannot be a base URL", base_url)));
        }
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::Url(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Map HTTP errors to `UpstreamError`, then decode the JSON body.
    async fn parse(resp: reqwest::Response) -> Result<Value, UpstreamError> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, message });
        }
        resp.json::<Value>()
            .await
            .map_err(|e| UpstreamError::Decode(format!("response body: {}", e)))
    }

    async fn get_json(&self, token: &str, url: Url) -> Result<Value, UpstreamError> {
        debug!(%url, "GET");
        let resp = self.http.get(url).bearer_auth(token).send().await?;
        Self::parse(resp).await
    }

    /// `GET /firewall/policies`: the whole policy collection.
    pub async fn list_policies(&self, token: &str) -> Result<Vec<Policy>, UpstreamError> {
        let url = self.endpoint(&["firewall", "policies"])?;
        let body = self.get_json(token, url).await?;
        Ok(results(body))
    }

    /// `GET /firewall/schedule/onetime/{name}`: first matching schedule.
    pub async fn onetime_schedule(
        &self,
        token: &str,
        name: &str,
    ) -> Result<Option<OnetimeSchedule>, UpstreamError> {
        let url = self.endpoint(&["firewall", "schedule", "onetime", name])?;
        let body = self.get_json(token, url).await?;
        Ok(first(body))
    }

    /// `GET /firewall/webfilter/urlfilter/{profile}`: URL filter of a
    /// web-filter profile.
    pub async fn urlfilter(
        &self,
        token: &str,
        profile: &str,
    ) -> Result<Option<UrlFilter>, UpstreamError> {
        let url = self.endpoint(&["firewall", "webfilter", "urlfilter", profile])?;
        let body = self.get_json(token, url).await?;
        Ok(first(body))
    }

    /// `GET /firewall/webfilter/urlfilter/name/{name}`: lookup by table name.
    pub async fn urlfilter_by_name(
        &self,
        token: &str,
        name: &str,
    ) -> Result<Option<UrlFilter>, UpstreamError> {
        let url = self.endpoint(&["firewall", "webfilter", "urlfilter", "name", name])?;
        let body = self.get_json(token, url).await?;
        Ok(first(body))
    }

    /// `DELETE /firewall/policies/fullhouse/delete/{name}`.
    pub async fn delete_policy(&self, token: &str, name: &str) -> Result<(), UpstreamError> {
        let url = self.endpoint(&["firewall", "policies", "fullhouse", "delete", name])?;
        debug!(%url, "DELETE");
        let resp = self.http.delete(url).bearer_auth(token).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, message });
        }
        Ok(())
    }
}

/// Extract the result list from `{"results": [...]}` or a bare array.
/// Any other shape is an empty list. Items that do not decode are
/// skipped, so one odd record never hides the others.
fn results<T: DeserializeOwned>(body: Value) -> Vec<T> {
    let items = match body {
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        Value::Array(items) => items,
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("skipping undecodable upstream record: {}", e);
                None
            }
        })
        .collect()
}

fn first<T: DeserializeOwned>(body: Value) -> Option<T> {
    results(body).into_iter().next()
}
