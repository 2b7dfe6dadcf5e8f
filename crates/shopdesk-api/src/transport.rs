// Transport contract and its HTTP implementation.
//
// The core depends only on the `Transport` trait; `HttpTransport` wraps
// `reqwest::Client` with base-URL joining, JSON bodies, and mapping of
// non-success statuses to `Error::Api` carrying the backend's message.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use strum::{Display, EnumString};
use tracing::debug;
use url::Url;

use crate::error::Error;

/// HTTP methods the backend contract uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

/// The request/response contract consumed by the core.
///
/// `endpoint` is relative to the transport's base URL (e.g. `ages/paginate`).
/// On success the decoded JSON payload is returned (`Value::Null` for an
/// empty body); every failure is an [`Error`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value, Error>;
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("shopdesk/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))
    }
}

/// [`Transport`] over HTTP with JSON bodies.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl HttpTransport {
    /// Create a transport rooted at `base_url` (e.g. `http://localhost:3000/api/`).
    pub fn new(base_url: Url, config: &TransportConfig) -> Result<Self, Error> {
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url: with_trailing_slash(base_url),
            timeout_secs: config.timeout.as_secs(),
        })
    }

    /// Create a transport with a pre-built `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = with_trailing_slash(Url::parse(base_url)?);
        Ok(Self {
            http,
            base_url,
            timeout_secs: 0,
        })
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path against the base URL.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(endpoint.trim_start_matches('/'))?)
    }

    async fn send(&self, url: Url, method: Method, body: Option<Value>) -> Result<Value, Error> {
        debug!(%method, %url, "sending request");

        let builder = match method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
            Method::Patch => self.http.patch(url),
            Method::Delete => self.http.delete(url),
        };
        let builder = match body {
            Some(ref json) => builder.json(json),
            None => builder,
        };

        let resp = builder.send().await.map_err(|e| self.map_send_error(e))?;
        parse_response(resp).await
    }

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value, Error> {
        let url = self.endpoint_url(endpoint)?;
        self.send(url, method, body).await
    }
}

/// Decode a response: JSON payload on success, `Error::Api` otherwise.
async fn parse_response(resp: reqwest::Response) -> Result<Value, Error> {
    let status = resp.status();
    let body = resp.text().await.map_err(Error::Transport)?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned));
        debug!(status = status.as_u16(), ?message, "request rejected");
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body,
    })
}

/// `Url::join` drops the last path segment unless it ends with `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn method_display_is_uppercase() {
        assert_eq!(Method::Patch.to_string(), "PATCH");
        assert_eq!("delete".parse::<Method>().unwrap(), Method::Delete);
    }

    #[test]
    fn endpoint_joins_under_base_path() {
        let transport =
            HttpTransport::from_reqwest("http://localhost:3000/api", reqwest::Client::new())
                .unwrap();
        assert_eq!(
            transport.endpoint_url("ages/paginate").unwrap().as_str(),
            "http://localhost:3000/api/ages/paginate"
        );
        assert_eq!(
            transport.endpoint_url("/roles").unwrap().as_str(),
            "http://localhost:3000/api/roles"
        );
    }
}
