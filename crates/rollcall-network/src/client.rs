//! HTTP report client.
//!
//! Each card that passes the duplicate filter is reported with exactly one
//! POST to the attendance service. The client does not retry: a transport
//! failure is returned to the caller, which shows the error signal and waits
//! for the card to be presented again.
//!
//! ```text
//! ScanPipeline
//!     │
//!     └─> ReportClient ───(HTTP POST, JSON)───> attendance service
//!            │
//!            └─> ServerResponse { status, body }
//! ```
//!
//! Every status the service answers with, 4xx and 5xx included, is an
//! ordinary [`ServerResponse`]. Only failures to obtain a status at all are
//! reported as [`ReportError`].

#![allow(async_fn_in_trait)]

use std::time::Duration;

use reqwest::Url;
use rollcall_core::constants::DEFAULT_REQUEST_TIMEOUT_MS;
use rollcall_core::{CardIdentifier, ServerResponse};
use thiserror::Error;
use tracing::{debug, warn};

use crate::payload::ReportPayload;

/// Configuration for the report client
///
/// # Example
///
/// ```
/// use rollcall_network::ReportClientConfig;
/// use std::time::Duration;
///
/// let config = ReportClientConfig {
///     endpoint: "http://192.168.0.10:5000/log-rfid".to_string(),
///     timeout: Duration::from_millis(3000),
///     group_id: Some(4),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ReportClientConfig {
    /// Absolute `http` or `https` URL the reports are posted to
    pub endpoint: String,

    /// Upper bound for one request, connect and response body included
    pub timeout: Duration,

    /// Group the terminal is assigned to; selects the grouped payload
    pub group_id: Option<i32>,
}

impl Default for ReportClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000/log-rfid".to_string(),
            timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            group_id: None,
        }
    }
}

/// Errors that prevent a report from obtaining any response
#[derive(Debug, Error)]
pub enum ReportError {
    /// Endpoint is not an absolute http(s) URL with a host
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// No complete response within the configured timeout
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Name resolution or TCP connect failed
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Request was sent but the response could not be read
    #[error("Request failed: {0}")]
    Request(String),

    /// HTTP client could not be constructed
    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl ReportError {
    pub fn invalid_endpoint(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Check whether the service could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::Timeout(_))
    }

    fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout.as_millis() as u64)
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// Sink for card reports.
///
/// Implemented by [`ReportClient`]; tests substitute their own reporters.
///
/// **NOTE**: This trait is NOT object-safe; use it as a generic bound.
pub trait Reporter: Send + Sync {
    /// Report one identifier and return whatever the service answered.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when no status code could be obtained.
    async fn submit(&self, id: &CardIdentifier) -> Result<ServerResponse, ReportError>;
}

/// HTTP client posting card reports to the attendance service
///
/// # Example
///
/// ```no_run
/// use rollcall_core::CardIdentifier;
/// use rollcall_network::{ReportClient, ReportClientConfig, Reporter};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReportClient::new(ReportClientConfig::default())?;
///
/// let id = CardIdentifier::normalize(&[0x04, 0xA1]);
/// let response = client.submit(&id).await?;
/// println!("{} -> {:?}", response.status, response.classify());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReportClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
    group_id: Option<i32>,
}

impl ReportClient {
    /// Create a client for the configured endpoint.
    ///
    /// No connection is made here.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidEndpoint`] if the endpoint is not an
    /// absolute http(s) URL with a host.
    pub fn new(config: ReportClientConfig) -> Result<Self, ReportError> {
        let endpoint = parse_endpoint(&config.endpoint)?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ReportError::Client(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            timeout: config.timeout,
            group_id: config.group_id,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn group_id(&self) -> Option<i32> {
        self.group_id
    }

    /// Body that would be posted for `id`.
    pub fn payload<'a>(&self, id: &'a CardIdentifier) -> ReportPayload<'a> {
        ReportPayload::new(id, self.group_id)
    }
}

impl Reporter for ReportClient {
    async fn submit(&self, id: &CardIdentifier) -> Result<ServerResponse, ReportError> {
        debug!(uid = %id, endpoint = %self.endpoint, "Submitting report");

        let mut response = self
            .http
            .post(self.endpoint.clone())
            .json(&self.payload(id))
            .send()
            .await
            .map_err(|e| ReportError::from_transport(e, self.timeout))?;

        // The service has acted once a status line arrived; a cut body
        // still yields a response with whatever was read.
        let status = response.status().as_u16();
        let mut raw = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => raw.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(e) => {
                    warn!(
                        uid = %id,
                        status,
                        read = raw.len(),
                        error = %e,
                        "Response body cut short"
                    );
                    break;
                }
            }
        }
        let body = String::from_utf8_lossy(&raw).into_owned();

        debug!(uid = %id, status, body = %body, "Report answered");
        Ok(ServerResponse::new(status, body))
    }
}

/// Parse and check a report endpoint.
///
/// # Errors
///
/// Returns [`ReportError::InvalidEndpoint`] for relative URLs, schemes other
/// than `http`/`https`, and URLs without a host.
pub fn parse_endpoint(endpoint: &str) -> Result<Url, ReportError> {
    let url =
        Url::parse(endpoint).map_err(|e| ReportError::invalid_endpoint(endpoint, e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ReportError::invalid_endpoint(
            endpoint,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if url.host_str().is_none() {
        return Err(ReportError::invalid_endpoint(endpoint, "missing host"));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = ReportClientConfig::default();
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert!(config.group_id.is_none());
        assert!(parse_endpoint(&config.endpoint).is_ok());
    }

    #[rstest]
    #[case("http://10.0.0.5:5000/log-rfid")]
    #[case("https://attendance.example.org/api/scan")]
    #[case("http://localhost/log-rfid")]
    fn test_parse_endpoint_valid(#[case] endpoint: &str) {
        assert!(parse_endpoint(endpoint).is_ok());
    }

    #[rstest]
    #[case("log-rfid")]
    #[case("ftp://10.0.0.5/log-rfid")]
    #[case("file:///tmp/scans")]
    #[case("")]
    fn test_parse_endpoint_invalid(#[case] endpoint: &str) {
        let err = parse_endpoint(endpoint).unwrap_err();
        assert!(matches!(err, ReportError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_new_rejects_invalid_endpoint() {
        let config = ReportClientConfig {
            endpoint: "not a url".to_string(),
            ..Default::default()
        };
        assert!(ReportClient::new(config).is_err());
    }

    #[test]
    fn test_payload_follows_group_id() {
        let id = CardIdentifier::normalize(&[0x04, 0xA1]);

        let client = ReportClient::new(ReportClientConfig::default()).unwrap();
        assert_eq!(client.payload(&id), ReportPayload::Minimal { uid: "04a1" });

        let client = ReportClient::new(ReportClientConfig {
            group_id: Some(7),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            client.payload(&id),
            ReportPayload::Grouped {
                rfid: "04a1",
                group_id: 7
            }
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ReportError::Timeout(5000).to_string(),
            "Request timeout after 5000ms"
        );
        assert!(ReportError::Connect("refused".into()).is_unreachable());
        assert!(!ReportError::invalid_endpoint("x", "y").is_unreachable());
    }
}
