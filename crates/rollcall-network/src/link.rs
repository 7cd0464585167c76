//! Link bring-up.
//!
//! The terminal only starts polling once the report service can be reached.
//! Reachability is probed with a plain TCP connect to the endpoint's host and
//! port; no HTTP request is sent.

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::Url;
use tokio::net::{TcpStream, lookup_host};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::client::ReportError;

/// Wait until a TCP connection to `endpoint` succeeds.
///
/// Retries every `retry` for as long as it takes. Each attempt, name
/// resolution included, is bounded by `retry` as well, so a black-holed
/// address cannot stall the loop.
///
/// Returns the address that accepted the connection.
///
/// # Errors
///
/// Returns [`ReportError::InvalidEndpoint`] if the endpoint carries no host
/// or port; nothing else ends the wait.
pub async fn wait_for_link(endpoint: &Url, retry: Duration) -> Result<SocketAddr, ReportError> {
    let host = endpoint
        .host_str()
        .map(|h| h.trim_start_matches('[').trim_end_matches(']'))
        .ok_or_else(|| ReportError::invalid_endpoint(endpoint.as_str(), "missing host"))?;
    let port = endpoint
        .port_or_known_default()
        .ok_or_else(|| ReportError::invalid_endpoint(endpoint.as_str(), "missing port"))?;

    info!(host, port, "Waiting for link to report service");

    let mut attempt: u32 = 0;
    loop {
        attempt += 1;

        match probe(host, port, retry).await {
            Ok(addr) => {
                info!(%addr, attempt, "Report service reachable");
                return Ok(addr);
            }
            Err(e) => {
                warn!(host, port, attempt, error = %e, "Report service not reachable, retrying");
                sleep(retry).await;
            }
        }
    }
}

async fn probe(host: &str, port: u16, limit: Duration) -> Result<SocketAddr, ReportError> {
    let addrs = timeout(limit, lookup_host((host, port)))
        .await
        .map_err(|_| ReportError::Timeout(limit.as_millis() as u64))?
        .map_err(|e| ReportError::Connect(format!("cannot resolve {}: {}", host, e)))?;

    let mut last_error = ReportError::Connect(format!("no addresses for {}", host));
    for addr in addrs {
        match timeout(limit, TcpStream::connect(addr)).await {
            Ok(Ok(_stream)) => return Ok(addr),
            Ok(Err(e)) => {
                debug!(%addr, error = %e, "Connect attempt failed");
                last_error = ReportError::Connect(format!("{}: {}", addr, e));
            }
            Err(_) => {
                debug!(%addr, "Connect attempt timed out");
                last_error = ReportError::Timeout(limit.as_millis() as u64);
            }
        }
    }

    Err(last_error)
}
