// # HTTP IP Source
//
// Discovers the public IPv4 address by asking a lookup service such as
// ipinfo.io, which answers with a JSON object carrying an `ip` field:
//
// ```json
// { "ip": "203.0.113.5", "city": "...", ... }
// ```
//
// ## Failure Mapping
//
// - `200 OK` with a parseable IPv4 address → `Ok(Ipv4Addr)`
// - `429 Too Many Requests` → `Error::RateLimited`
// - any other status, transport error, bad body, or IPv6 → `Error::IpSource`
//
// No retries: the driver skips the tick and tries again on the next one.

use r53dyn_core::{Error, IpLookupConfig, IpSource, Result};

use reqwest::StatusCode;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};

/// Body returned by the lookup service (only the field we need)
#[derive(Debug, Deserialize)]
struct LookupResponse {
    ip: String,
}

/// IP source backed by an HTTP lookup service
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch the address from
    url: String,

    /// HTTP client (carries the request timeout)
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a source from configuration
    pub fn new(config: &IpLookupConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(config.url.clone(), client))
    }

    /// Create a source with a caller-supplied client
    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch current IP from the lookup service
    async fn fetch_ip(&self) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_source(format!("Request failed: {}", e)))?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(Error::rate_limited(format!(
                    "{} returned {}",
                    self.url,
                    StatusCode::TOO_MANY_REQUESTS
                )));
            }
            status => {
                return Err(Error::ip_source(format!(
                    "Unexpected response code: {}",
                    status
                )));
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ip_source(format!("Failed to read response: {}", e)))?;

        parse_lookup_body(&body)
    }
}

/// Extract the IPv4 address from a lookup-service JSON body
fn parse_lookup_body(body: &str) -> Result<Ipv4Addr> {
    let lookup: LookupResponse = serde_json::from_str(body)
        .map_err(|e| Error::ip_source(format!("Invalid response body: {}", e)))?;

    let ip_text = lookup.ip.trim();
    match ip_text.parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => Ok(ip),
        Ok(IpAddr::V6(ip)) => Err(Error::ip_source(format!("Expected IPv4, got: {}", ip))),
        Err(_) => Err(Error::ip_source(format!("Invalid IP address: {}", ip_text))),
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        tracing::debug!("Fetching public IP from {}", self.url);
        self.fetch_ip().await
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
