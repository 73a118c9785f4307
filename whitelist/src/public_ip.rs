//! Public address lookup against a plain-text "what is my IP" endpoint

use anyhow::{Context, Result};
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;

use crate::config::LookupConfig;
use crate::error::WhitelistError;

/// Resolves the address the remote server will see us connecting from.
pub trait PublicIpLookup {
    fn lookup(&self) -> Result<IpAddr>;
}

/// Blocking HTTP GET against the configured lookup URL.
pub struct HttpLookup {
    url: String,
    timeout: Duration,
}

impl HttpLookup {
    pub fn new(config: &LookupConfig) -> Self {
        Self {
            url: config.url.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

impl PublicIpLookup for HttpLookup {
    fn lookup(&self) -> Result<IpAddr> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let response = client
            .get(&self.url)
            .send()
            .with_context(|| format!("Failed to reach lookup service {}", self.url))?
            .error_for_status()
            .with_context(|| format!("Lookup service {} returned an error", self.url))?;

        let body = response
            .text()
            .context("Failed to read lookup response body")?;
        debug!("Lookup service responded with {} bytes", body.len());

        parse_address(&body)
    }
}

/// The endpoint answers with the bare address, possibly followed by a newline.
pub fn parse_address(body: &str) -> Result<IpAddr> {
    let trimmed = body.trim();
    trimmed
        .parse::<IpAddr>()
        .map_err(|_| WhitelistError::InvalidAddress(trimmed.to_string()).into())
}
