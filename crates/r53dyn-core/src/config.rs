//! Configuration types for the r53dyn updater

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default public IP lookup endpoint (JSON body with an `ip` field)
pub const DEFAULT_IP_LOOKUP_URL: &str = "http://ipinfo.io/json";

/// Driver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Seconds between ticks in continuous mode
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Run a single tick and return
    #[serde(default)]
    pub onetime: bool,

    /// Capacity of the driver event channel
    ///
    /// When full, new events are dropped (with a warning log).
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl DriverConfig {
    /// Validate the driver configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.interval_secs == 0 {
            return Err(crate::Error::config("Update interval must be > 0"));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            onetime: false,
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

/// Public IP lookup configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpLookupConfig {
    /// URL returning a JSON object with an `ip` field
    #[serde(default = "default_ip_lookup_url")]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_ip_lookup_timeout_secs")]
    pub timeout_secs: u64,
}

impl IpLookupConfig {
    /// Validate the IP lookup configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(crate::Error::config(format!(
                "IP lookup URL must use HTTP or HTTPS scheme. Got: {}",
                self.url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("IP lookup timeout must be > 0"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for IpLookupConfig {
    fn default() -> Self {
        Self {
            url: default_ip_lookup_url(),
            timeout_secs: default_ip_lookup_timeout_secs(),
        }
    }
}

fn default_interval_secs() -> u64 {
    1800
}

fn default_event_channel_capacity() -> usize {
    100
}

fn default_ip_lookup_url() -> String {
    DEFAULT_IP_LOOKUP_URL.to_string()
}

fn default_ip_lookup_timeout_secs() -> u64 {
    5
}
