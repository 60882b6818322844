// # IP Source Trait
//
// Defines the interface for discovering the caller's public IPv4 address.
//
// ## Implementations
//
// - HTTP lookup service: `r53dyn-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use r53dyn_core::{Error, IpSource};
//
// match source.current().await {
//     Ok(ip) => println!("public address: {ip}"),
//     Err(Error::RateLimited(msg)) => println!("try again later: {msg}"),
//     Err(e) => println!("lookup failed: {e}"),
// }
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for IP source implementations
///
/// # Failure Modes
///
/// - `Error::RateLimited`: the lookup service throttled the request
/// - `Error::IpSource`: anything else (unreachable, bad payload, not IPv4)
///
/// Either way the driver skips the tick; sources must not retry on their own.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Look up the current public IPv4 address
    async fn current(&self) -> Result<Ipv4Addr, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
