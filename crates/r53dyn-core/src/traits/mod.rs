//! Collaborator traits for the r53dyn updater
//!
//! - [`DnsProvider`]: Read and upsert zones and address records via a provider API
//! - [`IpSource`]: Discover the caller's current public IPv4 address

pub mod dns_provider;
pub mod ip_source;

pub use dns_provider::{AddressRecord, ChangeStatus, DnsProvider, RecordType, ZoneDescriptor};
pub use ip_source::IpSource;
