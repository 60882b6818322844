// # DNS Provider Trait
//
// Defines the three provider capabilities the resolver and reconciler consume.
//
// ## Implementations
//
// - Route 53: `r53dyn-provider-route53` crate
//
// ## Usage
//
// ```rust,ignore
// use r53dyn_core::{DnsProvider, DomainName, RecordType};
//
// let provider = /* DnsProvider implementation */;
// let name = DomainName::parse("example.com")?;
//
// if let Some(zone) = provider.find_zone_by_name(&name, 1).await? {
//     println!("closest zone: {} ({})", zone.name, zone.id);
// }
// ```

use crate::domain::{DomainName, ZoneId};
use async_trait::async_trait;
use std::fmt;

/// A hosted zone as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneDescriptor {
    /// Provider-issued zone identifier
    pub id: ZoneId,
    /// The zone's name, verbatim from the provider
    pub name: String,
}

/// An address record as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    /// The record's name, verbatim from the provider
    pub name: String,
    /// The record set's type; `None` for types this crate does not model
    pub record_type: Option<RecordType>,
    /// The first value of the record set
    pub value: String,
    /// Time-to-live in seconds (absent for alias records)
    pub ttl: Option<i64>,
}

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// IPv4 address record
    A,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-reported status of a submitted change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeStatus {
    /// Accepted, not yet propagated to all authoritative servers
    Pending,
    /// Propagated to all authoritative servers
    InSync,
    /// Not submitted: the provider runs in dry-run mode
    DryRun,
    /// A status this crate does not know about
    Other(String),
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeStatus::Pending => f.write_str("PENDING"),
            ChangeStatus::InSync => f.write_str("INSYNC"),
            ChangeStatus::DryRun => f.write_str("DRY-RUN"),
            ChangeStatus::Other(status) => f.write_str(status),
        }
    }
}

/// Trait for DNS provider implementations
///
/// Each method is a single API round-trip. Implementations must not retry,
/// cache, or decide whether a change is needed; those decisions belong to
/// [`ZoneResolver`](crate::ZoneResolver) and
/// [`RecordReconciler`](crate::RecordReconciler), and retry is simply the
/// next tick of the driver.
///
/// Every failure is reported as an `Err` carrying a human-readable message.
/// The core turns it into an `ApiError` outcome.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Find the hosted zone closest to `name`
    ///
    /// Providers may return a zone that is *not* an exact match (the next
    /// zone in their ordering). Callers must compare names themselves.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ZoneDescriptor))`: the first zone at or after `name`
    /// - `Ok(None)`: the provider returned no zones
    /// - `Err(Error)`: the API call failed
    async fn find_zone_by_name(
        &self,
        name: &DomainName,
        limit: u32,
    ) -> Result<Option<ZoneDescriptor>, crate::Error>;

    /// List the first record set at or after (`start_name`, `record_type`)
    ///
    /// Like zone lookup, the returned record may belong to a different name,
    /// or to the same name with a different type.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(AddressRecord))`: the first record in provider order
    /// - `Ok(None)`: no records at or after `start_name`
    /// - `Err(Error)`: the API call failed
    async fn list_records(
        &self,
        zone_id: &ZoneId,
        start_name: &DomainName,
        record_type: RecordType,
        limit: u32,
    ) -> Result<Option<AddressRecord>, crate::Error>;

    /// Create or overwrite the record set at `name` in one atomic change
    ///
    /// # Returns
    ///
    /// - `Ok(ChangeStatus)`: the change was accepted
    /// - `Err(Error)`: the change was rejected; the record is untouched
    async fn upsert_record(
        &self,
        zone_id: &ZoneId,
        name: &DomainName,
        record_type: RecordType,
        ttl: u32,
        value: &str,
    ) -> Result<ChangeStatus, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
