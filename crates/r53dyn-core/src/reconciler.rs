//! Address-record reconciliation
//!
//! Reads the current A record for a name and upserts it only when it is
//! absent or points elsewhere. The record is read fresh on every call, so a
//! change made out of band is always seen before the next write decision.

use crate::domain::{DomainName, ZoneId};
use crate::traits::{ChangeStatus, DnsProvider, RecordType};
use std::net::Ipv4Addr;
use tracing::{error, info};

/// TTL written on every upsert, in seconds
pub const RECORD_TTL: u32 = 300;

/// Outcome of a reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No hosted zone owns the name, nothing was read or written
    NoZoneFound,
    /// The record already holds the target address; no upsert was issued
    NoChangeNeeded,
    /// An upsert was accepted
    Updated {
        /// The previous value, or `None` when the record was created
        previous: Option<String>,
        /// The address now written
        new: Ipv4Addr,
        /// Change status reported by the provider
        status: ChangeStatus,
    },
    /// A provider call failed; no partial change was made
    ApiError(String),
}

/// Brings a zone's A record for one name in line with a target address
pub struct RecordReconciler<'a> {
    provider: &'a dyn DnsProvider,
}

impl<'a> RecordReconciler<'a> {
    pub fn new(provider: &'a dyn DnsProvider) -> Self {
        Self { provider }
    }

    /// Reconcile the A record for `name` in `zone` with `ip`
    ///
    /// At most two provider calls: one listing, and one upsert only when the
    /// listed record is missing or differs.
    pub async fn reconcile(&self, zone: &ZoneId, name: &DomainName, ip: Ipv4Addr) -> UpdateOutcome {
        let provider_name = self.provider.provider_name();
        let target = ip.to_string();

        let record = match self.provider.list_records(zone, name, RecordType::A, 1).await {
            Ok(record) => record,
            Err(e) => {
                error!("Error calling {} API: {}", provider_name, e.message());
                return UpdateOutcome::ApiError(e.message().to_string());
            }
        };

        // The listing starts at (`name`, A), so the next record set in
        // provider order, whether another name or another type, means ours
        // does not exist.
        let previous = record.filter(|r| {
            r.record_type == Some(RecordType::A)
                && DomainName::parse(&r.name).is_ok_and(|listed| &listed == name)
        });

        let previous = match previous {
            Some(current) if current.value == target => {
                info!("{} already points to {}", name, ip);
                return UpdateOutcome::NoChangeNeeded;
            }
            Some(current) => {
                info!("Updating {} from {} to {}", name, current.value, ip);
                Some(current.value)
            }
            None => {
                info!("Adding new A record {} pointing to {}", name, ip);
                None
            }
        };

        match self
            .provider
            .upsert_record(zone, name, RecordType::A, RECORD_TTL, &target)
            .await
        {
            Ok(status) => {
                info!("{} change status: {}", provider_name, status);
                UpdateOutcome::Updated {
                    previous,
                    new: ip,
                    status,
                }
            }
            Err(e) => {
                error!("Error calling {} API: {}", provider_name, e.message());
                UpdateOutcome::ApiError(e.message().to_string())
            }
        }
    }
}
