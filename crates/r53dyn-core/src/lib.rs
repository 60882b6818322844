// # r53dyn-core
//
// Core library for the r53dyn dynamic DNS updater.
//
// ## Architecture Overview
//
// - **ZoneResolver**: finds the hosted zone owning a name by probing shorter suffixes
// - **RecordReconciler**: reads the current A record and upserts only on change
// - **Updater**: the polling driver (zone once at startup, then one reconciliation per tick)
// - **DnsProvider** / **IpSource**: collaborator traits implemented by the
//   `r53dyn-provider-route53` and `r53dyn-ip-http` crates
//
// ## Design Principles
//
// 1. **Values, not faults**: the resolver and reconciler turn every provider
//    failure into an outcome value
// 2. **Read before write**: a record is only upserted when it is absent or differs
// 3. **No hidden state**: the record is re-read on every tick; only the zone id is cached
// 4. **No retries in the core**: the next tick is the retry

pub mod config;
pub mod domain;
pub mod driver;
pub mod error;
pub mod reconciler;
pub mod resolver;
pub mod traits;

// Re-export core types for convenience
pub use config::{DriverConfig, IpLookupConfig};
pub use domain::{DomainName, ZoneId};
pub use driver::{DriverEvent, TickOutcome, Updater};
pub use error::{Error, Result};
pub use reconciler::{RECORD_TTL, RecordReconciler, UpdateOutcome};
pub use resolver::{MIN_ZONE_LABELS, ZoneResolution, ZoneResolver};
pub use traits::{AddressRecord, ChangeStatus, DnsProvider, IpSource, RecordType, ZoneDescriptor};
