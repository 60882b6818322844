//! Hosted-zone resolution
//!
//! Finds the zone that owns a name by probing progressively shorter
//! suffixes. Providers answer a by-name zone query with the *closest* zone
//! in their ordering, so every answer is checked for an exact, label-wise
//! match before it is trusted.

use crate::domain::{DomainName, ZoneId};
use crate::traits::DnsProvider;
use tracing::{debug, error};

/// Shortest suffix probed, in labels excluding the root
///
/// `example.com.` is a candidate zone; a bare `com.` never is.
pub const MIN_ZONE_LABELS: usize = 2;

/// Outcome of a zone resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneResolution {
    /// The zone that owns the name
    Found(ZoneId),
    /// No probed suffix is a hosted zone
    NotFound,
    /// A provider call failed; resolution stopped at that probe
    ApiError(String),
}

/// Resolves the hosted zone owning a fully-qualified name
pub struct ZoneResolver<'a> {
    provider: &'a dyn DnsProvider,
}

impl<'a> ZoneResolver<'a> {
    pub fn new(provider: &'a dyn DnsProvider) -> Self {
        Self { provider }
    }

    /// Resolve the zone for `domain`
    ///
    /// Probes `domain` itself first, then each shorter suffix down to
    /// [`MIN_ZONE_LABELS`] labels, one provider call per probe. Stops at the
    /// first exact match or the first failed call.
    pub async fn resolve(&self, domain: &DomainName) -> ZoneResolution {
        for candidate in domain.suffixes(MIN_ZONE_LABELS) {
            debug!("Probing {} for hosted zone {}", self.provider.provider_name(), candidate);

            let zone = match self.provider.find_zone_by_name(&candidate, 1).await {
                Ok(zone) => zone,
                Err(e) => {
                    error!("Error calling {} API: {}", self.provider.provider_name(), e.message());
                    return ZoneResolution::ApiError(e.message().to_string());
                }
            };

            match zone {
                Some(zone) if is_exact(&zone.name, &candidate) => {
                    debug!("Found hosted zone {} ({})", candidate, zone.id);
                    return ZoneResolution::Found(zone.id);
                }
                Some(zone) => {
                    debug!("Closest zone {} does not match {}", zone.name, candidate);
                }
                None => {
                    debug!("No hosted zone returned for {}", candidate);
                }
            }
        }

        error!("Could not find a hosted zone for {}", domain);
        ZoneResolution::NotFound
    }
}

/// Whether a provider-reported zone name is label-exact to `candidate`
fn is_exact(reported: &str, candidate: &DomainName) -> bool {
    DomainName::parse(reported).is_ok_and(|name| &name == candidate)
}
