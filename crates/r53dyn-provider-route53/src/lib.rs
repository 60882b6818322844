// # Route 53 DNS Provider
//
// Implements `DnsProvider` over the Amazon Route 53 API using the AWS SDK.
//
// ## API Mapping
//
// | Capability          | Route 53 operation          | Notes                               |
// |---------------------|-----------------------------|-------------------------------------|
// | `find_zone_by_name` | `ListHostedZonesByName`     | first zone at or after the name     |
// | `list_records`      | `ListResourceRecordSets`    | start name + start type, max items  |
// | `upsert_record`     | `ChangeResourceRecordSets`  | one `UPSERT` change per batch       |
//
// Route 53 returns hosted-zone ids as `/hostedzone/Z123...`; only the final
// path segment is kept, which is what every other operation expects.
//
// ## Constraints
//
// - One API call per trait method; no retries (the driver's next tick retries)
// - Credentials come from the standard AWS provider chain and never appear in logs
// - Dry-run mode performs the reads but skips `ChangeResourceRecordSets`

use async_trait::async_trait;
use aws_sdk_route53::Client;
use aws_sdk_route53::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};
use r53dyn_core::traits::{AddressRecord, ChangeStatus, DnsProvider, RecordType, ZoneDescriptor};
use r53dyn_core::{DomainName, Error, Result, ZoneId};

const PROVIDER_NAME: &str = "route53";

/// Comment attached to every change batch
const CHANGE_COMMENT: &str = "Record updated by r53dyn";

/// Route 53 DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform all list requests (zone lookup, record lookup)
/// - Log the intended change
/// - **NOT** submit the change, returning [`ChangeStatus::DryRun`]
pub struct Route53Provider {
    client: Client,

    /// Dry-run mode: if true, perform reads but skip the upsert
    dry_run: bool,
}

// The SDK client holds resolved credentials; keep them out of Debug output
impl std::fmt::Debug for Route53Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Provider")
            .field("client", &"<REDACTED>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Route53Provider {
    /// Create a provider around an existing SDK client
    pub fn new(client: Client, dry_run: bool) -> Self {
        Self { client, dry_run }
    }

    /// Create a provider from the standard AWS environment
    ///
    /// Region and credentials are resolved the usual way (environment
    /// variables, shared config files, instance metadata).
    pub async fn from_env(dry_run: bool) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), dry_run)
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[async_trait]
impl DnsProvider for Route53Provider {
    async fn find_zone_by_name(
        &self,
        name: &DomainName,
        limit: u32,
    ) -> Result<Option<ZoneDescriptor>> {
        tracing::debug!("ListHostedZonesByName dns_name={} max_items={}", name, limit);

        let output = self
            .client
            .list_hosted_zones_by_name()
            .dns_name(name.as_str())
            .max_items(max_items(limit))
            .send()
            .await
            .map_err(api_error)?;

        Ok(output.hosted_zones().first().map(|zone| ZoneDescriptor {
            id: ZoneId::new(strip_zone_id(zone.id())),
            name: zone.name().to_string(),
        }))
    }

    async fn list_records(
        &self,
        zone_id: &ZoneId,
        start_name: &DomainName,
        record_type: RecordType,
        limit: u32,
    ) -> Result<Option<AddressRecord>> {
        tracing::debug!(
            "ListResourceRecordSets zone={} start={} type={} max_items={}",
            zone_id,
            start_name,
            record_type,
            limit
        );

        let output = self
            .client
            .list_resource_record_sets()
            .hosted_zone_id(zone_id.as_str())
            .start_record_name(start_name.as_str())
            .start_record_type(rr_type(record_type))
            .max_items(max_items(limit))
            .send()
            .await
            .map_err(api_error)?;

        Ok(output
            .resource_record_sets()
            .first()
            .map(|set| AddressRecord {
                name: set.name().to_string(),
                record_type: self::record_type(set.r#type()),
                value: set
                    .resource_records()
                    .first()
                    .map(|record| record.value().to_string())
                    .unwrap_or_default(),
                ttl: set.ttl(),
            }))
    }

    async fn upsert_record(
        &self,
        zone_id: &ZoneId,
        name: &DomainName,
        record_type: RecordType,
        ttl: u32,
        value: &str,
    ) -> Result<ChangeStatus> {
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would UPSERT {} {} {} (ttl {}) in zone {}",
                name,
                record_type,
                value,
                ttl,
                zone_id
            );
            return Ok(ChangeStatus::DryRun);
        }

        let record_set = ResourceRecordSet::builder()
            .name(name.as_str())
            .r#type(rr_type(record_type))
            .ttl(i64::from(ttl))
            .resource_records(ResourceRecord::builder().value(value).build().map_err(build_error)?)
            .build()
            .map_err(build_error)?;

        let change = Change::builder()
            .action(ChangeAction::Upsert)
            .resource_record_set(record_set)
            .build()
            .map_err(build_error)?;

        let batch = ChangeBatch::builder()
            .comment(CHANGE_COMMENT)
            .changes(change)
            .build()
            .map_err(build_error)?;

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(zone_id.as_str())
            .change_batch(batch)
            .send()
            .await
            .map_err(api_error)?;

        Ok(output
            .change_info()
            .map(|info| change_status(info.status().as_str()))
            .unwrap_or_else(|| ChangeStatus::Other("UNKNOWN".to_string())))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// `/hostedzone/Z123` → `Z123`
fn strip_zone_id(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

fn change_status(status: &str) -> ChangeStatus {
    match status {
        "PENDING" => ChangeStatus::Pending,
        "INSYNC" => ChangeStatus::InSync,
        other => ChangeStatus::Other(other.to_string()),
    }
}

fn rr_type(record_type: RecordType) -> RrType {
    match record_type {
        RecordType::A => RrType::A,
    }
}

/// The listed set's type, if it is one the core models
fn record_type(rr_type: &RrType) -> Option<RecordType> {
    match rr_type {
        RrType::A => Some(RecordType::A),
        _ => None,
    }
}

fn max_items(limit: u32) -> i32 {
    i32::try_from(limit).unwrap_or(i32::MAX)
}

/// Flatten an SDK failure to the service's own message where it has one
fn api_error<E, R>(err: SdkError<E, R>) -> Error
where
    E: std::error::Error + ProvideErrorMetadata + 'static,
    R: std::fmt::Debug,
{
    let message = match err.message() {
        Some(message) => message.to_string(),
        None => DisplayErrorContext(&err).to_string(),
    };
    Error::provider(PROVIDER_NAME, message)
}

fn build_error(err: aws_sdk_route53::error::BuildError) -> Error {
    Error::provider(PROVIDER_NAME, format!("Invalid change request: {}", err))
}
