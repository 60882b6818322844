// # r53dynd - Route 53 dynamic DNS daemon
//
// A thin integration layer: parses configuration, sets up logging and the
// runtime, wires the Route 53 provider and the HTTP IP source into an
// `Updater`, and maps the result to an exit code. All DNS logic lives in
// `r53dyn-core`.
//
// ## Configuration
//
// Every option is a command-line flag that can also be set from the
// environment:
//
// - `FQDN` / `R53DYN_FQDN`: name whose A record is kept current
// - `--onetime` / `R53DYN_ONETIME`: update once and exit
// - `--interval` / `R53DYN_INTERVAL_SECS`: seconds between checks (default 1800)
// - `--ip-url` / `R53DYN_IP_URL`: IP lookup service (default http://ipinfo.io/json)
// - `--dry-run` / `R53DYN_DRY_RUN`: read zones and records, never write
// - `--log-level` / `R53DYN_LOG_LEVEL`: trace, debug, info, warn, error
//
// AWS region and credentials come from the standard AWS environment.
//
// ## Example
//
// ```bash
// export AWS_PROFILE=dyndns
// r53dynd home.example.com
// ```

use anyhow::{Context, Result};
use clap::Parser;
use r53dyn_core::{DomainName, DriverConfig, DriverEvent, IpLookupConfig, Updater};
use r53dyn_ip_http::HttpIpSource;
use r53dyn_provider_route53::Route53Provider;
use std::process::ExitCode;
use tokio::sync::mpsc;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration error, or the owning hosted zone could not be resolved
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum R53dynExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<R53dynExitCode> for ExitCode {
    fn from(code: R53dynExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Keep a Route 53 A record pointed at this host's public IPv4 address.
#[derive(Debug, Parser)]
#[command(version, about, max_term_width = 100)]
struct Args {
    /// The FQDN to point your IP to.
    #[arg(env = "R53DYN_FQDN", value_name = "FQDN")]
    fqdn: String,

    /// Update the DNS entry and exit.
    #[arg(long, env = "R53DYN_ONETIME")]
    onetime: bool,

    /// Seconds to sleep between checks.
    #[arg(long, env = "R53DYN_INTERVAL_SECS", value_name = "SECS", default_value_t = 1800)]
    interval: u64,

    /// Public IP lookup service returning JSON with an "ip" field.
    #[arg(long, env = "R53DYN_IP_URL", value_name = "URL", default_value = r53dyn_core::config::DEFAULT_IP_LOOKUP_URL)]
    ip_url: String,

    /// Look up zones and records but never change them.
    #[arg(short = 'n', long, env = "R53DYN_DRY_RUN")]
    dry_run: bool,

    /// Controls the verbosity of logs.
    ///
    /// Possible log levels are 'error', 'warn', 'info', 'debug', and 'trace'.
    #[arg(long, env = "R53DYN_LOG_LEVEL", value_name = "LEVEL", default_value = "info")]
    log_level: Level,
}

impl Args {
    fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            interval_secs: self.interval,
            onetime: self.onetime,
            ..DriverConfig::default()
        }
    }

    fn ip_lookup_config(&self) -> IpLookupConfig {
        IpLookupConfig {
            url: self.ip_url.clone(),
            ..IpLookupConfig::default()
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return R53dynExitCode::ConfigError.into();
    }

    let name = match DomainName::parse(&args.fqdn) {
        Ok(name) => name,
        Err(e) => {
            error!("Invalid FQDN '{}': {}", args.fqdn, e);
            return R53dynExitCode::ConfigError.into();
        }
    };

    let driver_config = args.driver_config();
    let ip_config = args.ip_lookup_config();
    if let Err(e) = driver_config.validate().and_then(|_| ip_config.validate()) {
        error!("Configuration validation error: {}", e);
        return R53dynExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return R53dynExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run_daemon(name, driver_config, ip_config, args.dry_run).await {
            Ok(()) => R53dynExitCode::CleanShutdown,
            Err(e) if is_startup_failure(&e) => {
                error!("{:#}", e);
                R53dynExitCode::ConfigError
            }
            Err(e) => {
                error!("Daemon error: {:#}", e);
                R53dynExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Run the daemon
async fn run_daemon(
    name: DomainName,
    driver_config: DriverConfig,
    ip_config: IpLookupConfig,
    dry_run: bool,
) -> Result<()> {
    info!("Starting r53dynd for {}", name);

    let ip_source = HttpIpSource::new(&ip_config).context("Failed to create IP source")?;
    info!("IP lookup service: {}", ip_source.url());

    let provider = Route53Provider::from_env(dry_run).await;
    if provider.is_dry_run() {
        tracing::warn!("Route 53 provider running in DRY-RUN mode - no changes will be made");
    }

    let (mut updater, events) = Updater::new(
        Box::new(ip_source),
        Box::new(provider),
        name,
        driver_config,
    )?;

    tokio::spawn(log_events(events));

    updater.run().await?;
    Ok(())
}

/// Drain driver events so the channel never fills
async fn log_events(mut events: mpsc::Receiver<DriverEvent>) {
    while let Some(event) = events.recv().await {
        debug!("Driver event: {:?}", event);
    }
}

/// Failures that mean the daemon could never have worked as configured
///
/// `Updater::run` only fails while resolving the zone at startup, so a
/// provider error reaching here is a failed zone lookup.
fn is_startup_failure(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<r53dyn_core::Error>(),
        Some(
            r53dyn_core::Error::NotFound(_)
                | r53dyn_core::Error::Config(_)
                | r53dyn_core::Error::Provider { .. }
        )
    )
}
