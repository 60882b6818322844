//! Polling driver
//!
//! The Updater is responsible for:
//! - Resolving the owning hosted zone once at startup
//! - Discovering the public IP on every tick
//! - Handing the IP to the reconciler
//! - Sleeping between ticks until shutdown
//!
//! ## Tick Flow
//!
//! ```text
//! ┌─────────────┐   Ipv4Addr   ┌──────────────────┐   list / upsert   ┌─────────────┐
//! │  IpSource   │─────────────▶│ RecordReconciler │──────────────────▶│ DnsProvider │
//! └─────────────┘              └──────────────────┘                   └─────────────┘
//!        │ RateLimited / Unavailable
//!        ▼
//!   tick skipped
//! ```
//!
//! Ticks never overlap: each one is awaited to completion before the next
//! sleep starts. Shutdown is observed between ticks and while sleeping.

use crate::config::DriverConfig;
use crate::domain::{DomainName, ZoneId};
use crate::error::{Error, Result};
use crate::reconciler::{RecordReconciler, UpdateOutcome};
use crate::resolver::{ZoneResolution, ZoneResolver};
use crate::traits::{DnsProvider, IpSource};
use std::future::Future;
use std::net::Ipv4Addr;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Events emitted by the Updater
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    /// Driver started
    Started { name: DomainName },

    /// Owning hosted zone resolved
    ZoneResolved { zone_id: ZoneId },

    /// Public IP discovered
    IpDiscovered { ip: Ipv4Addr },

    /// Tick skipped because the public IP could not be discovered
    TickSkipped { reason: String },

    /// Reconciliation finished
    Reconciled { outcome: UpdateOutcome },

    /// Driver stopped
    Stopped { reason: String },
}

/// Result of a single tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// IP discovery failed; the core was not called
    Skipped { reason: String },
    /// The reconciler ran (or no zone could be found)
    Reconciled(UpdateOutcome),
}

/// Dynamic DNS updater for a single name
///
/// ## Lifecycle
///
/// 1. Create with [`Updater::new()`]
/// 2. Start with [`Updater::run()`]
/// 3. Runs until SIGINT/SIGTERM, or returns after one tick in one-shot mode
pub struct Updater {
    /// Public IP discovery
    ip_source: Box<dyn IpSource>,

    /// DNS provider holding the zone
    provider: Box<dyn DnsProvider>,

    /// Name whose A record is kept current
    name: DomainName,

    /// Cached owning zone
    zone: Option<ZoneId>,

    config: DriverConfig,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<DriverEvent>,
}

impl Updater {
    /// Create a new updater
    ///
    /// # Returns
    ///
    /// A tuple of (updater, event_receiver) where event_receiver yields driver events
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        name: DomainName,
        config: DriverConfig,
    ) -> Result<(Self, mpsc::Receiver<DriverEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let updater = Self {
            ip_source,
            provider,
            name,
            zone: None,
            config,
            event_tx: tx,
        };

        Ok((updater, rx))
    }

    /// The name this updater manages
    pub fn name(&self) -> &DomainName {
        &self.name
    }

    /// The cached zone, if resolved
    pub fn zone(&self) -> Option<&ZoneId> {
        self.zone.as_ref()
    }

    /// Resolve the owning zone and cache it
    ///
    /// Each call probes the provider again; a previous result is replaced
    /// only on success.
    pub async fn resolve_zone(&mut self) -> ZoneResolution {
        let resolution = ZoneResolver::new(self.provider.as_ref())
            .resolve(&self.name)
            .await;

        if let ZoneResolution::Found(zone_id) = &resolution {
            info!("Using hosted zone {} for {}", zone_id, self.name);
            self.zone = Some(zone_id.clone());
            self.emit_event(DriverEvent::ZoneResolved {
                zone_id: zone_id.clone(),
            });
        }

        resolution
    }

    /// Run one discovery + reconciliation pass
    pub async fn tick(&mut self) -> TickOutcome {
        let ip = match self.ip_source.current().await {
            Ok(ip) => {
                info!("Current IP address: {}", ip);
                self.emit_event(DriverEvent::IpDiscovered { ip });
                ip
            }
            Err(e) => {
                match &e {
                    Error::RateLimited(_) => warn!(
                        "Exceeded the rate limit for {}",
                        self.ip_source.source_name()
                    ),
                    _ => warn!("Error retrieving IP address: {}", e),
                }
                warn!("Could not get IP, skipping this interval");

                let reason = e.to_string();
                self.emit_event(DriverEvent::TickSkipped {
                    reason: reason.clone(),
                });
                return TickOutcome::Skipped { reason };
            }
        };

        let outcome = self.reconcile(ip).await;
        self.emit_event(DriverEvent::Reconciled {
            outcome: outcome.clone(),
        });
        TickOutcome::Reconciled(outcome)
    }

    /// Reconcile against the cached zone, resolving it first if needed
    async fn reconcile(&mut self, ip: Ipv4Addr) -> UpdateOutcome {
        let zone = match self.zone.clone() {
            Some(zone) => zone,
            None => match self.resolve_zone().await {
                ZoneResolution::Found(zone) => zone,
                ZoneResolution::NotFound => return UpdateOutcome::NoZoneFound,
                ZoneResolution::ApiError(message) => return UpdateOutcome::ApiError(message),
            },
        };

        RecordReconciler::new(self.provider.as_ref())
            .reconcile(&zone, &self.name, ip)
            .await
    }

    /// Run the updater until SIGINT/SIGTERM
    ///
    /// Signal handlers are installed before the zone is resolved.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Clean shutdown, or the single tick of a one-shot run finished
    /// - `Err(Error)`: No zone owns the name, or zone lookup failed
    pub async fn run(&mut self) -> Result<()> {
        self.run_internal(shutdown_signal()).await
    }

    /// Run the updater until `shutdown` fires
    ///
    /// Same as [`Updater::run()`] with a caller-controlled shutdown instead
    /// of process signals. Used by embedders and tests.
    pub async fn run_with_shutdown(
        &mut self,
        shutdown: tokio::sync::oneshot::Receiver<()>,
    ) -> Result<()> {
        self.run_internal(async move {
            let _ = shutdown.await;
        })
        .await
    }

    async fn run_internal(&mut self, shutdown: impl Future<Output = ()>) -> Result<()> {
        self.emit_event(DriverEvent::Started {
            name: self.name.clone(),
        });

        match self.resolve_zone().await {
            ZoneResolution::Found(_) => {}
            ZoneResolution::NotFound => {
                return Err(Error::not_found(format!(
                    "Could not find a hosted zone for {}",
                    self.name
                )));
            }
            ZoneResolution::ApiError(message) => {
                return Err(Error::provider(self.provider.provider_name(), message));
            }
        }

        tokio::pin!(shutdown);

        loop {
            let outcome = self.tick().await;
            debug!("Tick finished: {:?}", outcome);

            if self.config.onetime {
                self.emit_event(DriverEvent::Stopped {
                    reason: "One-shot run complete".to_string(),
                });
                return Ok(());
            }

            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    self.emit_event(DriverEvent::Stopped {
                        reason: "Shutdown signal".to_string(),
                    });
                    break;
                }

                _ = tokio::time::sleep(self.config.interval()) => {}
            }
        }

        info!("Thank you for using r53dyn. Have a nice day.");
        Ok(())
    }

    /// Emit a driver event
    fn emit_event(&self, event: DriverEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Event channel full, dropping event. Consider increasing event_channel_capacity.");
            }
            // Nobody is listening
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }
}

/// Install SIGINT/SIGTERM handlers now and return a future resolving on either
///
/// Handlers are registered before the first poll, so a signal arriving
/// during zone resolution or the first tick is still caught.
#[cfg(unix)]
fn shutdown_signal() -> impl Future<Output = ()> + Send + 'static {
    use tokio::signal::unix::{SignalKind, signal};

    let sigterm = signal(SignalKind::terminate())
        .inspect_err(|e| warn!("Failed to setup SIGTERM handler: {}", e))
        .ok();
    let sigint = signal(SignalKind::interrupt())
        .inspect_err(|e| warn!("Failed to setup SIGINT handler: {}", e))
        .ok();

    async move {
        tokio::select! {
            _ = recv_or_pending(sigterm) => {}
            _ = recv_or_pending(sigint) => {}
        }
    }
}

#[cfg(unix)]
async fn recv_or_pending(signal: Option<tokio::signal::unix::Signal>) {
    match signal {
        Some(mut signal) => {
            signal.recv().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Resolves on CTRL-C
#[cfg(not(unix))]
fn shutdown_signal() -> impl Future<Output = ()> + Send + 'static {
    async {
        let _ = tokio::signal::ctrl_c().await;
    }
}
