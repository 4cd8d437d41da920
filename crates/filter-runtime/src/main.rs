//! # Username Filter Runtime
//!
//! Runs one availability checker for the lifetime of the process.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from `UF_*` environment variables
//! 2. Initialize logging
//! 3. Create the registry and the availability service
//! 4. Hydrate the filter: snapshot file if present, otherwise the registry
//! 5. Serve the stdin line protocol (see `commands`)
//!
//! ## Shutdown Sequence
//!
//! On end of input, `quit` or Ctrl+C the current filter state is written to
//! `UF_SNAPSHOT_PATH` (when set) so the next start skips the rebuild.

mod commands;
mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

use username_filter::{
    AvailabilityService, FileSnapshotSource, InMemoryUsernameRegistry, RegistrySnapshotSource,
    UsernameAvailabilityApi,
};

use crate::commands::{render_result, render_stats, Command, FilterStats};
use crate::config::{load_config, RuntimeConfig};

/// The process-wide availability checker and its collaborators
struct FilterRuntime {
    registry: Arc<InMemoryUsernameRegistry>,
    service: AvailabilityService<InMemoryUsernameRegistry>,
    snapshot_file: Option<FileSnapshotSource>,
    config: RuntimeConfig,
}

impl FilterRuntime {
    fn new(config: RuntimeConfig) -> Result<Self> {
        let registry = Arc::new(InMemoryUsernameRegistry::seeded());
        let service = AvailabilityService::new(Arc::clone(&registry), config.availability.clone())
            .context("Failed to create availability service")?;
        let snapshot_file = config.snapshot_path.clone().map(FileSnapshotSource::new);

        Ok(Self {
            registry,
            service,
            snapshot_file,
            config,
        })
    }

    /// Warm the filter before serving any check
    async fn hydrate(&self) -> Result<()> {
        if let Some(file) = &self.snapshot_file {
            if file.exists().await {
                match self.service.hydrate(file).await {
                    Ok(()) => {
                        info!(path = %file.path().display(), "Hydrated from snapshot file");
                        return Ok(());
                    }
                    Err(e) => {
                        warn!(path = %file.path().display(), error = %e, "Snapshot file unusable, rebuilding from registry");
                    }
                }
            }
        }

        let source = RegistrySnapshotSource::new(
            Arc::clone(&self.registry),
            self.config.availability.filter.clone(),
        );
        self.service
            .hydrate(&source)
            .await
            .context("Failed to hydrate filter from registry")?;
        info!(usernames = self.registry.len(), "Hydrated from registry");
        Ok(())
    }

    /// Serve commands until end of input, `quit` or Ctrl+C
    async fn serve(&self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read stdin")? else {
                        info!("End of input");
                        break;
                    };
                    if !self.handle_line(&line).await {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }
        Ok(())
    }

    /// Run one protocol line; false once the client asked to quit
    async fn handle_line(&self, line: &str) -> bool {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return true,
            Err(e) => {
                println!("error: {}", e);
                return true;
            }
        };

        match command {
            Command::Check(username) => {
                let result = self.service.check_availability(&username).await;
                println!("{}", render_result(&result));
            }
            Command::Register(username) => {
                let result = self.service.register_username(&username).await;
                println!("{}", render_result(&result));
            }
            Command::Stats => {
                let (size_bits, hash_count, bits_set) = self.service.filter().stats();
                let filter = FilterStats {
                    size_bits,
                    hash_count,
                    bits_set,
                    false_positive_probability: self.service.filter().false_positive_probability(),
                };
                println!("{}", render_stats(&filter, &self.service.metrics().snapshot()));
            }
            Command::Quit => return false,
        }
        true
    }

    /// Persist the filter state if a snapshot path is configured
    async fn shutdown(&self) {
        info!("Initiating shutdown...");

        if let Some(file) = &self.snapshot_file {
            let snapshot = self.service.export_filter_state();
            if let Err(e) = file.persist(&snapshot).await {
                error!(path = %file.path().display(), error = %e, "Failed to persist filter snapshot");
            }
        }

        let metrics = self.service.metrics();
        info!(
            probes = metrics.snapshot().probes,
            observed_false_positive_rate = metrics.observed_false_positive_rate(),
            "Shutdown complete"
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let loaded = load_config().context("Invalid configuration")?;

    // Initialize logging; stdout carries protocol replies
    let subscriber = FmtSubscriber::builder()
        .with_max_level(loaded.config.log_level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    for problem in &loaded.ignored {
        warn!("{}", problem);
    }

    info!("===========================================");
    info!("  Username Filter Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let runtime = FilterRuntime::new(loaded.config)?;
    runtime.hydrate().await?;

    info!("Ready. Commands: check <name>, register <name>, stats, quit");
    let served = runtime.serve().await;

    // Persist even when serving stopped on an error
    runtime.shutdown().await;
    served
}
