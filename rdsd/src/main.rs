//! RDS Encoder Daemon
//!
//! Feeds station data from a YAML configuration file to a serial-attached
//! RDS encoder until interrupted.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rds_daemon::{available_ports, Config, Daemon};
use time::UtcOffset;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "rdsd", version, about = "UECP RDS encoder daemon")]
struct Args {
    /// YAML configuration file
    #[arg(long, value_name = "PATH", required_unless_present = "list_ports")]
    cfg: Option<PathBuf>,

    /// Log every frame as hex
    #[arg(long)]
    debug: bool,

    /// Print the available serial ports and exit
    #[arg(long)]
    list_ports: bool,
}

impl Args {
    fn default_filter(&self) -> &'static str {
        if self.debug {
            "rdsd=debug,rds_daemon=debug,uecp_protocol=debug"
        } else {
            "rdsd=info,rds_daemon=info,uecp_protocol=info"
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.default_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if args.list_ports {
        for port in available_ports()? {
            println!("{}", port);
        }
        return Ok(());
    }

    let path = args.cfg.context("--cfg is required")?;
    let config = Config::load(&path)?;
    info!("Config loaded from {}", path.display());
    for line in config.summary().lines() {
        info!("{}", line);
    }

    // Must run before the runtime spawns its worker threads
    let offset = UtcOffset::current_local_offset().unwrap_or_else(|e| {
        warn!("Local UTC offset unavailable ({}), clock group uses UTC", e);
        UtcOffset::UTC
    });

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(
        Daemon::serial(config)
            .with_clock_offset(offset)
            .run(shutdown_signal()),
    )?;
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("Interrupted, shutting down");
}
