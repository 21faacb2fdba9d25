//! Daemon lifecycle
//!
//! Startup sends the static station data and the AF list, then independent
//! workers keep the PS, RT and clock groups on air until shutdown:
//!
//! ```text
//! initialize ──> spawn PS / RT / CT workers ──> shutdown signal ──> join
//! ```
//!
//! Workers share one [`Transmitter`](crate::transport::Transmitter), so their
//! frames are serialized on the link. Shutdown is broadcast on a `watch`
//! channel that every worker also selects on while sleeping.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use time::{OffsetDateTime, UtcOffset};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{seconds, Config};
use crate::display::{PsDisplay, RtDisplay, RT_FILE_POLL};
use crate::encoder::RdsEncoder;
use crate::error::DaemonError;
use crate::transport::{Connector, LinkMode, SerialConnector, Transmitter};

/// RDS encoder daemon
pub struct Daemon<C: Connector> {
    config: Config,
    encoder: Arc<RdsEncoder<C>>,
    clock_offset: UtcOffset,
}

impl Daemon<SerialConnector> {
    /// Daemon writing to the serial port named in the configuration
    pub fn serial(config: Config) -> Self {
        let connector = SerialConnector::new(config.serial.port.clone(), config.serial.baudrate);
        Self::new(config, connector)
    }
}

impl<C: Connector> Daemon<C> {
    pub fn new(config: Config, connector: C) -> Self {
        let mode = if config.serial.keep_open {
            LinkMode::Persistent
        } else {
            LinkMode::PerFrame
        };
        let transmitter = Arc::new(Transmitter::new(connector, mode, config.settle_delay()));
        let encoder = Arc::new(RdsEncoder::new(
            transmitter,
            config.station_config(),
            config.clock.variant,
        ));

        Self {
            config,
            encoder,
            clock_offset: UtcOffset::UTC,
        }
    }

    /// Offset applied to the clock group timestamps (UTC by default)
    pub fn with_clock_offset(mut self, offset: UtcOffset) -> Self {
        self.clock_offset = offset;
        self
    }

    /// Send the static station data, then the AF list when enabled
    ///
    /// Any failure here aborts startup.
    pub async fn initialize(&self) -> Result<(), DaemonError> {
        info!("Initializing RDS encoder");
        self.encoder.send_static_init().await?;

        if self.config.af.enable {
            let af = &self.config.af;
            match self
                .encoder
                .send_af(&af.alternate_frequencies, af.policy())
                .await?
            {
                Some(count) => info!("AF list sent ({} entries)", count),
                None => warn!("AF enabled but no valid frequency configured"),
            }
        }
        Ok(())
    }

    /// Spawn the periodic workers
    ///
    /// PS and RT always run; the clock worker runs when enabled.
    pub fn spawn_workers(&self, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        let mut workers = vec![
            tokio::spawn(ps_worker(
                Arc::clone(&self.encoder),
                PsDisplay::from_settings(&self.config.display.ps),
                shutdown.clone(),
            )),
            tokio::spawn(rt_worker(
                Arc::clone(&self.encoder),
                RtDisplay::from_settings(&self.config.display.rt),
                shutdown.clone(),
            )),
        ];

        if self.config.clock.enable {
            workers.push(tokio::spawn(clock_worker(
                Arc::clone(&self.encoder),
                seconds(self.config.clock.interval_seconds),
                self.clock_offset,
                shutdown,
            )));
        }
        workers
    }

    /// Run until `shutdown_signal` completes
    ///
    /// Initializes the encoder, runs the workers, then stops them and waits
    /// for each to finish before returning.
    pub async fn run<F>(self, shutdown_signal: F) -> Result<(), DaemonError>
    where
        F: Future<Output = ()>,
    {
        self.initialize().await?;

        let (stop_tx, stop_rx) = watch::channel(false);
        let workers = self.spawn_workers(stop_rx);
        info!("{} workers running", workers.len());

        shutdown_signal.await;
        info!("Shutting down");
        let _ = stop_tx.send(true);

        for worker in workers {
            if let Err(e) = worker.await {
                warn!("Worker task failed: {}", e);
            }
        }
        self.encoder.transmitter().close().await;

        info!("Daemon exited");
        Ok(())
    }
}

/// Sleep for `period` or until shutdown; returns true when shutting down
async fn wait_or_shutdown(shutdown: &mut watch::Receiver<bool>, period: Duration) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(period) => false,
        _ = shutdown.wait_for(|stop| *stop) => true,
    }
}

async fn ps_worker<C: Connector>(
    encoder: Arc<RdsEncoder<C>>,
    mut display: PsDisplay,
    mut shutdown: watch::Receiver<bool>,
) {
    let frame_count = display.len();
    debug!("PS worker started ({} frames)", frame_count);
    while !*shutdown.borrow() {
        if let Some(text) = display.next_frame() {
            match encoder.send_ps(text).await {
                Ok(()) => info!("Sent PS: {}", text),
                Err(e) => warn!("Failed to send PS: {}", e),
            }
        }
        if wait_or_shutdown(&mut shutdown, display.hold()).await {
            break;
        }
    }
    debug!("PS worker stopped");
}

async fn rt_worker<C: Connector>(
    encoder: Arc<RdsEncoder<C>>,
    mut display: RtDisplay,
    mut shutdown: watch::Receiver<bool>,
) {
    debug!("RT worker started");
    while !*shutdown.borrow() {
        let text = display.next_text().await;
        match encoder.send_rt(&text).await {
            Ok(()) => info!("Sent RT: {}", text.trim_end()),
            Err(e) => warn!("Failed to send RT: {}", e),
        }
        if wait_for_rt_update(&display, &mut shutdown).await {
            break;
        }
    }
    debug!("RT worker stopped");
}

/// Wait out the RT interval, checking a configured file every
/// [`RT_FILE_POLL`] and returning early when it changes; returns true when
/// shutting down
async fn wait_for_rt_update(display: &RtDisplay, shutdown: &mut watch::Receiver<bool>) -> bool {
    let deadline = Instant::now() + display.interval();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return false;
        }
        let step = if display.watches_file() {
            remaining.min(RT_FILE_POLL)
        } else {
            remaining
        };
        if wait_or_shutdown(shutdown, step).await {
            return true;
        }
        if display.file_changed().await {
            debug!("RT file changed");
            return false;
        }
    }
}

async fn clock_worker<C: Connector>(
    encoder: Arc<RdsEncoder<C>>,
    interval: Duration,
    offset: UtcOffset,
    mut shutdown: watch::Receiver<bool>,
) {
    debug!("CT worker started");
    while !*shutdown.borrow() {
        let now = OffsetDateTime::now_utc().to_offset(offset);
        match encoder.send_clock(now).await {
            Ok(()) => info!("Sent CT: {}", now),
            Err(e) => warn!("Failed to send CT: {}", e),
        }
        if wait_or_shutdown(&mut shutdown, interval).await {
            break;
        }
    }
    debug!("CT worker stopped");
}
