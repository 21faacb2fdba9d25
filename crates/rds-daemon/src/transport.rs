//! Frame transport to the RDS encoder
//!
//! A [`Transmitter`] owns the link to the encoder and serializes every frame
//! write: the link is held from connect through write, flush and the settle
//! delay, so frames from concurrent workers never interleave on the wire.
//!
//! Links are opened through a [`Connector`]. [`SerialConnector`] opens the
//! serial port with `tokio_serial`; [`MemoryConnector`] records frames in
//! memory for running without hardware.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, warn};

use crate::error::TransportError;

/// Opens links to the encoder
pub trait Connector: Send + Sync + 'static {
    /// Writable link type
    type Io: AsyncWrite + Unpin + Send;

    /// Open a new link
    fn connect(&self) -> impl Future<Output = Result<Self::Io, TransportError>> + Send;

    /// Name of the link target for logs
    fn target(&self) -> &str;
}

/// When the link is released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkMode {
    /// Open the link for each frame and close it afterwards
    #[default]
    PerFrame,
    /// Keep the link open; it is dropped after a failed write and reopened on
    /// the next frame
    Persistent,
}

/// Serial port connector
#[derive(Debug, Clone)]
pub struct SerialConnector {
    port: String,
    baud_rate: u32,
}

impl SerialConnector {
    /// Create a connector for `port` at `baud_rate`
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
        }
    }
}

impl Connector for SerialConnector {
    type Io = SerialStream;

    fn connect(&self) -> impl Future<Output = Result<Self::Io, TransportError>> + Send {
        let port = self.port.clone();
        let baud_rate = self.baud_rate;
        async move {
            tokio_serial::new(&port, baud_rate)
                .timeout(Duration::from_secs(1))
                .open_native_async()
                .map_err(|source| TransportError::Open { port, source })
        }
    }

    fn target(&self) -> &str {
        &self.port
    }
}

/// Names of the serial ports present on this machine
pub fn available_ports() -> Result<Vec<String>, TransportError> {
    Ok(serialport::available_ports()?
        .into_iter()
        .map(|p| p.port_name)
        .collect())
}

/// Serialized, settle-delayed frame writer
pub struct Transmitter<C: Connector> {
    connector: C,
    mode: LinkMode,
    settle_delay: Duration,
    link: Mutex<Option<C::Io>>,
}

impl<C: Connector> Transmitter<C> {
    /// Create a transmitter; no link is opened until the first frame
    pub fn new(connector: C, mode: LinkMode, settle_delay: Duration) -> Self {
        Self {
            connector,
            mode,
            settle_delay,
            link: Mutex::new(None),
        }
    }

    /// Write one frame, then wait out the settle delay
    ///
    /// Concurrent callers are queued; the next frame starts only after the
    /// previous one's settle delay has elapsed.
    pub async fn send(&self, frame: &[u8]) -> Result<(), TransportError> {
        let mut link = self.link.lock().await;

        let mut io = match link.take() {
            Some(io) => io,
            None => {
                debug!("Opening link to {}", self.connector.target());
                self.connector.connect().await?
            }
        };

        if let Err(e) = write_frame(&mut io, frame).await {
            warn!(
                "Write to {} failed, dropping link: {}",
                self.connector.target(),
                e
            );
            return Err(e.into());
        }
        debug!("Wrote {} bytes to {}", frame.len(), self.connector.target());

        if self.mode == LinkMode::Persistent {
            *link = Some(io);
        }

        tokio::time::sleep(self.settle_delay).await;
        Ok(())
    }

    /// Drop any open link
    pub async fn close(&self) {
        if self.link.lock().await.take().is_some() {
            debug!("Closed link to {}", self.connector.target());
        }
    }
}

async fn write_frame<W: AsyncWrite + Unpin>(io: &mut W, frame: &[u8]) -> io::Result<()> {
    io.write_all(frame).await?;
    io.flush().await
}

/// In-memory connector recording each flushed frame
///
/// Clones share the same recording, so a clone kept by the caller observes
/// everything written through the transmitter.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    frames: Arc<StdMutex<Vec<Vec<u8>>>>,
    connects: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryConnector {
    /// Create an empty recording
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames flushed so far
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of links opened so far
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Make writes on links opened from now on fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl Connector for MemoryConnector {
    type Io = MemoryLink;

    fn connect(&self) -> impl Future<Output = Result<Self::Io, TransportError>> + Send {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let link = MemoryLink {
            pending: Vec::new(),
            frames: Arc::clone(&self.frames),
            fail: self.fail_writes.load(Ordering::SeqCst),
        };
        async move { Ok(link) }
    }

    fn target(&self) -> &str {
        "memory"
    }
}

/// Link opened by [`MemoryConnector`]
#[derive(Debug)]
pub struct MemoryLink {
    pending: Vec<u8>,
    frames: Arc<StdMutex<Vec<Vec<u8>>>>,
    fail: bool,
}

impl AsyncWrite for MemoryLink {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.fail {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "memory link closed",
            )));
        }
        self.pending.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        if !self.pending.is_empty() {
            let frame = std::mem::take(&mut self.pending);
            self.frames
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(frame);
        }
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.poll_flush(cx)
    }
}
