//! RDS Encoder Daemon
//!
//! This crate drives a serial-attached RDS encoder with UECP frames built by
//! [`uecp_protocol`].
//!
//! # Architecture
//!
//! - [`config`]: YAML configuration with defaults and validation
//! - [`transport`]: serialized frame writes over a [`Connector`] with a
//!   settle delay after every frame
//! - [`encoder`]: station-bound session turning field updates into frames
//! - [`display`]: PS scroll / cycle schedule and RadioText selection
//! - [`daemon`]: static initialisation and the periodic PS, RT and clock
//!   workers, stopped through a `watch` channel
//!
//! # Example
//!
//! ```rust,no_run
//! use rds_daemon::{Config, Daemon};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load("rdsd.yaml".as_ref())?;
//! Daemon::serial(config)
//!     .run(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod daemon;
pub mod display;
pub mod encoder;
pub mod error;
pub mod transport;

pub use config::Config;
pub use daemon::Daemon;
pub use display::{ps_scroll_frames, PsDisplay, RtDisplay};
pub use encoder::RdsEncoder;
pub use error::{ConfigError, DaemonError, TransportError};
pub use transport::{
    available_ports, Connector, LinkMode, MemoryConnector, SerialConnector, Transmitter,
};
