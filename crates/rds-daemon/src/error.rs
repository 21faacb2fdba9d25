//! Error types for the daemon

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while moving frames to the encoder
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to open the serial port
    #[error("failed to open serial port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: tokio_serial::Error,
    },

    /// Write or flush failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to enumerate serial ports
    #[error("failed to enumerate ports: {0}")]
    Enumeration(#[from] serialport::Error),
}

/// Errors raised while loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid YAML for this schema
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A value is outside its allowed range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level daemon errors
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Transport error
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Encoding error
    #[error("encode error: {0}")]
    Encode(#[from] uecp_protocol::EncodeError),
}
