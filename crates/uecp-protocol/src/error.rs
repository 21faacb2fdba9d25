//! Error types for UECP encoding

use thiserror::Error;

/// Errors that can occur while encoding station data
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EncodeError {
    /// Frequency outside the FM band usable for AF lists
    #[error("AF {mhz:.1} MHz outside valid range (87.6-107.9)")]
    InvalidFrequency { mhz: f64 },

    /// Computed AF code outside 1..=204
    #[error("AF code {0} invalid")]
    InvalidAfCode(i64),

    /// Too many usable frequencies for a single AF group
    #[error("invalid AF list length: {0}")]
    InvalidAfListLength(usize),

    /// Message does not fit the one-byte length field
    #[error("message too long for UECP frame: {0} bytes (max 255)")]
    MessageTooLong(usize),
}
