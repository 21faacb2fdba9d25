//! UECP Protocol Library
//!
//! This crate encodes RDS station data into UECP (Universal Encoder
//! Communication Protocol) frames for serial-attached RDS encoders.
//!
//! The encoding matches the encoder family it was reverse-engineered from
//! rather than the published UECP standard:
//!
//! - **Byte stuffing** inserts `FD` after every `FE`/`FF` instead of escaping
//! - **CRC-16** is CCITT with an inverted result
//! - **Clock** uses the proprietary Profline group 0x0D19
//!
//! # Architecture
//!
//! Encoding is a pipeline of pure functions:
//! - Field encoders ([`UecpCommand`], [`AfPayload`]) produce a MEC payload
//! - [`group::build_group`] prefixes the MEC and group-type header
//! - [`frame::build_frame`] adds the length header, CRC, stuffing and delimiters
//!
//! # Example
//!
//! ```rust
//! use uecp_protocol::{EncodeCommand, UecpCommand};
//!
//! let frame = UecpCommand::ProgramId(0x1337).encode();
//! assert_eq!(
//!     frame,
//!     vec![0xFE, 0x00, 0x00, 0x00, 0x05, 0x01, 0x00, 0x00, 0x13, 0x37, 0x1E, 0x49, 0xFF]
//! );
//! ```

pub mod af;
pub mod clock;
pub mod command;
pub mod crc;
pub mod error;
pub mod frame;
pub mod group;
pub mod station;

pub use af::{encode_af, AfPayload, AfPolicy};
pub use clock::ClockVariant;
pub use command::{fit_text, UecpCommand, PS_WIDTH, RT_WIDTH};
pub use crc::crc16;
pub use error::EncodeError;
pub use frame::{build_frame, byte_stuff, stuffing_markers, try_build_frame};
pub use group::{build_group, ElementCode};
pub use station::{DecoderInfo, StationConfig};

/// Trait for commands that can be encoded to bytes
pub trait EncodeCommand {
    /// Encode this command to its complete wire frame
    fn encode(&self) -> Vec<u8>;
}

/// Format bytes as contiguous upper-case hex, as shown in frame logs
pub fn hex_string(data: &[u8]) -> String {
    use std::fmt::Write;

    data.iter().fold(String::with_capacity(data.len() * 2), |mut s, b| {
        let _ = write!(s, "{:02X}", b);
        s
    })
}
