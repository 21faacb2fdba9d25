//! Alternative Frequencies (AF) list encoding
//!
//! Frequencies are sent as one-byte AF codes, `round((MHz - 87.5) * 10)`,
//! inside one of three fixed-size payloads chosen by how many codes survive
//! validation:
//!
//! | codes | payload |
//! |-------|---------|
//! | 1     | `05 00 00 E1 c1 00 60` |
//! | 2..=3 | `07 00 00 E0+n c1 c2 [c3\|00] 00 D3\|EE` |
//! | 4..=11| `0F 00 00 EB c1..c11 (zero padded) 00 AC` |
//!
//! The resulting payload is sent as MEC 0x13.

use crate::error::EncodeError;

/// Lowest frequency usable in an AF list (MHz)
pub const MIN_MHZ: f64 = 87.6;
/// Highest frequency usable in an AF list (MHz)
pub const MAX_MHZ: f64 = 107.9;
/// Largest AF code
pub const MAX_CODE: i64 = 204;
/// Most codes a single AF group can carry
pub const MAX_ENTRIES: usize = 11;

const SHORT_LIST_LEN: usize = 7;
const LONG_LIST_SLOTS: usize = MAX_ENTRIES;

/// How invalid frequencies in a list are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AfPolicy {
    /// Drop invalid entries and encode the rest
    #[default]
    Lenient,
    /// Fail on the first invalid entry
    Strict,
}

/// Encode a single frequency in MHz to its AF code
pub fn encode_af(mhz: f64) -> Result<u8, EncodeError> {
    if !(MIN_MHZ..=MAX_MHZ).contains(&mhz) {
        return Err(EncodeError::InvalidFrequency { mhz });
    }
    let code = ((mhz - 87.5) * 10.0 + 0.5).floor() as i64;
    if !(1..=MAX_CODE).contains(&code) {
        return Err(EncodeError::InvalidAfCode(code));
    }
    Ok(code as u8)
}

/// Encoded AF group payload (without the MEC header)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AfPayload {
    bytes: Vec<u8>,
    count: usize,
}

impl AfPayload {
    /// Build the payload for a list of frequencies in MHz
    ///
    /// Returns `Ok(None)` when no frequency survives validation, which callers
    /// treat as nothing to send.
    pub fn from_frequencies(mhz: &[f64], policy: AfPolicy) -> Result<Option<Self>, EncodeError> {
        let mut codes = Vec::with_capacity(mhz.len());
        for &freq in mhz {
            match encode_af(freq) {
                Ok(code) => codes.push(code),
                Err(e) if policy == AfPolicy::Lenient => {
                    tracing::warn!("AF {:.1} MHz skipped: {}", freq, e);
                }
                Err(e) => return Err(e),
            }
        }
        Self::from_codes(&codes)
    }

    /// Build the payload from already encoded AF codes
    pub fn from_codes(codes: &[u8]) -> Result<Option<Self>, EncodeError> {
        let bytes = match codes.len() {
            0 => return Ok(None),
            1 => vec![0x05, 0x00, 0x00, 0xE1, codes[0], 0x00, 0x60],
            n @ 2..=3 => {
                let mut bytes = vec![0x07, 0x00, 0x00, 0xE0 + n as u8];
                bytes.extend_from_slice(codes);
                bytes.resize(SHORT_LIST_LEN, 0x00);
                let trailer = if n == 2 { 0xD3 } else { 0xEE };
                bytes.extend_from_slice(&[0x00, trailer]);
                bytes
            }
            4..=MAX_ENTRIES => {
                let mut bytes = vec![0x0F, 0x00, 0x00, 0xEB];
                bytes.extend_from_slice(codes);
                bytes.resize(4 + LONG_LIST_SLOTS, 0x00);
                bytes.extend_from_slice(&[0x00, 0xAC]);
                bytes
            }
            n => return Err(EncodeError::InvalidAfListLength(n)),
        };

        Ok(Some(Self {
            bytes,
            count: codes.len(),
        }))
    }

    /// Number of frequencies carried
    pub fn count(&self) -> usize {
        self.count
    }

    /// Raw payload bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
