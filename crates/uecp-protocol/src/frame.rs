//! UECP frame construction
//!
//! # Frame Format
//! ```text
//! FE [stuffed: 00 00 00 LEN MEC(1-2) GROUPTYPE DATA... CRC_HI CRC_LO] FF
//! ```
//!
//! - `FE`: Start delimiter (never stuffed)
//! - `00 00 00 LEN`: Length header, only the low byte carries the message length
//! - message: MEC, group type and data as produced by [`crate::group::build_group`]
//! - `CRC_HI CRC_LO`: [`crc16`] over the length header and message, big-endian
//! - `FF`: Stop delimiter (never stuffed)
//!
//! # Byte Stuffing
//! The target encoders do not use the escape convention of the UECP standard.
//! Every `FE` or `FF` between the delimiters is kept as-is and followed by an
//! inserted `FD` marker. Nothing is ever removed or rewritten, and a literal
//! `FD` in the data cannot be told apart from a marker.

use crate::crc::crc16;
use crate::error::EncodeError;

/// Frame start delimiter
pub const START: u8 = 0xFE;
/// Frame stop delimiter
pub const STOP: u8 = 0xFF;
/// Marker inserted after each stuffed byte
pub const STUFF_MARKER: u8 = 0xFD;

/// Size of the length header preceding the message
pub const HEADER_LEN: usize = 4;
/// Largest message whose length fits the header
pub const MAX_MESSAGE_LEN: usize = u8::MAX as usize;

/// Returns true if `byte` gets a marker appended when stuffed
pub fn needs_stuffing(byte: u8) -> bool {
    byte == START || byte == STOP
}

/// Insert a [`STUFF_MARKER`] after every delimiter-valued byte
pub fn byte_stuff(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / 8 + 1);
    for &byte in data {
        out.push(byte);
        if needs_stuffing(byte) {
            out.push(STUFF_MARKER);
        }
    }
    out
}

/// Positions of the markers inserted by [`byte_stuff`]
///
/// Scans left to right; an `FD` directly after `FE`/`FF` is a marker and is
/// skipped so it cannot itself start another match.
pub fn stuffing_markers(stuffed: &[u8]) -> Vec<usize> {
    let mut markers = Vec::new();
    let mut i = 0;
    while i < stuffed.len() {
        if needs_stuffing(stuffed[i]) && stuffed.get(i + 1) == Some(&STUFF_MARKER) {
            markers.push(i + 1);
            i += 2;
        } else {
            i += 1;
        }
    }
    markers
}

/// Wrap a message into a complete wire frame
///
/// Messages longer than [`MAX_MESSAGE_LEN`] are framed in full but their
/// length byte wraps modulo 256, which is what the encoders in the field have
/// always been sent. Use [`try_build_frame`] to reject them instead.
pub fn build_frame(message: &[u8]) -> Vec<u8> {
    if message.len() > MAX_MESSAGE_LEN {
        tracing::warn!(
            "UECP message of {} bytes exceeds length field, encoded length wraps to {}",
            message.len(),
            message.len() as u8
        );
    }

    let mut payload = Vec::with_capacity(HEADER_LEN + message.len() + 2);
    payload.extend_from_slice(&[0x00, 0x00, 0x00, message.len() as u8]);
    payload.extend_from_slice(message);

    let crc = crc16(&payload);
    payload.extend_from_slice(&crc.to_be_bytes());

    let stuffed = byte_stuff(&payload);
    let mut frame = Vec::with_capacity(stuffed.len() + 2);
    frame.push(START);
    frame.extend(stuffed);
    frame.push(STOP);
    frame
}

/// Like [`build_frame`] but refuses messages the length byte cannot describe
pub fn try_build_frame(message: &[u8]) -> Result<Vec<u8>, EncodeError> {
    if message.len() > MAX_MESSAGE_LEN {
        return Err(EncodeError::MessageTooLong(message.len()));
    }
    Ok(build_frame(message))
}

#[cfg(test)]
mod tests {
    use super::{
        build_frame, byte_stuff, stuffing_markers, try_build_frame, HEADER_LEN, START, STOP,
    };
    use crate::error::EncodeError;

    #[test]
    fn test_stuff_inserts_marker_after_delimiters() {
        assert_eq!(
            byte_stuff(&[0x01, 0xFE, 0x02, 0xFF, 0x03]),
            vec![0x01, 0xFE, 0xFD, 0x02, 0xFF, 0xFD, 0x03]
        );
    }

    #[test]
    fn test_stuff_leaves_literal_marker_alone() {
        assert_eq!(byte_stuff(&[0xFD, 0x00]), vec![0xFD, 0x00]);
        assert_eq!(byte_stuff(&[0xFE, 0xFD]), vec![0xFE, 0xFD, 0xFD]);
    }

    #[test]
    fn test_markers_found_in_adjacent_delimiters() {
        let stuffed = byte_stuff(&[0xFF, 0xFE]);
        assert_eq!(stuffed, vec![0xFF, 0xFD, 0xFE, 0xFD]);
        assert_eq!(stuffing_markers(&stuffed), vec![1, 3]);
    }

    #[test]
    fn test_markers_skip_literal_marker_after_stuffed_byte() {
        let stuffed = byte_stuff(&[0xFE, 0xFD, 0x10]);
        assert_eq!(stuffing_markers(&stuffed), vec![1]);
    }

    #[test]
    fn test_frame_delimiters_and_header() {
        let frame = build_frame(&[0x05, 0x00, 0x00, 0x01]);
        assert_eq!(frame[0], START);
        assert_eq!(*frame.last().unwrap(), STOP);
        assert_eq!(&frame[1..1 + HEADER_LEN], &[0x00, 0x00, 0x00, 0x04]);
    }

    #[test]
    fn test_crc_bytes_are_stuffed() {
        // PI 0x000F produces a CRC whose high byte is 0xFF
        let frame = build_frame(&[0x01, 0x00, 0x00, 0x00, 0x0F]);
        assert_eq!(
            frame,
            vec![
                0xFE, 0x00, 0x00, 0x00, 0x05, 0x01, 0x00, 0x00, 0x00, 0x0F, 0xFF, 0xFD, 0x32,
                0xFF
            ]
        );
    }

    #[test]
    fn test_oversized_message_length_wraps() {
        // Length byte wraps while the whole message is still framed
        let message = vec![0x41; 300];
        let frame = build_frame(&message);
        assert_eq!(&frame[1..1 + HEADER_LEN], &[0x00, 0x00, 0x00, (300 % 256) as u8]);
        assert_eq!(frame.len(), 1 + HEADER_LEN + 300 + 2 + 1);
    }

    #[test]
    fn test_try_build_frame_rejects_oversized_message() {
        assert_eq!(
            try_build_frame(&[0u8; 256]),
            Err(EncodeError::MessageTooLong(256))
        );
        assert!(try_build_frame(&[0u8; 255]).is_ok());
    }
}
