//! Station data commands
//!
//! Each [`UecpCommand`] variant carries one semantic RDS field and knows how to
//! render its message element payload. Framing is shared through
//! [`EncodeCommand`].

use time::OffsetDateTime;

use crate::af::AfPayload;
use crate::clock::{clock_message, year_first_data, ClockVariant};
use crate::frame::build_frame;
use crate::group::{build_group, ElementCode};
use crate::EncodeCommand;

/// Width of the Programme Service name
pub const PS_WIDTH: usize = 8;
/// Width of the RadioText message
pub const RT_WIDTH: usize = 64;
/// Sub-header preceding the RadioText characters
pub const RT_HEADER: [u8; 2] = [0x41, 0x00];

/// Replacement for characters outside ISO-8859-1
const REPLACEMENT: u8 = b'?';

/// A single field update for the RDS encoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UecpCommand {
    /// Traffic Programme and Traffic Announcement flags
    TrafficFlags { tp: bool, ta: bool },
    /// Programme Identification code
    ProgramId(u16),
    /// Programme Type (only the low byte is sent)
    ProgramType(u8),
    /// Music (true) or speech (false)
    MusicSpeech { music: bool },
    /// Decoder Information nibble
    DecoderInfo(u8),
    /// Programme Service name, fitted to 8 characters
    ProgramService(String),
    /// RadioText, fitted to 64 characters
    RadioText(String),
    /// Alternative Frequencies list
    AlternativeFrequencies(AfPayload),
    /// Proprietary clock group
    Clock {
        timestamp: OffsetDateTime,
        variant: ClockVariant,
    },
}

impl UecpCommand {
    /// Message element code carried by this command
    pub fn element_code(&self) -> ElementCode {
        match self {
            Self::TrafficFlags { .. } => ElementCode::TrafficFlags,
            Self::ProgramId(_) => ElementCode::ProgramId,
            Self::ProgramType(_) => ElementCode::ProgramType,
            Self::MusicSpeech { .. } => ElementCode::MusicSpeech,
            Self::DecoderInfo(_) => ElementCode::DecoderInfo,
            Self::ProgramService(_) => ElementCode::ProgramService,
            Self::RadioText(_) => ElementCode::RadioText,
            Self::AlternativeFrequencies(_) => ElementCode::AlternativeFrequencies,
            Self::Clock { .. } => ElementCode::ProflineClock,
        }
    }

    /// MEC payload without the group header
    ///
    /// Returns `None` for the day-first clock, which is not built through the
    /// generic group header.
    pub fn payload(&self) -> Option<Vec<u8>> {
        let payload = match self {
            Self::TrafficFlags { tp, ta } => vec![(u8::from(*tp) << 1) | u8::from(*ta)],
            Self::ProgramId(pi) => pi.to_be_bytes().to_vec(),
            Self::ProgramType(pty) => vec![*pty],
            Self::MusicSpeech { music } => vec![u8::from(*music)],
            Self::DecoderInfo(di) => vec![*di],
            Self::ProgramService(text) => fit_text(text, PS_WIDTH),
            Self::RadioText(text) => {
                let mut payload = RT_HEADER.to_vec();
                payload.extend(fit_text(text, RT_WIDTH));
                payload
            }
            Self::AlternativeFrequencies(af) => af.as_bytes().to_vec(),
            Self::Clock {
                timestamp,
                variant: ClockVariant::YearFirst,
            } => year_first_data(*timestamp).to_vec(),
            Self::Clock { .. } => return None,
        };
        Some(payload)
    }

    /// Complete message (MEC, group type, data) ready for framing
    pub fn message(&self) -> Vec<u8> {
        match self {
            Self::Clock { timestamp, variant } => clock_message(*timestamp, *variant),
            _ => {
                let payload = self.payload().unwrap_or_default();
                build_group(self.element_code().code(), &payload)
            }
        }
    }
}

impl EncodeCommand for UecpCommand {
    fn encode(&self) -> Vec<u8> {
        build_frame(&self.message())
    }
}

/// Fit `text` to exactly `width` bytes
///
/// Characters are written as ISO-8859-1, longer text is truncated and shorter
/// text is padded with spaces on the right.
pub fn fit_text(text: &str, width: usize) -> Vec<u8> {
    let mut bytes: Vec<u8> = text
        .chars()
        .take(width)
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(REPLACEMENT))
        .collect();
    bytes.resize(width, b' ');
    bytes
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{fit_text, UecpCommand, PS_WIDTH, RT_WIDTH};
    use crate::clock::ClockVariant;
    use crate::group::ElementCode;

    #[test]
    fn test_tp_ta_bits() {
        let cases = [
            (false, false, 0x00),
            (false, true, 0x01),
            (true, false, 0x02),
            (true, true, 0x03),
        ];
        for (tp, ta, expected) in cases {
            assert_eq!(
                UecpCommand::TrafficFlags { tp, ta }.payload(),
                Some(vec![expected])
            );
        }
    }

    #[test]
    fn test_pi_big_endian() {
        assert_eq!(
            UecpCommand::ProgramId(0x1337).message(),
            vec![0x01, 0x00, 0x00, 0x13, 0x37]
        );
    }

    #[test]
    fn test_ps_padded() {
        assert_eq!(
            UecpCommand::ProgramService("DEMO".into()).message(),
            b"\x02\x00\x00DEMO    ".to_vec()
        );
    }

    #[test]
    fn test_ps_truncated() {
        let payload = UecpCommand::ProgramService("RADIO DEMO FM".into())
            .payload()
            .unwrap();
        assert_eq!(payload, b"RADIO DE".to_vec());
    }

    #[test]
    fn test_rt_sub_header_and_width() {
        let message = UecpCommand::RadioText("Now playing".into()).message();
        assert_eq!(&message[..5], &[0x0A, 0x00, 0x00, 0x41, 0x00]);
        assert_eq!(message.len(), 3 + 2 + RT_WIDTH);
        assert_eq!(&message[5..16], b"Now playing");
        assert!(message[16..].iter().all(|&b| b == b' '));
    }

    #[test]
    fn test_fit_text_latin1() {
        assert_eq!(fit_text("Café", PS_WIDTH), b"Caf\xE9    ".to_vec());
        assert_eq!(fit_text("日本", 4), b"??  ".to_vec());
        assert_eq!(fit_text("", 3), b"   ".to_vec());
    }

    #[test]
    fn test_clock_payload_depends_on_variant() {
        let timestamp = datetime!(2023-08-25 12:34:56 UTC);
        let year_first = UecpCommand::Clock {
            timestamp,
            variant: ClockVariant::YearFirst,
        };
        assert_eq!(
            year_first.payload(),
            Some(vec![23, 8, 25, 12, 34, 56, 0x00, 0x00])
        );

        let day_first = UecpCommand::Clock {
            timestamp,
            variant: ClockVariant::DayFirst,
        };
        assert_eq!(day_first.payload(), None);
        assert_eq!(day_first.element_code(), ElementCode::ProflineClock);
        assert_eq!(day_first.message()[2], 0x06);
    }
}
