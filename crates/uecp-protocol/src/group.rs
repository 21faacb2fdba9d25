//! Message element codes and group (message) construction

/// Group type written after the MEC by the generic builder
pub const DEFAULT_GROUP_TYPE: u8 = 0x00;

/// UECP message element codes understood by the target encoders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementCode {
    /// Programme Identification (0x01)
    ProgramId,
    /// Programme Service name (0x02)
    ProgramService,
    /// Traffic Programme / Traffic Announcement flags (0x03)
    TrafficFlags,
    /// Decoder Information (0x04)
    DecoderInfo,
    /// Music/Speech switch (0x05)
    MusicSpeech,
    /// Programme Type (0x07)
    ProgramType,
    /// RadioText (0x0A)
    RadioText,
    /// Alternative Frequencies list (0x13)
    AlternativeFrequencies,
    /// Proprietary Profline clock group (0x0D19)
    ProflineClock,
}

impl ElementCode {
    /// Numeric MEC value
    pub const fn code(self) -> u16 {
        match self {
            Self::ProgramId => 0x01,
            Self::ProgramService => 0x02,
            Self::TrafficFlags => 0x03,
            Self::DecoderInfo => 0x04,
            Self::MusicSpeech => 0x05,
            Self::ProgramType => 0x07,
            Self::RadioText => 0x0A,
            Self::AlternativeFrequencies => 0x13,
            Self::ProflineClock => 0x0D19,
        }
    }

    /// Short name used in logs
    pub fn name(self) -> &'static str {
        match self {
            Self::ProgramId => "PI",
            Self::ProgramService => "PS",
            Self::TrafficFlags => "TP/TA",
            Self::DecoderInfo => "DI",
            Self::MusicSpeech => "MS",
            Self::ProgramType => "PTY",
            Self::RadioText => "RT",
            Self::AlternativeFrequencies => "AF",
            Self::ProflineClock => "CT",
        }
    }
}

/// Prefix `data` with its MEC and group-type header
///
/// One-byte MECs are followed by the group type and a reserved zero byte;
/// two-byte MECs are written big-endian followed by the group type.
pub fn build_group(mec: u16, data: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(3 + data.len());
    if mec > 0xFF {
        message.extend_from_slice(&mec.to_be_bytes());
        message.push(DEFAULT_GROUP_TYPE);
    } else {
        message.extend_from_slice(&[mec as u8, DEFAULT_GROUP_TYPE, 0x00]);
    }
    message.extend_from_slice(data);
    message
}

#[cfg(test)]
mod tests {
    use super::{build_group, ElementCode};

    #[test]
    fn test_single_byte_mec_header() {
        assert_eq!(build_group(0x07, &[0x0F]), vec![0x07, 0x00, 0x00, 0x0F]);
    }

    #[test]
    fn test_two_byte_mec_header() {
        assert_eq!(
            build_group(0x0D19, &[0x01, 0x02]),
            vec![0x0D, 0x19, 0x00, 0x01, 0x02]
        );
    }

    #[test]
    fn test_boundary_mec_is_single_byte() {
        assert_eq!(build_group(0xFF, &[]), vec![0xFF, 0x00, 0x00]);
        assert_eq!(build_group(0x100, &[]), vec![0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_element_codes_on_the_wire() {
        let codes = [
            (ElementCode::ProgramId, 0x01),
            (ElementCode::ProgramService, 0x02),
            (ElementCode::TrafficFlags, 0x03),
            (ElementCode::DecoderInfo, 0x04),
            (ElementCode::MusicSpeech, 0x05),
            (ElementCode::ProgramType, 0x07),
            (ElementCode::RadioText, 0x0A),
            (ElementCode::AlternativeFrequencies, 0x13),
            (ElementCode::ProflineClock, 0x0D19),
        ];
        for (mec, code) in codes {
            assert_eq!(mec.code(), code, "{}", mec.name());
        }
    }
}
