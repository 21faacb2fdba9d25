//! Static station parameters

use crate::command::UecpCommand;

/// Highest valid Programme Type
pub const MAX_PTY: u8 = 31;

/// Decoder Information flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecoderInfo {
    pub stereo: bool,
    pub artificial_head: bool,
    pub compressed: bool,
    pub dynamic_pty: bool,
}

impl DecoderInfo {
    /// DI nibble as sent on the wire
    pub fn bits(&self) -> u8 {
        u8::from(self.stereo)
            | u8::from(self.artificial_head) << 1
            | u8::from(self.compressed) << 2
            | u8::from(self.dynamic_pty) << 3
    }
}

/// Station identity sent once when the encoder is initialised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StationConfig {
    /// Programme Identification code
    pub pi: u16,
    /// Programme Type, 0..=31; range is checked when the config is loaded
    pub pty: u8,
    /// Music (true) or speech (false)
    pub music: bool,
    /// Traffic Programme flag
    pub tp: bool,
    /// Traffic Announcement flag
    pub ta: bool,
    /// Decoder Information flags
    pub di: DecoderInfo,
}

impl StationConfig {
    /// Commands establishing the encoder baseline, in the order the encoder
    /// expects them: TP/TA, PI, PTY, MS, DI
    pub fn static_init_commands(&self) -> [UecpCommand; 5] {
        [
            UecpCommand::TrafficFlags {
                tp: self.tp,
                ta: self.ta,
            },
            UecpCommand::ProgramId(self.pi),
            UecpCommand::ProgramType(self.pty),
            UecpCommand::MusicSpeech { music: self.music },
            UecpCommand::DecoderInfo(self.di.bits()),
        ]
    }
}
