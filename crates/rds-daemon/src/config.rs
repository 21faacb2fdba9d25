//! Daemon configuration
//!
//! Loaded from a YAML file; every section and field is optional and falls
//! back to the defaults below.
//!
//! ```yaml
//! serial:
//!   port: /dev/ttyUSB0
//!   baudrate: 9600
//!   delay_seconds: 1.0
//! station:
//!   program_identification_code: 0x1337
//!   program_type_code: 15
//!   rds_music_flag: true
//!   tp: true
//!   ta: false
//! flags:
//!   di: { stereo: true }
//! display:
//!   ps: { texts: ["RADIO", "DEMO"], display_delay_seconds: 2.0 }
//!   rt: { messages: ["Now playing"], change_interval_seconds: 10.0 }
//! clock: { enable: true, interval_seconds: 60.0, variant: year_first }
//! af: { enable: true, alternate_frequencies: [92.4, 99.9] }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uecp_protocol::station::MAX_PTY;
use uecp_protocol::{AfPolicy, ClockVariant, DecoderInfo, StationConfig};

use crate::error::ConfigError;

/// Serial link settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SerialSettings {
    /// Serial port path
    pub port: String,
    /// Baud rate
    pub baudrate: u32,
    /// Settle delay after every frame, in seconds
    pub delay_seconds: f64,
    /// Keep the port open between frames instead of reopening per frame
    pub keep_open: bool,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baudrate: 9600,
            delay_seconds: 1.0,
            keep_open: false,
        }
    }
}

/// Station identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StationSettings {
    pub program_identification_code: u16,
    pub program_type_code: u8,
    pub rds_music_flag: bool,
    pub tp: bool,
    pub ta: bool,
}

impl Default for StationSettings {
    fn default() -> Self {
        Self {
            program_identification_code: 0x0000,
            program_type_code: 0,
            rds_music_flag: true,
            tp: false,
            ta: false,
        }
    }
}

/// Flag groups
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlagSettings {
    /// Decoder Information flags
    pub di: DecoderInfo,
}

/// Programme Service display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PsSettings {
    /// Names cycled on the display, or joined into one scroll text
    pub texts: Vec<String>,
    /// Center names instead of left-aligning them
    pub center: bool,
    /// Scroll the joined texts through the 8-character window
    pub scroll_enabled: bool,
    /// Scroll back and forth instead of wrapping around
    pub scroll_bidirectional: bool,
    /// Time per scroll step
    pub scroll_speed_seconds: f64,
    /// Time each name is shown when not scrolling
    pub display_delay_seconds: f64,
}

impl Default for PsSettings {
    fn default() -> Self {
        Self {
            texts: vec!["DEFAULT".to_string()],
            center: false,
            scroll_enabled: false,
            scroll_bidirectional: false,
            scroll_speed_seconds: 0.5,
            display_delay_seconds: 2.0,
        }
    }
}

/// RadioText display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RtSettings {
    /// Messages rotated when no file is used
    pub messages: Vec<String>,
    /// File whose trimmed contents override the message list
    pub file: Option<PathBuf>,
    /// Center text instead of left-aligning it
    pub center: bool,
    /// Time between RadioText updates
    pub change_interval_seconds: f64,
}

impl Default for RtSettings {
    fn default() -> Self {
        Self {
            messages: vec!["RADIOTEXT".to_string()],
            file: None,
            center: false,
            change_interval_seconds: 10.0,
        }
    }
}

/// Text displays
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplaySettings {
    pub ps: PsSettings,
    pub rt: RtSettings,
}

/// Clock group transmission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClockSettings {
    pub enable: bool,
    pub interval_seconds: f64,
    /// Byte layout expected by the encoder
    pub variant: ClockVariant,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            enable: false,
            interval_seconds: 60.0,
            variant: ClockVariant::default(),
        }
    }
}

/// Alternative Frequencies
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AfSettings {
    pub enable: bool,
    /// Frequencies in MHz
    pub alternate_frequencies: Vec<f64>,
    /// Refuse the whole list when an entry is out of band
    pub strict: bool,
}

impl AfSettings {
    /// Policy applied to invalid entries
    pub fn policy(&self) -> AfPolicy {
        if self.strict {
            AfPolicy::Strict
        } else {
            AfPolicy::Lenient
        }
    }
}

/// Complete daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub serial: SerialSettings,
    pub station: StationSettings,
    pub flags: FlagSettings,
    pub display: DisplaySettings,
    pub clock: ClockSettings,
    pub af: AfSettings,
}

impl Config {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges the encoder relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.station.program_type_code > MAX_PTY {
            return Err(ConfigError::Invalid(format!(
                "program_type_code {} out of range (0-{})",
                self.station.program_type_code, MAX_PTY
            )));
        }
        if self.serial.baudrate == 0 {
            return Err(ConfigError::Invalid("baudrate must be positive".into()));
        }

        check_seconds("serial.delay_seconds", self.serial.delay_seconds, false)?;
        check_seconds(
            "display.ps.scroll_speed_seconds",
            self.display.ps.scroll_speed_seconds,
            true,
        )?;
        check_seconds(
            "display.ps.display_delay_seconds",
            self.display.ps.display_delay_seconds,
            true,
        )?;
        check_seconds(
            "display.rt.change_interval_seconds",
            self.display.rt.change_interval_seconds,
            true,
        )?;
        if self.clock.enable {
            check_seconds("clock.interval_seconds", self.clock.interval_seconds, true)?;
        }
        Ok(())
    }

    /// Station identity for the static initialisation sequence
    pub fn station_config(&self) -> StationConfig {
        StationConfig {
            pi: self.station.program_identification_code,
            pty: self.station.program_type_code,
            music: self.station.rds_music_flag,
            tp: self.station.tp,
            ta: self.station.ta,
            di: self.flags.di,
        }
    }

    /// Settle delay applied after every frame
    pub fn settle_delay(&self) -> Duration {
        seconds(self.serial.delay_seconds)
    }

    /// Multi-line summary logged at startup
    pub fn summary(&self) -> String {
        let di = &self.flags.di;
        format!(
            "Serial: {} @ {} bps\n\
             PI: 0x{:04X}, PTY: {}, MS: {}\n\
             TP: {}, TA: {}, DI: S={}, AH={}, C={}, DP={}\n\
             PS entries: {}, RT entries: {}\n\
             AF enabled: {} ({} entries)\n\
             Clock enabled: {} (interval {:.1}s)",
            self.serial.port,
            self.serial.baudrate,
            self.station.program_identification_code,
            self.station.program_type_code,
            self.station.rds_music_flag,
            self.station.tp,
            self.station.ta,
            u8::from(di.stereo),
            u8::from(di.artificial_head),
            u8::from(di.compressed),
            u8::from(di.dynamic_pty),
            self.display.ps.texts.len(),
            self.display.rt.messages.len(),
            self.af.enable,
            self.af.alternate_frequencies.len(),
            self.clock.enable,
            self.clock.interval_seconds,
        )
    }
}

/// Convert a seconds value to a duration, as used by the workers
///
/// Negative and NaN values map to zero, values too large for a `Duration`
/// saturate.
pub fn seconds(value: f64) -> Duration {
    if value.is_nan() || value <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(value).unwrap_or(Duration::MAX)
}

fn check_seconds(name: &str, value: f64, positive: bool) -> Result<(), ConfigError> {
    let valid = value.is_finite() && if positive { value > 0.0 } else { value >= 0.0 };
    if valid {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be a finite {} number of seconds, got {}",
            name,
            if positive { "positive" } else { "non-negative" },
            value
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use uecp_protocol::{AfPolicy, ClockVariant};

    use super::{seconds, Config};
    use crate::error::ConfigError;

    const FULL: &str = r#"
serial:
  port: /dev/ttyS1
  baudrate: 19200
  delay_seconds: 0.25
  keep_open: true
station:
  program_identification_code: 4919
  program_type_code: 15
  rds_music_flag: false
  tp: true
  ta: false
flags:
  di:
    stereo: true
    dynamic_pty: true
display:
  ps:
    texts: ["RADIO", "DEMO"]
    center: true
    scroll_enabled: true
    scroll_bidirectional: true
    scroll_speed_seconds: 0.3
  rt:
    messages: ["Now playing"]
    file: /tmp/rt.txt
    change_interval_seconds: 5
clock:
  enable: true
  interval_seconds: 30
  variant: day_first
af:
  enable: true
  alternate_frequencies: [92.4, 99.9]
  strict: true
"#;

    #[test]
    fn test_parse_full_config() {
        let config: Config = serde_yaml::from_str(FULL).unwrap();
        config.validate().unwrap();

        assert_eq!(config.serial.port, "/dev/ttyS1");
        assert_eq!(config.serial.baudrate, 19200);
        assert!(config.serial.keep_open);
        assert_eq!(config.station.program_identification_code, 0x1337);
        assert_eq!(config.flags.di.bits(), 0x09);
        assert_eq!(config.display.ps.texts, vec!["RADIO", "DEMO"]);
        assert_eq!(
            config.display.rt.file.as_deref(),
            Some(Path::new("/tmp/rt.txt"))
        );
        assert_eq!(config.clock.variant, ClockVariant::DayFirst);
        assert_eq!(config.af.policy(), AfPolicy::Strict);
        assert_eq!(config.settle_delay().as_millis(), 250);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.serial.baudrate, 9600);
        assert_eq!(config.display.ps.texts, vec!["DEFAULT"]);
        assert_eq!(config.clock.variant, ClockVariant::YearFirst);
        assert_eq!(config.af.policy(), AfPolicy::Lenient);
        config.validate().unwrap();
    }

    #[test]
    fn test_station_config_conversion() {
        let config: Config = serde_yaml::from_str(FULL).unwrap();
        let station = config.station_config();
        assert_eq!(station.pi, 0x1337);
        assert_eq!(station.pty, 15);
        assert!(!station.music);
        assert!(station.tp);
        assert_eq!(station.di.bits(), 0x09);
    }

    #[test]
    fn test_pty_out_of_range_rejected() {
        let config: Config =
            serde_yaml::from_str("station: { program_type_code: 32 }").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_pi_wider_than_sixteen_bits_fails_to_parse() {
        assert!(
            serde_yaml::from_str::<Config>("station: { program_identification_code: 70000 }")
                .is_err()
        );
    }

    #[test]
    fn test_hex_pi_parses() {
        let config: Config =
            serde_yaml::from_str("station: { program_identification_code: 0x1337 }").unwrap();
        assert_eq!(config.station.program_identification_code, 0x1337);
        assert_eq!(config.station_config().pi, 0x1337);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config: Config =
            serde_yaml::from_str("display: { rt: { change_interval_seconds: 0 } }").unwrap();
        assert!(config.validate().is_err());

        let config: Config = serde_yaml::from_str("serial: { delay_seconds: 0 }").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_summary_lists_station() {
        let config: Config = serde_yaml::from_str(FULL).unwrap();
        let summary = config.summary();
        assert!(summary.contains("Serial: /dev/ttyS1 @ 19200 bps"));
        assert!(summary.contains("PI: 0x1337, PTY: 15, MS: false"));
        assert!(summary.contains("DI: S=1, AH=0, C=0, DP=1"));
        assert!(summary.contains("AF enabled: true (2 entries)"));
    }

    #[test]
    fn test_seconds_conversion() {
        assert_eq!(seconds(1.5), Duration::from_millis(1500));
        assert_eq!(seconds(-1.0), Duration::ZERO);
        assert_eq!(seconds(f64::NAN), Duration::ZERO);
        assert_eq!(seconds(f64::INFINITY), Duration::MAX);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/rdsd.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
