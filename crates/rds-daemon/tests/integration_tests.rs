//! Integration tests for the RDS daemon
//!
//! These tests run the daemon end to end against an in-memory link:
//! - Configuration files are loaded from disk and validated
//! - Startup sends the static sequence and AF list byte-exactly
//! - Workers keep PS and RT on air and stop on shutdown

use std::time::Duration;

use rds_daemon::{Config, ConfigError, Daemon, MemoryConnector};
use uecp_protocol::{hex_string, stuffing_markers};

// ============================================================================
// Helper Functions
// ============================================================================

mod helpers {
    use super::*;

    /// Write `yaml` to a temp file and load it
    pub fn load(name: &str, yaml: &str) -> Result<Config, ConfigError> {
        let path = std::env::temp_dir().join(format!(
            "rds-daemon-it-{}-{}.yaml",
            std::process::id(),
            name
        ));
        std::fs::write(&path, yaml).unwrap();
        let config = Config::load(&path);
        std::fs::remove_file(&path).unwrap();
        config
    }

    pub fn hex_frames(memory: &MemoryConnector) -> Vec<String> {
        memory
            .frames()
            .iter()
            .map(|f| hex_string(f).to_lowercase())
            .collect()
    }
}

const STATION: &str = r#"
serial:
  port: /dev/null
  delay_seconds: 0.1
  keep_open: true
station:
  program_identification_code: 4919
  program_type_code: 15
  rds_music_flag: true
  tp: true
  ta: false
display:
  ps:
    texts: ["DEMO"]
    display_delay_seconds: 5
  rt:
    messages: ["Now playing"]
    change_interval_seconds: 10
af:
  enable: true
  alternate_frequencies: [92.4]
"#;

// ============================================================================
// Startup
// ============================================================================

mod startup {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn static_sequence_and_af_are_byte_exact() {
        let config = helpers::load("startup", STATION).unwrap();
        let memory = MemoryConnector::new();
        let daemon = Daemon::new(config, memory.clone());

        daemon.initialize().await.unwrap();

        assert_eq!(
            helpers::hex_frames(&memory),
            vec![
                "fe0000000403000002fc59ff",
                "fe0000000501000013371e49ff",
                "fe000000040700000fe705ff",
                "fe0000000405000001eba3ff",
                "fe00000004040000008d36ff",
                "fe0000000a130000050000e1310060643bff",
            ]
        );
        // keep_open reuses a single link
        assert_eq!(memory.connect_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn settle_delay_spaces_frames() {
        let config = helpers::load("settle", STATION).unwrap();
        let memory = MemoryConnector::new();
        let daemon = Daemon::new(config, memory.clone());

        let start = tokio::time::Instant::now();
        daemon.initialize().await.unwrap();

        // Six frames, 100 ms each
        assert!(start.elapsed() >= Duration::from_millis(600));
    }

    #[test]
    fn invalid_pty_is_rejected_on_load() {
        let err = helpers::load("bad-pty", "station: { program_type_code: 40 }").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_yaml_is_rejected_on_load() {
        let err = helpers::load("bad-yaml", "serial: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}

// ============================================================================
// Running Daemon
// ============================================================================

mod running {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn displays_stay_on_air_until_shutdown() {
        let config = helpers::load("running", STATION).unwrap();
        let memory = MemoryConnector::new();
        let daemon = Daemon::new(config, memory.clone());

        daemon
            .run(tokio::time::sleep(Duration::from_secs(12)))
            .await
            .unwrap();

        let frames = helpers::hex_frames(&memory);
        let ps = "fe0000000b02000044454d4f202020209180ff";
        // PS at 0, 5 and 10 seconds after startup
        assert_eq!(frames.iter().filter(|f| *f == ps).count(), 3);

        let rt: Vec<_> = memory.frames().into_iter().filter(|f| f[5] == 0x0A).collect();
        // RT at 0 and 10 seconds after startup
        assert_eq!(rt.len(), 2);
        for frame in rt {
            assert_eq!(frame.first(), Some(&0xFE));
            assert_eq!(frame.last(), Some(&0xFF));
            let interior = &frame[1..frame.len() - 1];
            assert_eq!(interior.len() - stuffing_markers(interior).len(), 4 + 3 + 2 + 64 + 2);
        }
    }
}
