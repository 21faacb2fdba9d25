//! Text shown on the receiver display
//!
//! [`PsDisplay`] yields the Programme Service names in order with the time
//! each stays on air, either cycling fixed names or scrolling a longer text
//! through the 8-character window. [`RtDisplay`] picks the next RadioText
//! from a file or the configured message list, and watches that file so a
//! rewrite can go on air before the next rotation.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::warn;
use uecp_protocol::{PS_WIDTH, RT_WIDTH};

use crate::config::{seconds, PsSettings, RtSettings};

/// RadioText used when a configured file is missing and no message exists
pub const RT_MISSING_FILE_TEXT: &str = "NO RT FILE OR MESSAGES";
/// RadioText used when nothing else is available
pub const RT_FALLBACK_TEXT: &str = "RADIO TEXT";
/// How often a configured RT file is checked for changes
pub const RT_FILE_POLL: Duration = Duration::from_secs(1);

/// Modification time and length of the RT file
type FileStamp = (SystemTime, u64);

/// Center `text` in `width` characters, truncating longer text
///
/// The extra space of an odd padding goes to the right.
pub fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.chars().take(width).collect();
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Left-align `text` in `width` characters, truncating longer text
pub fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.chars().take(width).collect();
    }
    format!("{}{}", text, " ".repeat(width - len))
}

fn align(text: &str, width: usize, centered: bool) -> String {
    if centered {
        center(text, width)
    } else {
        pad_right(text, width)
    }
}

/// Scroll windows for the joined PS texts
///
/// The texts are joined with single spaces and inner whitespace is collapsed.
/// Text that already fits in `width` produces no frames. Wrapping scroll
/// moves left until the start of the text reappears; bidirectional scroll
/// moves to the end and back, stopping one step short of the start so the
/// cycle repeats cleanly. Consecutive duplicate windows are dropped.
pub fn ps_scroll_frames(texts: &[String], width: usize, bidirectional: bool) -> Vec<String> {
    let joined = texts.join(" ");
    let chars: Vec<char> = joined
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .collect();

    if width == 0 || chars.len() <= width {
        return Vec::new();
    }

    let window =
        |data: &[char], start: usize| -> String { data[start..start + width].iter().collect() };

    let mut frames = Vec::new();
    if bidirectional {
        let last = chars.len() - width;
        frames.extend((0..=last).map(|i| window(&chars, i)));
        frames.extend((1..last).rev().map(|i| window(&chars, i)));
    } else {
        let mut data = chars.clone();
        data.push(' ');
        data.extend_from_slice(&chars[..width - 1]);
        frames.extend((0..=data.len() - width).map(|i| window(&data, i)));
    }

    frames.dedup();
    frames
}

/// Programme Service schedule
#[derive(Debug, Clone)]
pub struct PsDisplay {
    frames: Vec<String>,
    hold: Duration,
    next: usize,
}

impl PsDisplay {
    /// Build the schedule from the PS settings
    ///
    /// Scrolling applies only when enabled and the joined text is wider than
    /// the display; otherwise each configured name is shown in turn.
    pub fn from_settings(settings: &PsSettings) -> Self {
        let scroll = if settings.scroll_enabled {
            ps_scroll_frames(
                &settings.texts,
                PS_WIDTH,
                settings.scroll_bidirectional,
            )
        } else {
            Vec::new()
        };

        let (frames, hold) = if scroll.is_empty() {
            (
                settings.texts.clone(),
                seconds(settings.display_delay_seconds),
            )
        } else {
            (scroll, seconds(settings.scroll_speed_seconds))
        };

        Self {
            frames: frames
                .iter()
                .map(|f| align(f, PS_WIDTH, settings.center))
                .collect(),
            hold,
            next: 0,
        }
    }

    /// Number of frames in one cycle
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether there is nothing to show
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Time each frame stays on air
    pub fn hold(&self) -> Duration {
        self.hold
    }

    /// Next frame to send, wrapping around at the end
    pub fn next_frame(&mut self) -> Option<&str> {
        if self.frames.is_empty() {
            return None;
        }
        let index = self.next % self.frames.len();
        self.next = index + 1;
        Some(&self.frames[index])
    }
}

/// RadioText source
#[derive(Debug, Clone)]
pub struct RtDisplay {
    messages: Vec<String>,
    file: Option<PathBuf>,
    center: bool,
    interval: Duration,
    next: usize,
    last_seen: Option<FileStamp>,
}

impl RtDisplay {
    /// Build the RadioText source from the RT settings
    pub fn from_settings(settings: &RtSettings) -> Self {
        Self {
            messages: settings.messages.clone(),
            file: settings.file.clone(),
            center: settings.center,
            interval: seconds(settings.change_interval_seconds),
            next: 0,
            last_seen: None,
        }
    }

    /// Whether a file is configured as the RadioText source
    pub fn watches_file(&self) -> bool {
        self.file.is_some()
    }

    /// Whether the file differs from the one last read by [`next_text`](Self::next_text)
    ///
    /// A file that appears after being missing counts as changed; one that
    /// disappears does not.
    pub async fn file_changed(&self) -> bool {
        let Some(path) = &self.file else {
            return false;
        };
        match file_stamp(path).await {
            Some(stamp) => self.last_seen != Some(stamp),
            None => false,
        }
    }

    /// Time between RadioText updates
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Next RadioText, aligned to the full 64-character width
    ///
    /// A readable file wins over the message list; its trimmed contents are
    /// used, or the first message when the file is empty or unreadable.
    /// Without a file the messages rotate.
    pub async fn next_text(&mut self) -> String {
        let (text, file_missing) = match self.file.clone() {
            Some(path) => {
                self.last_seen = file_stamp(&path).await;
                if self.last_seen.is_some() {
                    (self.read_file(&path).await, false)
                } else {
                    (self.rotate(), true)
                }
            }
            None => (self.rotate(), false),
        };

        let text = match text {
            Some(text) if !text.is_empty() => text,
            _ if file_missing => RT_MISSING_FILE_TEXT.to_string(),
            _ => RT_FALLBACK_TEXT.to_string(),
        };

        align(&text, RT_WIDTH, self.center)
    }

    async fn read_file(&self, path: &Path) -> Option<String> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => {
                let trimmed = contents.trim();
                if trimmed.is_empty() {
                    self.messages.first().cloned()
                } else {
                    Some(trimmed.to_string())
                }
            }
            Err(e) => {
                warn!(
                    "Failed to read RT file {}: {}, using first message",
                    path.display(),
                    e
                );
                self.messages.first().cloned()
            }
        }
    }

    fn rotate(&mut self) -> Option<String> {
        if self.messages.is_empty() {
            return None;
        }
        let index = self.next % self.messages.len();
        self.next = index + 1;
        Some(self.messages[index].clone())
    }
}

// None when the path is missing or not a regular file
async fn file_stamp(path: &Path) -> Option<FileStamp> {
    let meta = tokio::fs::metadata(path).await.ok()?;
    if !meta.is_file() {
        return None;
    }
    let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
    Some((modified, meta.len()))
}
