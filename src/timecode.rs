/*!
 * Timecode codec for `HH:MM:SS:FF` addresses.
 *
 * Converts between timecode strings and absolute frame counts for a given
 * frame rate. Every rate counts `floor(fps)` labels per second (29 at 29.97,
 * 23 at 23.976) for both NDF and DF labels; drop-frame awareness is limited
 * to flagging the labels a DF counter skips.
 */

use std::fmt;
use std::str::FromStr;

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::TimecodeError;

/// Strict timecode shape: four zero-padded, colon-separated fields
static TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2}):(\d{2})$").expect("Invalid timecode regex")
});

/// Tolerance used when matching a frame rate against a known rate
pub const FPS_MATCH_TOLERANCE: f64 = 0.01;

/// The NTSC rate whose DF labels are checked for skipped frames
pub const DROP_FRAME_FPS: f64 = 29.97;

const MAX_HOURS: u32 = 23;
const MAX_MINUTES: u32 = 59;
const MAX_SECONDS: u32 = 59;

/// Timecode counting convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TcFormat {
    /// Non-drop-frame
    #[default]
    #[serde(rename = "NDF")]
    Ndf,
    /// Drop-frame
    #[serde(rename = "DF")]
    Df,
}

impl TcFormat {
    /// Label used on the `FCM:` header line of an EDL
    pub fn fcm_label(&self) -> &'static str {
        match self {
            TcFormat::Ndf => "NON-DROP FRAME",
            TcFormat::Df => "DROP FRAME",
        }
    }
}

impl fmt::Display for TcFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TcFormat::Ndf => write!(f, "NDF"),
            TcFormat::Df => write!(f, "DF"),
        }
    }
}

impl FromStr for TcFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ndf" | "non-drop" | "nondrop" | "non-drop frame" => Ok(TcFormat::Ndf),
            "df" | "drop" | "drop frame" | "drop-frame" => Ok(TcFormat::Df),
            other => Err(format!("Unknown timecode format: {}", other)),
        }
    }
}

/// Integer frames-per-second used for timecode labels at `fps`: `floor(fps)`.
///
/// Frame fields of a label range over `0..=timebase - 1`.
pub fn timebase_for(fps: f64) -> Result<u32, TimecodeError> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(TimecodeError::InvalidFps(fps));
    }

    let base = fps.floor();

    if base < 1.0 || base > u32::MAX as f64 {
        return Err(TimecodeError::InvalidFps(fps));
    }

    Ok(base as u32)
}

/// The four numeric fields of a timecode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimecodeParts {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub frames: u32,
}

impl TimecodeParts {
    /// Absolute frame count at the given timebase
    pub fn to_frames(&self, timebase: u32) -> u64 {
        let total_seconds =
            self.hours as u64 * 3600 + self.minutes as u64 * 60 + self.seconds as u64;
        total_seconds * timebase as u64 + self.frames as u64
    }

    /// Split a frame count into fields, wrapping at 24 hours
    pub fn from_frames(frames: u64, timebase: u32) -> Self {
        let timebase = timebase as u64;
        let frames = frames % (24 * 3600 * timebase);
        let total_seconds = frames / timebase;

        Self {
            hours: (total_seconds / 3600) as u32,
            minutes: ((total_seconds % 3600) / 60) as u32,
            seconds: (total_seconds % 60) as u32,
            frames: (frames % timebase) as u32,
        }
    }

    /// Whether a drop-frame counter skips this label.
    ///
    /// Frames 00 and 01 at second 00 of every minute not divisible by ten.
    pub fn is_drop_frame_skip(&self) -> bool {
        self.frames < 2 && self.seconds == 0 && self.minutes % 10 != 0
    }
}

impl fmt::Display for TimecodeParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }
}

/// Frame-rate bound timecode parser and formatter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimecodeCodec {
    fps: f64,
    timebase: u32,
}

impl TimecodeCodec {
    /// Create a codec for the given frame rate
    pub fn new(fps: f64) -> Result<Self, TimecodeError> {
        let timebase = timebase_for(fps)?;
        Ok(Self { fps, timebase })
    }

    /// Frame rate this codec was built for
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Integer frames per second used for labels
    pub fn timebase(&self) -> u32 {
        self.timebase
    }

    /// Number of distinct labels in a 24-hour day
    pub fn frames_per_day(&self) -> u64 {
        24 * 3600 * self.timebase as u64
    }

    /// Canonical spelling of a timecode string.
    ///
    /// Trims surrounding whitespace and maps the `;` and `.` separators used
    /// for drop-frame notation to `:`. Does not validate.
    pub fn normalize(tc: &str) -> String {
        tc.trim().replace([';', '.'], ":")
    }

    /// Parse a timecode into its fields with range checks
    pub fn parse_parts(&self, tc: &str) -> Result<TimecodeParts, TimecodeError> {
        let normalized = Self::normalize(tc);
        let captures = TIMECODE_REGEX
            .captures(&normalized)
            .ok_or_else(|| TimecodeError::InvalidFormat(tc.to_string()))?;

        let field = |i: usize| -> Result<u32, TimecodeError> {
            captures[i]
                .parse::<u32>()
                .map_err(|_| TimecodeError::InvalidFormat(tc.to_string()))
        };

        let parts = TimecodeParts {
            hours: field(1)?,
            minutes: field(2)?,
            seconds: field(3)?,
            frames: field(4)?,
        };

        check_range("hours", parts.hours, MAX_HOURS)?;
        check_range("minutes", parts.minutes, MAX_MINUTES)?;
        check_range("seconds", parts.seconds, MAX_SECONDS)?;
        check_range("frames", parts.frames, self.timebase - 1)?;

        Ok(parts)
    }

    /// Parse a timecode into an absolute frame count
    pub fn parse(&self, tc: &str) -> Result<u64, TimecodeError> {
        Ok(self.parse_parts(tc)?.to_frames(self.timebase))
    }

    /// Format a frame count as a timecode, wrapping at 24 hours
    pub fn format(&self, frames: u64) -> String {
        TimecodeParts::from_frames(frames, self.timebase).to_string()
    }

    /// Offset a timecode by `n` frames (negative allowed), wrapping at 24 hours
    pub fn add_frames(&self, tc: &str, n: i64) -> Result<String, TimecodeError> {
        let start = self.parse(tc)? as i128;
        let day = self.frames_per_day() as i128;
        let shifted = start + n as i128;
        if shifted < 0 || shifted >= day {
            trace!("Timecode {} + {} frames wraps past midnight", tc, n);
        }
        Ok(self.format(shifted.rem_euclid(day) as u64))
    }

    /// Whether the drop-frame skip rule applies to labels in `format` at this rate
    pub fn drop_frame_applies(&self, format: TcFormat) -> bool {
        format == TcFormat::Df && (self.fps - DROP_FRAME_FPS).abs() < FPS_MATCH_TOLERANCE
    }
}

fn check_range(field: &'static str, value: u32, max: u32) -> Result<(), TimecodeError> {
    if value > max {
        return Err(TimecodeError::OutOfRange { field, value, max });
    }
    Ok(())
}
