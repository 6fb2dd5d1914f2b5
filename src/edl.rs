/*!
 * CMX3600-style EDL serialization.
 *
 * The serializer trusts its input: callers gate on the preflight result
 * before handing points over. Output is fully deterministic.
 *
 * Record timecodes come from the point's `rec_tc_in` when present. Without
 * one, the point is placed in a one-frame slot of the legacy sequential
 * marker layout (clip N occupies frames N-1..N of the record timeline),
 * which is not an assemble edit.
 */

use std::fmt::Write;

use log::debug;
use sha2::{Digest, Sha256};

use crate::edit_point::EditPoint;
use crate::errors::ExportError;
use crate::timecode::{TcFormat, TimecodeCodec};

/// Width of the reel column
pub const REEL_COLUMN_WIDTH: usize = 8;

/// Where an event lands on the record timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordPlacement {
    /// Record In supplied by the row; Record Out = Record In + duration
    FromRecordIn { rec_in: u64, rec_out: u64 },
    /// Legacy one-frame slot for the 1-based event number `slot`
    SequentialMarker { slot: u64 },
}

impl RecordPlacement {
    /// Placement of the `index`-th (0-based) point in the list
    pub fn for_point(point: &EditPoint, index: usize, duration: u64) -> Self {
        match point.rec_in_frames {
            Some(rec_in) => RecordPlacement::FromRecordIn {
                rec_in,
                rec_out: rec_in + duration,
            },
            None => RecordPlacement::SequentialMarker {
                slot: index as u64 + 1,
            },
        }
    }

    /// Record In and Out frame counts
    pub fn frames(&self) -> (u64, u64) {
        match *self {
            RecordPlacement::FromRecordIn { rec_in, rec_out } => (rec_in, rec_out),
            RecordPlacement::SequentialMarker { slot } => (slot - 1, slot),
        }
    }
}

/// EDL text emitter
#[derive(Debug, Clone)]
pub struct EdlSerializer {
    title: String,
}

impl EdlSerializer {
    /// Create a serializer writing the given title
    pub fn new(title: impl Into<String>) -> Self {
        let title: String = title.into();
        Self {
            title: title.replace(['\r', '\n'], " ").trim().to_string(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Serialize points in input order
    pub fn serialize(&self, points: &[EditPoint]) -> Result<String, ExportError> {
        let fcm = frame_code_mode(points);

        let mut out = String::new();
        let _ = writeln!(out, "TITLE: {}", self.title);
        let _ = writeln!(out, "FCM: {}", fcm.fcm_label());
        out.push('\n');

        for (index, point) in points.iter().enumerate() {
            self.write_event(&mut out, index, point)?;
        }

        debug!(
            "Serialized {} events ({}) for '{}'",
            points.len(),
            fcm,
            self.title
        );

        Ok(out)
    }

    fn write_event(&self, out: &mut String, index: usize, point: &EditPoint) -> Result<(), ExportError> {
        let (src_in, src_out) = point
            .interval()
            .ok_or(ExportError::Unvalidated(point.row_number))?;
        let duration = point
            .duration_frames
            .unwrap_or_else(|| src_out.saturating_sub(src_in));
        let codec = TimecodeCodec::new(point.proj_fps)?;

        let (rec_in, rec_out) = RecordPlacement::for_point(point, index, duration).frames();

        let _ = writeln!(
            out,
            "{:03}  {}  V  C  {} {} {} {}",
            index + 1,
            reel_column(&point.reel),
            codec.format(src_in),
            codec.format(src_out),
            codec.format(rec_in),
            codec.format(rec_out)
        );
        let _ = writeln!(out, "* FROM CLIP NAME: {}", point.display_name());

        if let Some(marker) = &point.marker {
            let mut line = format!("* MARKER: {}", marker.name);
            if let Some(color) = &marker.color {
                let _ = write!(line, " | COLOR: {}", color);
            }
            if let Some(note) = &marker.note {
                let _ = write!(line, " | NOTE: {}", note);
            }
            let _ = write!(line, " | DURATION: {}", marker.duration_frames);
            let _ = writeln!(out, "{}", line);
        }

        if let Some(uid) = &point.uid {
            let _ = writeln!(out, "* UID: {}", uid);
        }

        out.push('\n');
        Ok(())
    }
}

/// Reel name space-padded or truncated to the column width
pub fn reel_column(reel: &str) -> String {
    let truncated: String = reel.chars().take(REEL_COLUMN_WIDTH).collect();
    format!("{:<width$}", truncated, width = REEL_COLUMN_WIDTH)
}

/// Hex SHA-256 of an EDL text
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// FCM header chosen for a list of points: the first point's format
pub fn frame_code_mode(points: &[EditPoint]) -> TcFormat {
    points.first().map(|p| p.tc_format).unwrap_or_default()
}
