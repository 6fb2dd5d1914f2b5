/*!
 * Timecode validation for edit points.
 *
 * This module validates that timecodes are:
 * - Present where required (the source In point)
 * - Properly formatted and within range for the row's frame rate
 * - Not labelling a frame that drop-frame counting skips
 *
 * Parsed frame counts and normalized strings are written back to the point.
 */

use log::trace;

use super::issue::{IssueCategory, ValidationIssue};
use crate::edit_point::EditPoint;
use crate::errors::TimecodeError;
use crate::timecode::{TcFormat, TimecodeCodec};

/// Timecode validator for edit points
#[derive(Debug, Default)]
pub struct TimecodeValidator;

impl TimecodeValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Settle the timecode format for a row
    pub fn resolve_format(
        &self,
        raw: Option<&str>,
        row_number: usize,
        default_format: TcFormat,
    ) -> (TcFormat, Vec<ValidationIssue>) {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return (default_format, vec![]);
        };

        match raw.parse::<TcFormat>() {
            Ok(format) => (format, vec![]),
            Err(_) => (
                default_format,
                vec![
                    ValidationIssue::warning(
                        IssueCategory::Timecode,
                        row_number,
                        "tc_format",
                        format!("Unknown timecode format, using {}", default_format),
                    )
                    .with_value(raw)
                    .with_fix("Use DF or NDF"),
                ],
            ),
        }
    }

    /// Parse every timecode of the point and record the frame counts
    pub fn validate_point(&self, point: &mut EditPoint) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let row = point.row_number;

        let codec = match TimecodeCodec::new(point.proj_fps) {
            Ok(codec) => codec,
            Err(e) => {
                issues.push(
                    ValidationIssue::critical(
                        IssueCategory::Timecode,
                        row,
                        "fps",
                        format!("Cannot count frames: {}", e),
                    )
                    .with_value(point.proj_fps.to_string()),
                );
                return issues;
            }
        };

        // Source In
        match point.src_tc_in_raw.clone() {
            None => issues.push(
                ValidationIssue::critical(
                    IssueCategory::Timecode,
                    row,
                    "src_tc_in",
                    "Source In timecode is missing",
                )
                .with_fix("Provide a start timecode as HH:MM:SS:FF"),
            ),
            Some(raw) => {
                if let Some(frames) =
                    self.parse_checked(&codec, &raw, point.tc_format, row, "src_tc_in", &mut issues)
                {
                    point.src_in_frames = Some(frames);
                    point.src_tc_in = codec.format(frames);
                }
            }
        }

        // Source Out, synthesized one frame after In when absent
        match point.src_tc_out_raw.clone() {
            Some(raw) => {
                if let Some(frames) =
                    self.parse_checked(&codec, &raw, point.tc_format, row, "src_tc_out", &mut issues)
                {
                    point.src_out_frames = Some(frames);
                    point.src_tc_out = codec.format(frames);
                }
            }
            None => {
                if let Some(in_frames) = point.src_in_frames {
                    let out_frames = (in_frames + 1) % codec.frames_per_day();
                    trace!("Row {}: synthesizing Out one frame after In", row);
                    point.src_out_frames = Some(out_frames);
                    point.src_tc_out = codec.format(out_frames);
                    point.out_synthesized = true;
                }
            }
        }

        // Record In
        if let Some(raw) = point.rec_tc_in.clone() {
            point.rec_in_frames =
                self.parse_checked(&codec, &raw, point.tc_format, row, "rec_tc_in", &mut issues);
        }

        issues
    }

    /// Parse one timecode, pushing a critical issue on failure and a warning
    /// for drop-frame skipped labels
    fn parse_checked(
        &self,
        codec: &TimecodeCodec,
        raw: &str,
        format: TcFormat,
        row_number: usize,
        field: &str,
        issues: &mut Vec<ValidationIssue>,
    ) -> Option<u64> {
        let parts = match codec.parse_parts(raw) {
            Ok(parts) => parts,
            Err(e) => {
                issues.push(
                    ValidationIssue::critical(IssueCategory::Timecode, row_number, field, e.to_string())
                        .with_value(raw)
                        .with_fix(fix_for(&e, codec)),
                );
                return None;
            }
        };

        if codec.drop_frame_applies(format) && parts.is_drop_frame_skip() {
            issues.push(
                ValidationIssue::warning(
                    IssueCategory::Timecode,
                    row_number,
                    field,
                    format!("Drop-frame timecode {} labels a frame DF counting skips", parts),
                )
                .with_value(raw)
                .with_fix("Use frame 02 of this second or switch to NDF"),
            );
        }

        Some(parts.to_frames(codec.timebase()))
    }
}

fn fix_for(error: &TimecodeError, codec: &TimecodeCodec) -> String {
    match error {
        TimecodeError::OutOfRange { field: "frames", .. } => {
            format!("Frames must be below {} at {} fps", codec.timebase(), codec.fps())
        }
        TimecodeError::OutOfRange { field, max, .. } => format!("Keep {} at or below {}", field, max),
        _ => "Use zero-padded HH:MM:SS:FF".to_string(),
    }
}
