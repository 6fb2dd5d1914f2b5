/*!
 * Marker metadata validation.
 *
 * Markers are carried through to the editor for marker placement. Problems
 * here never block an export: unknown colors are reported and passed on,
 * unusable durations fall back to a single frame.
 */

use super::issue::{IssueCategory, ValidationIssue};
use crate::edit_point::EditPoint;

/// Marker colors accepted by the editor's marker palette
pub const MARKER_COLORS: [&str; 16] = [
    "Blue", "Cyan", "Green", "Yellow", "Red", "Pink", "Purple", "Fuchsia", "Rose", "Lavender",
    "Sky", "Mint", "Lemon", "Sand", "Cocoa", "Cream",
];

/// Marker validator
#[derive(Debug, Default)]
pub struct MarkerValidator;

impl MarkerValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check the marker of one point, settling its duration
    pub fn validate_point(&self, point: &mut EditPoint) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let row = point.row_number;
        let Some(marker) = point.marker.as_mut() else {
            return issues;
        };

        if let Some(color) = marker.color.clone() {
            match MARKER_COLORS.iter().find(|c| c.eq_ignore_ascii_case(&color)) {
                Some(canonical) => marker.color = Some(canonical.to_string()),
                None => issues.push(
                    ValidationIssue::warning(IssueCategory::Marker, row, "marker_color", "Unknown marker color")
                        .with_value(color)
                        .with_fix(format!("Use one of: {}", MARKER_COLORS.join(", "))),
                ),
            }
        }

        marker.duration_frames = 1;
        if let Some(raw) = marker.duration_raw.as_deref() {
            match raw.parse::<u64>() {
                Ok(frames) if frames >= 1 => marker.duration_frames = frames,
                _ => issues.push(
                    ValidationIssue::warning(
                        IssueCategory::Marker,
                        row,
                        "marker_duration",
                        "Marker duration must be a whole number of frames, using 1",
                    )
                    .with_value(raw)
                    .with_fix("Set a duration of at least 1 frame"),
                ),
            }
        }

        issues
    }
}
