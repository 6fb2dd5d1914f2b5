/*!
 * In/Out ordering and duration checks.
 */

use super::issue::{IssueCategory, ValidationIssue};
use crate::edit_point::EditPoint;

/// Seconds in the longest plausible edit
const MAX_PLAUSIBLE_SECONDS: f64 = 24.0 * 3600.0;

/// Validates that an edit point describes a forward, plausible interval
#[derive(Debug, Default)]
pub struct InOutValidator;

impl InOutValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check the parsed interval and record its duration.
    ///
    /// Points whose timecodes did not parse are left untouched; the
    /// timecode validator already reported them.
    pub fn validate_point(&self, point: &mut EditPoint) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let Some((in_frames, out_frames)) = point.interval() else {
            return issues;
        };
        let row = point.row_number;

        if out_frames <= in_frames {
            issues.push(
                ValidationIssue::critical(
                    IssueCategory::Timing,
                    row,
                    "src_tc_out",
                    "Out not after In",
                )
                .with_value(format!("{} -> {}", point.src_tc_in, point.src_tc_out))
                .with_fix("Set an Out timecode later than the In timecode"),
            );
            point.duration_frames = None;
            return issues;
        }

        let duration = out_frames - in_frames;
        point.duration_frames = Some(duration);

        if duration < 1 {
            issues.push(
                ValidationIssue::warning(IssueCategory::Timing, row, "duration", "Edit shorter than one frame")
                    .with_value(duration.to_string()),
            );
        }

        if duration as f64 > point.proj_fps * MAX_PLAUSIBLE_SECONDS {
            issues.push(
                ValidationIssue::warning(IssueCategory::Timing, row, "duration", "Implausibly long edit")
                    .with_value(format!("{} frames", duration))
                    .with_fix("Check the In and Out timecodes"),
            );
        }

        issues
    }
}
