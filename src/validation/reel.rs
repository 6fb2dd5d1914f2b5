/*!
 * Reel name validation.
 *
 * Reel names link an edit to a source asset in the editor's media pool.
 * Only an empty name is blocking; long names and characters that file
 * systems reject are kept unchanged and reported as warnings.
 */

use super::issue::{IssueCategory, ValidationIssue};
use crate::edit_point::EditPoint;

/// Longest reel name legacy EDL consumers handle reliably
pub const DEFAULT_MAX_REEL_LENGTH: usize = 32;

/// Characters rejected by common file systems
pub const FORBIDDEN_REEL_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Reel name validator
#[derive(Debug)]
pub struct ReelNameValidator {
    max_length: usize,
}

impl ReelNameValidator {
    /// Create a new validator with the default length limit
    pub fn new() -> Self {
        Self::with_max_length(DEFAULT_MAX_REEL_LENGTH)
    }

    /// Create a new validator with a custom length limit
    pub fn with_max_length(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Check the reel name of one point
    pub fn validate_point(&self, point: &EditPoint) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let row = point.row_number;
        let reel = point.reel.as_str();

        if reel.trim().is_empty() {
            issues.push(
                ValidationIssue::critical(IssueCategory::Reel, row, "reel", "Reel name is empty")
                    .with_value(format!("'{}'", reel))
                    .with_fix("Set the reel/tape name of the source clip"),
            );
            return issues;
        }

        let length = reel.chars().count();
        if length > self.max_length {
            issues.push(
                ValidationIssue::warning(
                    IssueCategory::Reel,
                    row,
                    "reel",
                    format!("Reel name longer than {} characters", self.max_length),
                )
                .with_value(reel)
                .with_fix("Shorten the reel name; the EDL column truncates it"),
            );
        }

        let forbidden: String = reel.chars().filter(|c| FORBIDDEN_REEL_CHARS.contains(c)).collect();
        if !forbidden.is_empty() {
            issues.push(
                ValidationIssue::warning(
                    IssueCategory::Reel,
                    row,
                    "reel",
                    format!("Reel name contains forbidden characters: {}", forbidden),
                )
                .with_value(reel)
                .with_fix("Remove characters <>:\"/\\|?*"),
            );
        }

        issues
    }
}

impl Default for ReelNameValidator {
    fn default() -> Self {
        Self::new()
    }
}
