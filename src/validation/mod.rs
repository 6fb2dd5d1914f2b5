/*!
 * Preflight validation of edit point batches.
 *
 * Every validator appends `ValidationIssue`s instead of failing, so a run
 * reports every problem in the batch at once:
 * - `fps`: frame rate presence, numeric value and support
 * - `timecodes`: timecode syntax, ranges and drop-frame labels
 * - `in_out`: interval ordering and duration
 * - `reel`: reel name presence, length and characters
 * - `markers`: marker color and duration
 * - `overlap`: duplicates and overlaps on the same reel
 * - `service`: the engine that runs all of the above
 * - `report`: text and JSON rendering of a run
 */

pub mod issue;
pub mod fps;
pub mod timecodes;
pub mod in_out;
pub mod reel;
pub mod markers;
pub mod overlap;
pub mod service;
pub mod report;

// Re-export main types
pub use issue::{IssueCategory, ValidationIssue, ValidationLevel};
pub use overlap::{CollisionFinding, CollisionKind, OverlapDetector};
pub use report::ReportFormat;
pub use service::{FailPolicy, PreflightConfig, PreflightEngine, PreflightRun, PreflightSummary};
