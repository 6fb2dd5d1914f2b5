/*!
 * Preflight engine that orchestrates all validators over a batch.
 *
 * A run never stops at the first problem: every candidate is evaluated so
 * the report is complete, malformed rows surface as critical issues and are
 * left out of `valid_points` while staying visible in the report.
 */

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::edit_point::{EditPoint, RawRow};
use crate::errors::PreflightError;
use crate::timecode::{TcFormat, FPS_MATCH_TOLERANCE};

use super::fps::{FpsValidator, FpsValidatorConfig, DEFAULT_FPS, SUPPORTED_FPS};
use super::in_out::InOutValidator;
use super::issue::{ValidationIssue, ValidationLevel};
use super::markers::MarkerValidator;
use super::overlap::{CollisionFinding, OverlapDetector};
use super::reel::{ReelNameValidator, DEFAULT_MAX_REEL_LENGTH};
use super::timecodes::TimecodeValidator;

/// What to do with a batch that still carries critical issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailPolicy {
    /// Refuse to export until every critical issue is fixed
    #[default]
    FailFast,
    /// Export the points without critical issues and skip the rest
    Lenient,
}

/// Configuration for a preflight engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreflightConfig {
    /// Frame rate used when a row has none (or an unusable one)
    #[serde(default = "default_fps")]
    pub default_fps: f64,

    /// Frame rates accepted without a warning
    #[serde(default = "default_supported_fps")]
    pub supported_fps: Vec<f64>,

    /// Tolerance when matching against supported rates
    #[serde(default = "default_fps_tolerance")]
    pub fps_tolerance: f64,

    /// Longest reel name accepted without a warning
    #[serde(default = "default_max_reel_length")]
    pub max_reel_length: usize,

    /// Timecode format used when a row has none
    #[serde(default)]
    pub default_tc_format: TcFormat,

    /// Export policy for batches with critical issues
    #[serde(default)]
    pub policy: FailPolicy,
}

fn default_fps() -> f64 {
    DEFAULT_FPS
}

fn default_supported_fps() -> Vec<f64> {
    SUPPORTED_FPS.to_vec()
}

fn default_fps_tolerance() -> f64 {
    FPS_MATCH_TOLERANCE
}

fn default_max_reel_length() -> usize {
    DEFAULT_MAX_REEL_LENGTH
}

impl Default for PreflightConfig {
    fn default() -> Self {
        Self {
            default_fps: default_fps(),
            supported_fps: default_supported_fps(),
            fps_tolerance: default_fps_tolerance(),
            max_reel_length: default_max_reel_length(),
            default_tc_format: TcFormat::default(),
            policy: FailPolicy::default(),
        }
    }
}

impl PreflightConfig {
    /// Reject configurations that cannot drive a run
    pub fn validate(&self) -> Result<(), PreflightError> {
        if !self.default_fps.is_finite() || self.default_fps < 1.0 {
            return Err(PreflightError::InvalidConfig(format!(
                "default_fps must be at least 1, got {}",
                self.default_fps
            )));
        }
        if self.supported_fps.is_empty() {
            return Err(PreflightError::InvalidConfig(
                "supported_fps must not be empty".to_string(),
            ));
        }
        if self.fps_tolerance.is_nan() || self.fps_tolerance < 0.0 {
            return Err(PreflightError::InvalidConfig(format!(
                "fps_tolerance must not be negative, got {}",
                self.fps_tolerance
            )));
        }
        if self.max_reel_length == 0 {
            return Err(PreflightError::InvalidConfig(
                "max_reel_length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Aggregate outcome of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreflightSummary {
    pub total_points: usize,
    pub valid_points: usize,
    pub critical_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    /// Duplicate and overlap problems found
    pub overlap_count: usize,
    pub can_proceed: bool,
    pub recommendation: String,
    /// Every issue of the run, in the order it was raised
    pub issues: Vec<ValidationIssue>,
}

impl PreflightSummary {
    fn from_issues(
        total_points: usize,
        valid_points: usize,
        overlap_count: usize,
        issues: Vec<ValidationIssue>,
    ) -> Self {
        let count = |level: ValidationLevel| issues.iter().filter(|i| i.level == level).count();
        let critical_count = count(ValidationLevel::Critical);
        let warning_count = count(ValidationLevel::Warning);
        let info_count = count(ValidationLevel::Info);

        let recommendation = if critical_count > 0 {
            format!("Blocked: fix {} critical issue(s) before exporting", critical_count)
        } else if warning_count > 0 {
            format!("Proceed with {} warning(s)", warning_count)
        } else {
            "No issues found".to_string()
        };

        Self {
            total_points,
            valid_points,
            critical_count,
            warning_count,
            info_count,
            overlap_count,
            can_proceed: critical_count == 0,
            recommendation,
            issues,
        }
    }

    /// Issues of a given level
    pub fn issues_by_level(&self, level: ValidationLevel) -> Vec<&ValidationIssue> {
        self.issues.iter().filter(|i| i.level == level).collect()
    }

    /// Issues attributed to a row
    pub fn issues_for_row(&self, row_number: usize) -> Vec<&ValidationIssue> {
        self.issues.iter().filter(|i| i.row_number == row_number).collect()
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        format!(
            "Preflight: {}/{} valid, {} critical, {} warnings, {} info - {}",
            self.valid_points,
            self.total_points,
            self.critical_count,
            self.warning_count,
            self.info_count,
            self.recommendation
        )
    }
}

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct PreflightRun {
    pub summary: PreflightSummary,
    /// Every candidate, in input order, with computed fields filled in
    pub points: Vec<EditPoint>,
    /// Candidates that passed the per-point checks, in input order
    pub valid_points: Vec<EditPoint>,
    /// Collisions found among `valid_points`
    pub findings: Vec<CollisionFinding>,
    /// Positions in `valid_points` of the later rows of duplicates
    pub duplicate_positions: Vec<usize>,
}

impl PreflightRun {
    /// Row-number pairs flagged by overlap detection
    pub fn flagged_pairs(&self) -> Vec<(usize, usize)> {
        self.findings.iter().map(|f| (f.earlier_row, f.later_row)).collect()
    }

    /// Valid points that no critical issue is attributed to.
    ///
    /// Equals `valid_points` minus the later rows of duplicates, keyed by
    /// position so rows sharing a row number are told apart.
    pub fn exportable_points(&self) -> Vec<EditPoint> {
        self.valid_points
            .iter()
            .enumerate()
            .filter(|(position, _)| !self.duplicate_positions.contains(position))
            .map(|(_, point)| point.clone())
            .collect()
    }
}

/// Lifecycle of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Completed,
}

/// Preflight validation engine
pub struct PreflightEngine {
    config: PreflightConfig,
    state: EngineState,
    issues: Vec<ValidationIssue>,
    fps_validator: FpsValidator,
    timecode_validator: TimecodeValidator,
    in_out_validator: InOutValidator,
    reel_validator: ReelNameValidator,
    marker_validator: MarkerValidator,
    overlap_detector: OverlapDetector,
}

impl PreflightEngine {
    /// Create a new engine with default configuration
    pub fn new() -> Self {
        Self::build(PreflightConfig::default())
    }

    /// Create a new engine with custom configuration
    pub fn with_config(config: PreflightConfig) -> Result<Self, PreflightError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PreflightConfig) -> Self {
        let fps_config = FpsValidatorConfig {
            supported_fps: config.supported_fps.clone(),
            tolerance: config.fps_tolerance,
            default_fps: config.default_fps,
        };

        Self {
            fps_validator: FpsValidator::with_config(fps_config),
            timecode_validator: TimecodeValidator::new(),
            in_out_validator: InOutValidator::new(),
            reel_validator: ReelNameValidator::with_max_length(config.max_reel_length),
            marker_validator: MarkerValidator::new(),
            overlap_detector: OverlapDetector::new(),
            state: EngineState::Idle,
            issues: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &PreflightConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Run preflight over loader rows
    pub fn run(&mut self, rows: &[RawRow]) -> PreflightRun {
        let candidates = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                EditPoint::from_row(row, index, self.config.default_fps, self.config.default_tc_format)
            })
            .collect();
        self.run_points(candidates)
    }

    /// Run preflight over already built candidates
    pub fn run_points(&mut self, mut candidates: Vec<EditPoint>) -> PreflightRun {
        self.state = EngineState::Running;
        self.issues.clear();
        trace!("Preflight started for {} candidates", candidates.len());

        // Per-point checks
        let mut survivors = Vec::with_capacity(candidates.len());
        for (index, point) in candidates.iter_mut().enumerate() {
            let first_issue = self.issues.len();
            self.check_point(point);
            if !self.issues[first_issue..].iter().any(ValidationIssue::is_critical) {
                survivors.push(index);
            }
        }

        // Reel names, regardless of timing validity
        for (index, point) in candidates.iter().enumerate() {
            let reel_issues = self.reel_validator.validate_point(point);
            if reel_issues.iter().any(ValidationIssue::is_critical) {
                survivors.retain(|&i| i != index);
            }
            self.issues.extend(reel_issues);
        }

        let valid_points: Vec<EditPoint> = survivors.iter().map(|&i| candidates[i].clone()).collect();

        // Collisions among valid points only
        let overlap = self.overlap_detector.detect(&valid_points);
        let findings = overlap.findings;
        let mut duplicate_positions = overlap.duplicate_positions;
        duplicate_positions.sort_unstable();
        duplicate_positions.dedup();
        self.issues.extend(overlap.issues);

        let summary = PreflightSummary::from_issues(
            candidates.len(),
            valid_points.len(),
            findings.len(),
            self.issues.clone(),
        );

        debug!("{}", summary.summary());
        self.state = EngineState::Completed;

        PreflightRun {
            summary,
            points: candidates,
            valid_points,
            findings,
            duplicate_positions,
        }
    }

    fn check_point(&mut self, point: &mut EditPoint) {
        let row = point.row_number;

        let fps_check = self.fps_validator.validate(point.fps_raw.as_deref(), row);
        point.proj_fps = fps_check.fps;
        self.issues.extend(fps_check.issues);

        let (format, format_issues) = self.timecode_validator.resolve_format(
            point.tc_format_raw.as_deref(),
            row,
            self.config.default_tc_format,
        );
        point.tc_format = format;
        self.issues.extend(format_issues);

        let timecode_issues = self.timecode_validator.validate_point(point);
        self.issues.extend(timecode_issues);

        let timing_issues = self.in_out_validator.validate_point(point);
        self.issues.extend(timing_issues);

        let marker_issues = self.marker_validator.validate_point(point);
        self.issues.extend(marker_issues);
    }
}

impl Default for PreflightEngine {
    fn default() -> Self {
        Self::new()
    }
}
