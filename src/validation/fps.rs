/*!
 * Frame rate validation.
 *
 * Missing rates fall back to the run default with a warning. Unparseable
 * or non-positive rates are critical but still fall back so the rest of the
 * batch can be evaluated. Unusual rates are accepted with a warning.
 */

use log::trace;

use super::issue::{IssueCategory, ValidationIssue};
use crate::timecode::FPS_MATCH_TOLERANCE;

/// Frame rates professional editors handle natively
pub const SUPPORTED_FPS: [f64; 8] = [23.976, 24.0, 25.0, 29.97, 30.0, 50.0, 59.94, 60.0];

/// Default project frame rate
pub const DEFAULT_FPS: f64 = 25.0;

/// Outcome of checking one frame rate cell
#[derive(Debug, Clone, PartialEq)]
pub struct FpsCheck {
    /// Rate to use for the rest of the run
    pub fps: f64,
    /// Issues raised for the cell
    pub issues: Vec<ValidationIssue>,
}

/// Configuration for frame rate validation
#[derive(Debug, Clone)]
pub struct FpsValidatorConfig {
    pub supported_fps: Vec<f64>,
    pub tolerance: f64,
    pub default_fps: f64,
}

impl Default for FpsValidatorConfig {
    fn default() -> Self {
        Self {
            supported_fps: SUPPORTED_FPS.to_vec(),
            tolerance: FPS_MATCH_TOLERANCE,
            default_fps: DEFAULT_FPS,
        }
    }
}

/// Frame rate validator
pub struct FpsValidator {
    config: FpsValidatorConfig,
}

impl FpsValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self::with_config(FpsValidatorConfig::default())
    }

    /// Create a new validator with custom configuration
    pub fn with_config(config: FpsValidatorConfig) -> Self {
        Self { config }
    }

    /// Whether `fps` is within tolerance of a supported rate
    pub fn is_supported(&self, fps: f64) -> bool {
        self.config
            .supported_fps
            .iter()
            .any(|supported| (fps - supported).abs() <= self.config.tolerance)
    }

    /// Check a frame rate cell and settle the rate for the row
    pub fn validate(&self, fps_value: Option<&str>, row_number: usize) -> FpsCheck {
        let default_fps = self.config.default_fps;

        let raw = match fps_value.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw,
            None => {
                return FpsCheck {
                    fps: default_fps,
                    issues: vec![
                        ValidationIssue::warning(
                            IssueCategory::Fps,
                            row_number,
                            "fps",
                            format!("Frame rate missing, using default {}", default_fps),
                        )
                        .with_fix(format!("Set fps explicitly (default {})", default_fps)),
                    ],
                };
            }
        };

        let fps = match raw.parse::<f64>() {
            Ok(fps) if fps.is_finite() && fps > 0.0 => fps,
            Ok(_) => {
                return FpsCheck {
                    fps: default_fps,
                    issues: vec![
                        ValidationIssue::critical(
                            IssueCategory::Fps,
                            row_number,
                            "fps",
                            "Frame rate must be a positive number",
                        )
                        .with_value(raw)
                        .with_fix(format!("Use a supported rate such as {}", default_fps)),
                    ],
                };
            }
            Err(_) => {
                return FpsCheck {
                    fps: default_fps,
                    issues: vec![
                        ValidationIssue::critical(
                            IssueCategory::Fps,
                            row_number,
                            "fps",
                            "Frame rate is not numeric",
                        )
                        .with_value(raw)
                        .with_fix(format!("Use a numeric rate such as {}", default_fps)),
                    ],
                };
            }
        };

        if self.is_supported(fps) {
            return FpsCheck { fps, issues: vec![] };
        }

        trace!("Row {}: unusual frame rate {}", row_number, fps);
        FpsCheck {
            fps,
            issues: vec![
                ValidationIssue::warning(
                    IssueCategory::Fps,
                    row_number,
                    "fps",
                    format!("Unusual frame rate {}", fps),
                )
                .with_value(raw)
                .with_fix(format!("Supported rates: {}", self.supported_list())),
            ],
        }
    }

    fn supported_list(&self) -> String {
        self.config
            .supported_fps
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for FpsValidator {
    fn default() -> Self {
        Self::new()
    }
}
