/*!
 * Error types for the edlforge engine.
 *
 * Data-quality problems in a batch never surface here: they are reported as
 * `ValidationIssue`s. These types cover timecode arithmetic failures, misuse
 * of the engine API and the file/export layer, using the thiserror crate for
 * ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised by the timecode codec
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimecodeError {
    /// The string is not four zero-padded, colon-separated numeric fields
    #[error("Invalid timecode format: '{0}' (expected HH:MM:SS:FF)")]
    InvalidFormat(String),

    /// One of the fields exceeds its allowed range
    #[error("Timecode {field} out of range: {value} (max: {max})")]
    OutOfRange {
        /// Name of the offending field
        field: &'static str,
        /// Value found in the timecode
        value: u32,
        /// Largest value allowed for this field
        max: u32,
    },

    /// The frame rate cannot drive frame arithmetic
    #[error("Invalid frame rate: {0}")]
    InvalidFps(f64),
}

/// Structural misuse of the preflight engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreflightError {
    /// The engine configuration cannot produce a meaningful run
    #[error("Invalid preflight configuration: {0}")]
    InvalidConfig(String),
}

/// Errors that can occur while exporting an EDL
#[derive(Error, Debug)]
pub enum ExportError {
    /// The run still carries critical issues and the policy is fail-fast
    #[error("Export blocked: {critical_count} critical issue(s) must be fixed first")]
    Blocked {
        /// Number of critical issues in the run
        critical_count: usize,
    },

    /// Nothing survived validation
    #[error("No valid edit points to export")]
    Empty,

    /// A point reached the serializer without computed frame counts
    #[error("Row {0} has not been validated")]
    Unvalidated(usize),

    /// Frame arithmetic failed for a point
    #[error("Timecode error: {0}")]
    Timecode(#[from] TimecodeError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from timecode handling
    #[error("Timecode error: {0}")]
    Timecode(#[from] TimecodeError),

    /// Error from engine setup
    #[error("Preflight error: {0}")]
    Preflight(#[from] PreflightError),

    /// Error from EDL export
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
