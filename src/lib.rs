/*!
 * # edlforge - EDL preflight validation and generation
 *
 * A Rust library that checks batches of edit points before they are turned
 * into a CMX3600-style Edit Decision List, and writes the list once the batch
 * is clean.
 *
 * ## Features
 *
 * - Strict SMPTE timecode parsing and formatting (`HH:MM:SS:FF`)
 * - Frame rate, timecode, In/Out, reel name and marker validation
 * - Duplicate and overlap detection per reel
 * - Aggregated preflight summary with a single go/no-go decision
 * - Deterministic EDL text output with a SHA-256 fingerprint
 * - Text and JSON preflight reports
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timecode`: Timecode codec and frame arithmetic
 * - `edit_point`: Input rows and the edit point model
 * - `validation`: Validators and the preflight engine:
 *   - `validation::service`: Orchestration and summary
 *   - `validation::overlap`: Duplicate and overlap detection
 *   - `validation::report`: Report rendering
 * - `edl`: EDL serialization
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod timecode;
pub mod edit_point;
pub mod validation;
pub mod edl;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use edit_point::{EditPoint, RawRow};
pub use edl::EdlSerializer;
pub use timecode::{TcFormat, TimecodeCodec};
pub use validation::{PreflightConfig, PreflightEngine, PreflightRun, PreflightSummary, ValidationIssue, ValidationLevel};
pub use errors::{AppError, ExportError, PreflightError, TimecodeError};
