/*!
 * Common test utilities for the edlforge test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

use edlforge::edit_point::RawRow;

/// Routes library logs through env_logger (RUST_LOG) for test output
pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds a loader row at 25 fps
pub fn row(reel: &str, tc_in: &str, tc_out: Option<&str>) -> RawRow {
    RawRow {
        reel: Some(reel.to_string()),
        clip_name: Some("Shot".to_string()),
        src_tc_in: Some(tc_in.to_string()),
        src_tc_out: tc_out.map(str::to_string),
        fps: Some("25".to_string()),
        ..Default::default()
    }
}

/// Builds a named loader row at 25 fps
pub fn named_row(reel: &str, clip: &str, tc_in: &str, tc_out: Option<&str>) -> RawRow {
    RawRow {
        clip_name: Some(clip.to_string()),
        ..row(reel, tc_in, tc_out)
    }
}

/// Writes rows as a JSON batch file
pub fn create_batch_file(dir: &Path, filename: &str, rows: &[RawRow]) -> Result<PathBuf> {
    let content = serde_json::to_string_pretty(rows)?;
    create_test_file(dir, filename, &content)
}

/// A clean two-row batch on one reel
pub fn clean_rows() -> Vec<RawRow> {
    vec![
        named_row("TAPE001", "Shot1", "01:00:00:00", Some("01:00:05:00")),
        named_row("TAPE001", "Shot2", "01:00:10:00", None),
    ]
}

/// A batch carrying one exact duplicate
pub fn duplicate_rows() -> Vec<RawRow> {
    vec![
        named_row("TAPE001", "Shot1", "01:00:02:00", Some("01:00:04:00")),
        named_row("TAPE001", "Shot1b", "01:00:02:00", Some("01:00:04:00")),
    ]
}
