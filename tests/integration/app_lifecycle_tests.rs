/*!
 * Integration tests for the load, check and export lifecycle
 */

use anyhow::Result;
use edlforge::app_config::Config;
use edlforge::app_controller::{Controller, ExportOutcome, FolderSummary};
use edlforge::edl::fingerprint;
use edlforge::errors::ExportError;
use edlforge::file_utils::FileManager;
use edlforge::validation::{FailPolicy, ReportFormat};
use crate::common;

/// Test checking a batch file without writing anything
#[test]
fn test_checkFile_withCleanBatch_shouldNotWriteOutputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let batch = common::create_batch_file(temp_dir.path(), "cut.json", &common::clean_rows())?;
    let controller = Controller::with_config(Config::default())?;

    let run = controller.check_file(&batch)?;

    assert!(run.summary.can_proceed);
    assert_eq!(run.summary.total_points, 2);
    assert!(!temp_dir.path().join("cut.edl").exists());
    Ok(())
}

/// Test a full export writes the EDL and a report carrying its fingerprint
#[test]
fn test_run_withCleanBatch_shouldWriteEdlAndReport() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let batch = common::create_batch_file(temp_dir.path(), "cut.json", &common::clean_rows())?;
    let out_dir = temp_dir.path().join("out");
    let mut config = Config::default();
    config.export.report_format = ReportFormat::Json;
    let controller = Controller::with_config(config)?;

    let outcome = tokio_test::block_on(controller.run(batch.clone(), out_dir.clone(), false))?;

    let ExportOutcome::Exported { edl_path, report_path, events, fingerprint: digest } = outcome else {
        panic!("expected an export");
    };
    assert_eq!(events, 2);
    assert_eq!(edl_path, out_dir.join("cut.edl"));

    let edl = FileManager::read_to_string(&edl_path)?;
    assert!(edl.starts_with("TITLE: cut\nFCM: NON-DROP FRAME\n\n001  TAPE001 "));
    assert_eq!(fingerprint(&edl), digest);

    let report_path = report_path.expect("report should be written");
    assert_eq!(report_path, out_dir.join("cut.preflight.json"));
    let report: serde_json::Value = serde_json::from_str(&FileManager::read_to_string(&report_path)?)?;
    assert_eq!(report["edl_sha256"], digest.as_str());
    assert_eq!(report["summary"]["can_proceed"], true);
    Ok(())
}

/// Test a blocked batch writes only the report under fail-fast
#[test]
fn test_run_withDuplicates_shouldBlockExport() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let batch = common::create_batch_file(temp_dir.path(), "dup.json", &common::duplicate_rows())?;
    let controller = Controller::with_config(Config::default())?;

    let result = tokio_test::block_on(controller.run(batch, temp_dir.path().to_path_buf(), false));

    let err = result.expect_err("duplicates must block the export");
    assert!(matches!(
        err.downcast_ref::<ExportError>(),
        Some(ExportError::Blocked { critical_count: 1 })
    ));
    assert!(!temp_dir.path().join("dup.edl").exists());

    let report = FileManager::read_to_string(temp_dir.path().join("dup.preflight.txt"))?;
    assert!(report.contains("Status: BLOCKED"));
    assert!(report.contains("[CRITICAL] row 2 src_tc_in (duplicate)"));
    Ok(())
}

/// Test lenient policy exports the rows without critical issues
#[test]
fn test_run_withLenientPolicy_shouldSkipCriticalRows() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut rows = common::duplicate_rows();
    rows.push(common::row("", "02:00:00:00", None));
    let batch = common::create_batch_file(temp_dir.path(), "dup.json", &rows)?;
    let mut config = Config::default();
    config.preflight.policy = FailPolicy::Lenient;
    config.export.write_report = false;
    let controller = Controller::with_config(config)?;

    let outcome = tokio_test::block_on(controller.run(batch, temp_dir.path().to_path_buf(), false))?;

    match outcome {
        ExportOutcome::Exported { events, report_path, .. } => {
            assert_eq!(events, 1);
            assert!(report_path.is_none());
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    let edl = FileManager::read_to_string(temp_dir.path().join("dup.edl"))?;
    assert!(edl.contains("001  TAPE001 "));
    assert!(!edl.contains("002  "));
    Ok(())
}

/// Test an existing EDL is kept unless overwriting is forced
#[test]
fn test_run_withExistingEdl_shouldRespectForceOverwrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let batch = common::create_batch_file(temp_dir.path(), "cut.json", &common::clean_rows())?;
    common::create_test_file(temp_dir.path(), "cut.edl", "old")?;
    let controller = Controller::with_config(Config::default())?;

    let outcome = tokio_test::block_on(controller.run(batch.clone(), temp_dir.path().to_path_buf(), false))?;
    assert!(matches!(outcome, ExportOutcome::Skipped { .. }));
    assert_eq!(FileManager::read_to_string(temp_dir.path().join("cut.edl"))?, "old");

    let outcome = tokio_test::block_on(controller.run(batch, temp_dir.path().to_path_buf(), true))?;
    assert!(matches!(outcome, ExportOutcome::Exported { .. }));
    assert!(FileManager::read_to_string(temp_dir.path().join("cut.edl"))?.starts_with("TITLE: cut\n"));
    Ok(())
}

/// Test a configured title replaces the file stem
#[test]
fn test_run_withConfiguredTitle_shouldWriteIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let batch = common::create_batch_file(temp_dir.path(), "cut.json", &common::clean_rows())?;
    let mut config = Config::default();
    config.export.title = Some("Episode 101".to_string());
    let controller = Controller::with_config(config)?;

    tokio_test::block_on(controller.run(batch, temp_dir.path().to_path_buf(), false))?;

    let edl = FileManager::read_to_string(temp_dir.path().join("cut.edl"))?;
    assert!(edl.starts_with("TITLE: Episode 101\n"));
    Ok(())
}

/// Test folder mode processes every batch and counts outcomes
#[test]
fn test_runFolder_withMixedBatches_shouldCountOutcomes() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    common::create_batch_file(temp_dir.path(), "a.json", &common::clean_rows())?;
    common::create_batch_file(temp_dir.path(), "b.json", &common::duplicate_rows())?;
    let nested = temp_dir.path().join("nested");
    FileManager::ensure_dir(&nested)?;
    common::create_batch_file(&nested, "c.json", &common::clean_rows())?;
    common::create_test_file(temp_dir.path(), "broken.json", "{")?;
    let controller = Controller::with_config(Config::default())?;

    let summary = tokio_test::block_on(controller.run_folder(temp_dir.path().to_path_buf(), false))?;

    assert_eq!(summary, FolderSummary { exported: 2, skipped: 0, blocked: 1, failed: 1 });
    assert!(temp_dir.path().join("a.edl").exists());
    assert!(nested.join("c.edl").exists());
    assert!(!temp_dir.path().join("b.edl").exists());

    // second pass skips what was exported
    let summary = tokio_test::block_on(controller.run_folder(temp_dir.path().to_path_buf(), false))?;
    assert_eq!(summary.skipped, 2);
    Ok(())
}

/// Test folder mode leaves a config file in the batch folder alone
#[test]
fn test_runFolder_withConfigFileInFolder_shouldNotCountIt() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    common::create_batch_file(temp_dir.path(), "a.json", &common::clean_rows())?;
    let config_path = temp_dir.path().join("conf.json");
    Config::default().save(&config_path)?;
    let controller = Controller::with_config(Config::from_file(&config_path)?)?.with_config_file(&config_path);

    let summary = tokio_test::block_on(controller.run_folder(temp_dir.path().to_path_buf(), false))?;

    assert_eq!(summary, FolderSummary { exported: 1, skipped: 0, blocked: 0, failed: 0 });
    assert!(!temp_dir.path().join("conf.edl").exists());
    Ok(())
}

/// Test folder mode on an empty directory
#[test]
fn test_runFolder_withoutBatches_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(Config::default())?;

    let result = tokio_test::block_on(controller.run_folder(temp_dir.path().to_path_buf(), false));

    assert!(result.is_err());
    Ok(())
}
