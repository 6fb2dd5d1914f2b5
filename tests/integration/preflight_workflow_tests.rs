/*!
 * Integration tests for preflight runs over whole batches
 */

use edlforge::edit_point::RawRow;
use edlforge::edl::EdlSerializer;
use edlforge::validation::{
    CollisionKind, FailPolicy, IssueCategory, PreflightConfig, PreflightEngine, ValidationLevel,
};
use crate::common;

/// Clean batch with a synthesized Out exports two events
#[test]
fn test_cleanBatch_withSynthesizedOut_shouldExport() {
    let mut engine = PreflightEngine::new();

    let run = engine.run(&common::clean_rows());

    assert_eq!(run.summary.critical_count, 0);
    assert_eq!(run.summary.warning_count, 0);
    assert!(run.summary.can_proceed);
    assert_eq!(run.valid_points[1].src_tc_out, "01:00:10:01");

    let edl = EdlSerializer::new("Scenario").serialize(&run.valid_points).unwrap();
    assert!(edl.contains("FCM: NON-DROP FRAME\n"));
    assert!(edl.contains("\n001  TAPE001   V  C  01:00:00:00 01:00:05:00 "));
    assert!(edl.contains("\n002  TAPE001   V  C  01:00:10:00 01:00:10:01 "));
    assert!(edl.contains("* FROM CLIP NAME: Shot1\n"));
}

/// Exact duplicate on one reel blocks the batch with one critical issue
#[test]
fn test_duplicateRows_shouldBlockWithOneCritical() {
    let mut engine = PreflightEngine::new();

    let run = engine.run(&common::duplicate_rows());

    assert_eq!(run.summary.critical_count, 1);
    assert!(!run.summary.can_proceed);
    let critical = run.summary.issues_by_level(ValidationLevel::Critical);
    assert_eq!(critical[0].category, IssueCategory::Duplicate);
    assert_eq!(critical[0].row_number, 2);
    assert_eq!(run.flagged_pairs(), vec![(1, 2)]);
}

/// Empty reel is one critical issue whatever the timecodes
#[test]
fn test_emptyReel_shouldBeSingleCritical() {
    let mut engine = PreflightEngine::new();

    let run = engine.run(&[common::row("", "01:00:00:00", Some("01:00:01:00"))]);

    assert_eq!(run.summary.critical_count, 1);
    assert_eq!(run.summary.issues.len(), 1);
    assert_eq!(run.summary.issues[0].category, IssueCategory::Reel);
    assert!(run.valid_points.is_empty());
}

/// DF label skipped by the drop-frame counter is a single warning
#[test]
fn test_dropFrameSkipLabel_shouldBeSingleWarning() {
    let mut engine = PreflightEngine::new();
    let row = RawRow {
        fps: Some("29.97".to_string()),
        tc_format: Some("DF".to_string()),
        ..common::row("TAPE001", "00:01:00:00", None)
    };

    let run = engine.run(&[row]);

    assert_eq!(run.summary.warning_count, 1);
    assert_eq!(run.summary.critical_count, 0);
    assert_eq!(run.summary.issues[0].category, IssueCategory::Timecode);
    assert!(run.summary.can_proceed);
}

/// Partial overlap warns with the intersection length
#[test]
fn test_partialOverlap_shouldWarnWithIntersection() {
    let mut engine = PreflightEngine::new();
    let rows = vec![
        common::row("TAPE001", "01:00:00:00", Some("01:00:04:00")),
        common::row("TAPE001", "01:00:03:00", Some("01:00:06:00")),
        common::row("TAPE002", "01:00:03:00", Some("01:00:06:00")),
    ];

    let run = engine.run(&rows);

    assert_eq!(run.summary.warning_count, 1);
    assert_eq!(run.summary.critical_count, 0);
    assert_eq!(run.summary.overlap_count, 1);
    assert_eq!(run.findings[0].kind, CollisionKind::Overlap { frames: 25 });
    assert_eq!(run.summary.issues[0].category, IssueCategory::Overlap);
    assert_eq!(run.summary.issues[0].row_number, 2);
}

/// Any point with Out at or before In is absent from valid_points
#[test]
fn test_inOutLaw_shouldExcludeReversedPoints() {
    let mut engine = PreflightEngine::new();
    let rows = vec![
        common::row("A", "01:00:05:00", Some("01:00:05:00")),
        common::row("B", "01:00:05:00", Some("01:00:00:00")),
        common::row("C", "01:00:00:00", Some("01:00:05:00")),
    ];

    let run = engine.run(&rows);

    assert_eq!(run.summary.critical_count, 2);
    assert_eq!(run.valid_points.len(), 1);
    assert_eq!(run.valid_points[0].reel, "C");
}

/// can_proceed tracks the critical count on a mixed batch
#[test]
fn test_aggregateLaw_overMixedBatches() {
    let mut engine = PreflightEngine::new();
    let candidates: Vec<RawRow> = vec![
        common::row("TAPE001", "01:00:00:00", Some("01:00:01:00")),
        common::row("TAPE001", "01:00:00:00", Some("01:00:01:00")),
        common::row("", "01:00:00:00", None),
        common::row("TAPE002", "bad", None),
        RawRow { fps: Some("12".to_string()), ..common::row("TAPE003", "00:00:01:00", None) },
        RawRow { fps: None, ..common::row("TAPE004", "00:00:01:00", None) },
        common::row("TAPE005", "00:00:02:00", Some("00:00:01:00")),
    ];

    // every prefix of the candidate list is its own batch
    for len in 0..=candidates.len() {
        let run = engine.run(&candidates[..len]);
        let criticals = run.summary.issues.iter().filter(|i| i.level == ValidationLevel::Critical).count();
        assert_eq!(run.summary.critical_count, criticals);
        assert_eq!(run.summary.can_proceed, criticals == 0, "prefix {}", len);
        assert_eq!(
            run.summary.issues.len(),
            run.summary.critical_count + run.summary.warning_count + run.summary.info_count
        );
    }
}

/// Unsupported rates never escalate beyond a single warning per row
#[test]
fn test_fpsTolerance_unsupportedRates_shouldOnlyWarn() {
    let mut engine = PreflightEngine::new();
    for fps in ["10", "12.5", "18", "26", "31", "48", "72", "120"] {
        let row = RawRow { fps: Some(fps.to_string()), ..common::row("TAPE001", "00:00:01:00", None) };

        let run = engine.run(&[row]);

        assert_eq!(run.summary.critical_count, 0, "fps {}", fps);
        assert_eq!(run.summary.warning_count, 1, "fps {}", fps);
        assert_eq!(run.summary.issues[0].category, IssueCategory::Fps);
    }
}

/// Lenient policy exposes the rows without critical issues
#[test]
fn test_lenientPolicy_shouldStillReportBlockedBatch() {
    let config = PreflightConfig { policy: FailPolicy::Lenient, ..Default::default() };
    let mut engine = PreflightEngine::with_config(config).unwrap();
    let mut rows = common::duplicate_rows();
    rows.push(common::row("TAPE009", "02:00:00:00", Some("02:00:01:00")));

    let run = engine.run(&rows);

    assert!(!run.summary.can_proceed);
    let exportable: Vec<usize> = run.exportable_points().iter().map(|p| p.row_number).collect();
    assert_eq!(exportable, vec![1, 3]);
}

/// Markers only ever warn
#[test]
fn test_markers_withBadValues_shouldWarnOnly() {
    let mut engine = PreflightEngine::new();
    let row = RawRow {
        marker_name: Some("Beat".to_string()),
        marker_color: Some("Octarine".to_string()),
        marker_duration: Some("zero".to_string()),
        ..common::row("TAPE001", "01:00:00:00", Some("01:00:01:00"))
    };

    let run = engine.run(&[row]);

    assert_eq!(run.summary.critical_count, 0);
    assert_eq!(run.summary.warning_count, 2);
    assert!(run.summary.issues.iter().all(|i| i.category == IssueCategory::Marker));
    assert_eq!(run.valid_points[0].marker.as_ref().unwrap().duration_frames, 1);
}

/// Explicit row numbers from the loader are kept in issues
#[test]
fn test_rowNumbers_fromLoader_shouldBePreserved() {
    let mut engine = PreflightEngine::new();
    let row = RawRow { row: Some(42), ..common::row("", "01:00:00:00", None) };

    let run = engine.run(&[row]);

    assert_eq!(run.summary.issues_for_row(42).len(), 1);
}

/// Frame 29 does not exist at 29.97, where labels stop at 28
#[test]
fn test_ntscFrameAtFlooredRate_shouldBeCritical() {
    let mut engine = PreflightEngine::new();
    let row = RawRow {
        fps: Some("29.97".to_string()),
        ..common::row("TAPE001", "01:00:00:29", Some("01:00:01:00"))
    };

    let run = engine.run(&[row]);

    assert_eq!(run.summary.critical_count, 1);
    assert_eq!(run.summary.issues[0].category, IssueCategory::Timecode);
    assert_eq!(run.summary.issues[0].field, "src_tc_in");
    assert!(run.valid_points.is_empty());
}

/// Rows counted at different rates on one reel are compared in real time
#[test]
fn test_mixedRatesOnOneReel_shouldOnlyFlagRealCollisions() {
    let mut engine = PreflightEngine::new();
    let at_30 = |tc_in: &str, tc_out: &str| RawRow {
        fps: Some("30".to_string()),
        ..common::row("TAPE001", tc_in, Some(tc_out))
    };

    let apart = engine.run(&[
        common::row("TAPE001", "01:00:00:00", Some("01:00:10:00")),
        at_30("00:50:00:00", "00:50:05:00"),
    ]);
    assert!(apart.findings.is_empty());
    assert_eq!(apart.summary.warning_count, 0);

    let overlapping = engine.run(&[
        common::row("TAPE001", "01:00:00:00", Some("01:00:10:00")),
        at_30("01:00:08:00", "01:00:12:00"),
    ]);
    assert_eq!(overlapping.findings.len(), 1);
    assert_eq!(overlapping.findings[0].kind, CollisionKind::Overlap { frames: 60 });
    assert_eq!(overlapping.summary.issues[0].row_number, 2);
}
