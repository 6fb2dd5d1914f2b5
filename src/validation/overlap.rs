/*!
 * Duplicate and overlap detection between edit points.
 *
 * Only intervals on the same reel can collide. Each reel partition is sorted
 * by In point (in label seconds, so mixed frame rates compare correctly) and every point is compared with the following points whose
 * In lies before its Out, so the scan stops early on non-overlapping data.
 * Heavily overlapping reels degrade to a quadratic sweep.
 */

use std::cmp::Ordering;
use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::issue::{IssueCategory, ValidationIssue};
use crate::edit_point::EditPoint;
use crate::timecode::timebase_for;

/// How two intervals collide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CollisionKind {
    /// Identical In and Out
    Duplicate,
    /// Partial intersection of `frames` frames
    Overlap { frames: u64 },
}

/// A pair of rows found colliding on one reel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFinding {
    pub reel: String,
    pub earlier_row: usize,
    /// Row the resulting issue is attributed to
    pub later_row: usize,
    pub kind: CollisionKind,
}

/// Findings and issues of one detection pass
#[derive(Debug, Clone, Default)]
pub struct OverlapResult {
    pub findings: Vec<CollisionFinding>,
    pub issues: Vec<ValidationIssue>,
    /// Slice positions of the later point of every duplicate pair
    pub duplicate_positions: Vec<usize>,
}

impl OverlapResult {
    /// Row-number pairs `(earlier, later)` for traceability
    pub fn flagged_pairs(&self) -> Vec<(usize, usize)> {
        self.findings.iter().map(|f| (f.earlier_row, f.later_row)).collect()
    }

    pub fn duplicate_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.kind == CollisionKind::Duplicate)
            .count()
    }
}

/// A parsed source interval with the timebase its frames were counted at
#[derive(Debug, Clone, Copy)]
struct Span<'a> {
    /// Position in the scanned slice
    index: usize,
    point: &'a EditPoint,
    in_frames: u64,
    out_frames: u64,
    timebase: u32,
}

impl<'a> Span<'a> {
    fn of(index: usize, point: &'a EditPoint) -> Option<Self> {
        let (in_frames, out_frames) = point.interval()?;
        let timebase = timebase_for(point.proj_fps).ok()?;
        Some(Self { index, point, in_frames, out_frames, timebase })
    }

    /// Row number first, batch position for rows sharing a number
    fn order_key(&self) -> (usize, usize) {
        (self.point.row_number, self.index)
    }

    /// `frames` rescaled to the other span's timebase, in units of 1/(tb_a * tb_b) s
    fn scaled(frames: u64, other: &Span<'_>) -> u128 {
        frames as u128 * other.timebase as u128
    }

    fn start_cmp(&self, other: &Span<'_>) -> Ordering {
        Self::scaled(self.in_frames, other).cmp(&Self::scaled(other.in_frames, self))
    }

    /// Whether this span begins before `other` ends
    fn starts_before_end_of(&self, other: &Span<'_>) -> bool {
        Self::scaled(self.in_frames, other) < Self::scaled(other.out_frames, self)
    }

    fn same_span(&self, other: &Span<'_>) -> bool {
        Self::scaled(self.in_frames, other) == Self::scaled(other.in_frames, self)
            && Self::scaled(self.out_frames, other) == Self::scaled(other.out_frames, self)
    }

    /// Length of the intersection in units of 1/(tb_a * tb_b) s
    fn intersection(&self, other: &Span<'_>) -> Option<u128> {
        let start = Self::scaled(self.in_frames, other).max(Self::scaled(other.in_frames, self));
        let end = Self::scaled(self.out_frames, other).min(Self::scaled(other.out_frames, self));
        (start < end).then(|| end - start)
    }

    /// Whole frames of this span covered by `units` of 1/`denominator` s
    fn frames_of(&self, units: u128, denominator: u128) -> u64 {
        (units * self.timebase as u128 / denominator) as u64
    }
}

/// Overlap and duplicate detector
#[derive(Debug, Default)]
pub struct OverlapDetector;

impl OverlapDetector {
    pub fn new() -> Self {
        Self
    }

    /// Scan points for collisions; points without a parsed interval are ignored.
    ///
    /// Intervals are compared in label seconds, so points counted at different
    /// frame rates on one reel still line up. Overlap lengths are expressed in
    /// frames of the later row.
    pub fn detect(&self, points: &[EditPoint]) -> OverlapResult {
        let mut by_reel: BTreeMap<&str, Vec<Span<'_>>> = BTreeMap::new();
        for (index, point) in points.iter().enumerate() {
            if let Some(span) = Span::of(index, point) {
                by_reel.entry(point.reel.as_str()).or_default().push(span);
            }
        }

        let mut result = OverlapResult::default();

        for (reel, mut spans) in by_reel {
            spans.sort_by(|a, b| a.start_cmp(b));
            if spans.iter().any(|s| s.timebase != spans[0].timebase) {
                debug!("Reel {} mixes frame rates, comparing in label seconds", reel);
            }

            for i in 0..spans.len() {
                let a = &spans[i];

                for b in spans[i + 1..].iter().take_while(|b| b.starts_before_end_of(a)) {
                    let (earlier, later) = if b.order_key() > a.order_key() { (a, b) } else { (b, a) };

                    let kind = match a.intersection(b) {
                        Some(_) if a.same_span(b) => CollisionKind::Duplicate,
                        Some(common) => CollisionKind::Overlap {
                            frames: later.frames_of(common, a.timebase as u128 * b.timebase as u128),
                        },
                        None => continue,
                    };

                    if kind == CollisionKind::Duplicate {
                        result.duplicate_positions.push(later.index);
                    }
                    result.issues.push(Self::issue_for(earlier.point, later.point, kind));
                    result.findings.push(CollisionFinding {
                        reel: reel.to_string(),
                        earlier_row: earlier.point.row_number,
                        later_row: later.point.row_number,
                        kind,
                    });
                }
            }
        }

        debug!(
            "Overlap detection: {} points, {} duplicates, {} overlaps",
            points.len(),
            result.duplicate_count(),
            result.findings.len() - result.duplicate_count()
        );

        result
    }

    fn issue_for(earlier: &EditPoint, later: &EditPoint, kind: CollisionKind) -> ValidationIssue {
        let span = format!("{} -> {}", later.src_tc_in, later.src_tc_out);
        match kind {
            CollisionKind::Duplicate => ValidationIssue::critical(
                IssueCategory::Duplicate,
                later.row_number,
                "src_tc_in",
                format!("Duplicate of row {} on reel {}", earlier.row_number, later.reel),
            )
            .with_value(span)
            .with_fix("Remove the duplicate row"),
            CollisionKind::Overlap { frames } => ValidationIssue::warning(
                IssueCategory::Overlap,
                later.row_number,
                "src_tc_in",
                format!(
                    "Overlaps row {} on reel {} by {} frames",
                    earlier.row_number, later.reel, frames
                ),
            )
            .with_value(format!("{} frames", frames))
            .with_fix("Trim one of the edits if the overlap is unintended"),
        }
    }
}
