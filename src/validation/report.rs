/*!
 * Rendering of preflight reports for people and for CI.
 */

use std::fmt::Write;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::service::PreflightSummary;

/// Output flavour of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    /// File extension used when the report is written next to the EDL
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "preflight.txt",
            ReportFormat::Json => "preflight.json",
        }
    }
}

/// Machine-readable report artefact
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument<'a> {
    pub source: &'a str,
    pub generated_at: String,
    pub summary: &'a PreflightSummary,
    /// SHA-256 of the exported EDL, when one was written
    pub edl_sha256: Option<String>,
}

/// Human-readable report: a summary block followed by one line per issue
pub fn render_text(source: &str, summary: &PreflightSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Preflight report for {}", source);
    let _ = writeln!(
        out,
        "Points: {} total, {} valid",
        summary.total_points, summary.valid_points
    );
    let _ = writeln!(
        out,
        "Issues: {} critical, {} warning, {} info ({} duplicate/overlap)",
        summary.critical_count, summary.warning_count, summary.info_count, summary.overlap_count
    );
    let _ = writeln!(
        out,
        "Status: {}",
        if summary.can_proceed { "READY" } else { "BLOCKED" }
    );
    let _ = writeln!(out, "Recommendation: {}", summary.recommendation);

    if !summary.issues.is_empty() {
        out.push('\n');
        for issue in &summary.issues {
            let _ = writeln!(out, "{}", issue);
        }
    }

    out
}

/// JSON report, optionally carrying the fingerprint of the exported EDL
pub fn render_json(source: &str, summary: &PreflightSummary, edl_sha256: Option<String>) -> Result<String> {
    let document = ReportDocument {
        source,
        generated_at: chrono::Utc::now().to_rfc3339(),
        summary,
        edl_sha256,
    };
    serde_json::to_string_pretty(&document).context("Failed to serialize preflight report")
}

/// Render in the requested format
pub fn render(
    format: ReportFormat,
    source: &str,
    summary: &PreflightSummary,
    edl_sha256: Option<String>,
) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(source, summary)),
        ReportFormat::Json => render_json(source, summary, edl_sha256),
    }
}
