/*!
 * Validation issue types shared by every validator.
 */

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    /// Reserved for informational notes
    Info,
    /// Point usable but deviates from best practice
    Warning,
    /// Point unusable, excluded from export
    Critical,
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationLevel::Info => write!(f, "INFO"),
            ValidationLevel::Warning => write!(f, "WARNING"),
            ValidationLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Which check produced an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Timecode,
    Fps,
    Timing,
    Duplicate,
    Overlap,
    Reel,
    Marker,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IssueCategory::Timecode => "timecode",
            IssueCategory::Fps => "fps",
            IssueCategory::Timing => "timing",
            IssueCategory::Duplicate => "duplicate",
            IssueCategory::Overlap => "overlap",
            IssueCategory::Reel => "reel",
            IssueCategory::Marker => "marker",
        };
        write!(f, "{}", name)
    }
}

/// A single problem found in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub level: ValidationLevel,
    pub category: IssueCategory,
    /// Provenance row of the point the issue is attributed to
    pub row_number: usize,
    /// Field the issue refers to
    pub field: String,
    pub message: String,
    pub current_value: String,
    pub suggested_fix: String,
}

impl ValidationIssue {
    /// Create an issue with the given level
    pub fn new(
        level: ValidationLevel,
        category: IssueCategory,
        row_number: usize,
        field: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            category,
            row_number,
            field: field.to_string(),
            message: message.into(),
            current_value: String::new(),
            suggested_fix: String::new(),
        }
    }

    /// Create a critical issue
    pub fn critical(
        category: IssueCategory,
        row_number: usize,
        field: &str,
        message: impl Into<String>,
    ) -> Self {
        Self::new(ValidationLevel::Critical, category, row_number, field, message)
    }

    /// Create a warning issue
    pub fn warning(
        category: IssueCategory,
        row_number: usize,
        field: &str,
        message: impl Into<String>,
    ) -> Self {
        Self::new(ValidationLevel::Warning, category, row_number, field, message)
    }

    /// Sets the offending value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.current_value = value.into();
        self
    }

    /// Sets the suggested fix
    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.suggested_fix = fix.into();
        self
    }

    pub fn is_critical(&self) -> bool {
        self.level == ValidationLevel::Critical
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] row {} {} ({}): {}",
            self.level, self.row_number, self.field, self.category, self.message
        )?;
        if !self.current_value.is_empty() {
            write!(f, " (current: {}", self.current_value)?;
            if !self.suggested_fix.is_empty() {
                write!(f, ", fix: {}", self.suggested_fix)?;
            }
            write!(f, ")")?;
        } else if !self.suggested_fix.is_empty() {
            write!(f, " (fix: {})", self.suggested_fix)?;
        }
        Ok(())
    }
}
