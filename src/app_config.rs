use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::validation::{FailPolicy, PreflightConfig, ReportFormat};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Preflight engine settings
    #[serde(default)]
    pub preflight: PreflightConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Export configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExportConfig {
    /// EDL title; the input file stem is used when absent
    #[serde(default)]
    pub title: Option<String>,

    /// Whether to write a preflight report next to the EDL
    #[serde(default = "default_true")]
    pub write_report: bool,

    /// Report flavour
    #[serde(default)]
    pub report_format: ReportFormat,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: None,
            write_report: default_true(),
            report_format: ReportFormat::default(),
        }
    }
}

impl ExportConfig {
    /// Title for an EDL built from `input_file`
    pub fn title_for<P: AsRef<Path>>(&self, input_file: P) -> String {
        match &self.title {
            Some(title) if !title.trim().is_empty() => title.clone(),
            _ => input_file
                .as_ref()
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "Untitled".to_string()),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.preflight.validate()?;

        if let Some(title) = &self.export.title {
            if title.contains('\n') {
                return Err(anyhow!("Export title must be a single line"));
            }
        }

        Ok(())
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Save the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Whether export may go ahead with critical issues left in the batch
    pub fn is_lenient(&self) -> bool {
        self.preflight.policy == FailPolicy::Lenient
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            preflight: PreflightConfig::default(),
            export: ExportConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
