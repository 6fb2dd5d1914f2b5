use anyhow::{Result, Context};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::edl::{fingerprint, EdlSerializer};
use crate::errors::ExportError;
use crate::file_utils::FileManager;
use crate::validation::{report, FailPolicy, PreflightEngine, PreflightRun};

// @module: Application controller for EDL preflight and export

/// Extension of batch files picked up in folder mode
pub const BATCH_EXTENSION: &str = "json";

/// Extension of written edit decision lists
pub const EDL_EXTENSION: &str = "edl";

/// Config file name skipped in folder mode unless another one is set
pub const DEFAULT_CONFIG_FILE: &str = "conf.json";

/// What happened to one batch file
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// The EDL (and possibly a report) was written
    Exported {
        edl_path: PathBuf,
        report_path: Option<PathBuf>,
        events: usize,
        fingerprint: String,
    },
    /// An EDL already existed and overwriting was not requested
    Skipped { edl_path: PathBuf },
}

/// Counters for a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub exported: usize,
    pub skipped: usize,
    pub blocked: usize,
    pub failed: usize,
}

/// Main application controller for EDL preflight and export
#[derive(Debug, Clone)]
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Config file name never treated as a batch
    config_file_name: String,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;
        Ok(Self {
            config,
            config_file_name: DEFAULT_CONFIG_FILE.to_string(),
        })
    }

    // @method: Set the config file whose name folder mode skips
    pub fn with_config_file<P: AsRef<Path>>(mut self, config_path: P) -> Self {
        if let Some(name) = config_path.as_ref().file_name() {
            self.config_file_name = name.to_string_lossy().to_string();
        }
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run preflight on one batch file without writing anything
    pub fn check_file<P: AsRef<Path>>(&self, input_file: P) -> Result<PreflightRun> {
        Self::preflight_file(&self.config, input_file.as_ref())
    }

    /// Run the full workflow for one batch file: preflight, report, export
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<ExportOutcome> {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || Self::process_file(&config, &input_file, &output_dir, force_overwrite))
            .await
            .context("Export task panicked")?
    }

    /// Run the workflow for every batch file in a directory (recursive).
    /// Outputs are written next to each batch.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let batch_files: Vec<PathBuf> = FileManager::find_files(&input_dir, BATCH_EXTENSION)?
            .into_iter()
            .filter(|path| self.is_batch_file(path))
            .collect();

        if batch_files.is_empty() {
            return Err(anyhow::anyhow!("No batch files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(batch_files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("=>-"));
        folder_pb.set_message("Checking batches");

        // One engine per batch, each on its own blocking task
        let tasks = batch_files.iter().cloned().map(|batch_file| {
            let config = self.config.clone();
            let pb = folder_pb.clone();
            let output_dir = batch_file
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| input_dir.clone());
            tokio::task::spawn_blocking(move || {
                let outcome = Self::process_file(&config, &batch_file, &output_dir, force_overwrite);
                pb.inc(1);
                (batch_file, outcome)
            })
        });

        let mut summary = FolderSummary::default();
        for joined in join_all(tasks).await {
            let (batch_file, outcome) = joined.context("Export task panicked")?;
            match outcome {
                Ok(ExportOutcome::Exported { .. }) => summary.exported += 1,
                Ok(ExportOutcome::Skipped { .. }) => summary.skipped += 1,
                Err(e) if matches!(e.downcast_ref::<ExportError>(), Some(ExportError::Blocked { .. })) => {
                    warn!("Blocked {:?}: {}", batch_file, e);
                    summary.blocked += 1;
                }
                Err(e) => {
                    error!("Error processing batch {:?}: {:#}", batch_file, e);
                    summary.failed += 1;
                }
            }
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed in {}: {} exported, {} skipped, {} blocked, {} errors",
            Self::format_duration(start_time.elapsed()),
            summary.exported,
            summary.skipped,
            summary.blocked,
            summary.failed
        );

        Ok(summary)
    }

    fn preflight_file(config: &Config, input_file: &Path) -> Result<PreflightRun> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        let rows = FileManager::read_rows(input_file)?;
        let mut engine = PreflightEngine::with_config(config.preflight.clone())?;
        let run = engine.run(&rows);

        info!("{}: {}", input_file.display(), run.summary.summary());
        Ok(run)
    }

    fn process_file(config: &Config, input_file: &Path, output_dir: &Path, force_overwrite: bool) -> Result<ExportOutcome> {
        let edl_path = FileManager::generate_output_path(input_file, output_dir, EDL_EXTENSION);
        if edl_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, EDL already exists (use -f to force overwrite)", edl_path);
            return Ok(ExportOutcome::Skipped { edl_path });
        }

        let run = Self::preflight_file(config, input_file)?;
        let summary = &run.summary;
        let source = input_file.to_string_lossy();

        if !summary.can_proceed && config.preflight.policy == FailPolicy::FailFast {
            if config.export.write_report {
                Self::write_report(config, input_file, output_dir, &run, None)?;
            }
            return Err(ExportError::Blocked {
                critical_count: summary.critical_count,
            }
            .into());
        }

        let points = run.exportable_points();
        if points.is_empty() {
            return Err(ExportError::Empty.into());
        }
        if !summary.can_proceed {
            warn!(
                "{}: exporting {} of {} points, {} critical issue(s) left out",
                source,
                points.len(),
                summary.total_points,
                summary.critical_count
            );
        }

        let serializer = EdlSerializer::new(config.export.title_for(input_file));
        let edl = serializer.serialize(&points)?;
        let digest = fingerprint(&edl);
        FileManager::write_to_file(&edl_path, &edl)?;
        debug!("EDL SHA-256 {}", digest);

        let report_path = if config.export.write_report {
            Some(Self::write_report(config, input_file, output_dir, &run, Some(digest.clone()))?)
        } else {
            None
        };

        info!("Success: {}", edl_path.display());

        Ok(ExportOutcome::Exported {
            edl_path,
            report_path,
            events: points.len(),
            fingerprint: digest,
        })
    }

    fn write_report(
        config: &Config,
        input_file: &Path,
        output_dir: &Path,
        run: &PreflightRun,
        edl_sha256: Option<String>,
    ) -> Result<PathBuf> {
        let format = config.export.report_format;
        let report_path = FileManager::generate_output_path(input_file, output_dir, format.extension());
        let content = report::render(format, &input_file.to_string_lossy(), &run.summary, edl_sha256)?;
        FileManager::write_to_file(&report_path, &content)?;
        debug!("Report written to {}", report_path.display());
        Ok(report_path)
    }

    fn is_batch_file(&self, path: &Path) -> bool {
        let is_config = path
            .file_name()
            .map(|name| name.to_string_lossy().eq_ignore_ascii_case(&self.config_file_name))
            .unwrap_or(false);
        !is_config && !Self::is_report_file(path)
    }

    fn is_report_file(path: &Path) -> bool {
        path.file_name()
            .map(|name| name.to_string_lossy().to_lowercase().ends_with(".preflight.json"))
            .unwrap_or(false)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
