// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand, Args};
use clap_complete::{generate, Shell};

use edlforge::app_config::{self, Config};
use edlforge::app_controller::{Controller, ExportOutcome};
use edlforge::validation::{report, FailPolicy};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run preflight on a batch and print the report
    Check {
        /// Input batch file (JSON array of rows)
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Run preflight and write the EDL when the batch is clean
    Export(ExportArgs),

    /// Generate shell completions for edlforge
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Input batch file or directory of batches
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// EDL title (defaults to the input file name)
    #[arg(long)]
    title: Option<String>,

    /// Export the rows without critical issues even when the batch is blocked
    #[arg(long)]
    lenient: bool,
}

/// edlforge - EDL preflight validation and generation
///
/// Checks batches of edit points for timecode, frame rate, reel and overlap
/// problems, and writes a CMX3600-style EDL once the batch is clean.
#[derive(Parser, Debug)]
#[command(name = "edlforge")]
#[command(version)]
#[command(about = "EDL preflight validation and generation")]
#[command(long_about = "edlforge validates batches of edit points and writes CMX3600-style EDLs.

EXAMPLES:
    edlforge check cut.json                     # Print the preflight report
    edlforge export cut.json                    # Write cut.edl next to the batch
    edlforge export -f -o out/ cut.json         # Overwrite into another directory
    edlforge export --lenient cut.json          # Skip rows with critical issues
    edlforge --fps 24 export /batches/          # Process a folder of batches
    edlforge completions bash > edlforge.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Default frame rate for rows without one
    #[arg(long, global = true)]
    fps: Option<f64>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(cmd_log_level) = &cli.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(*shell, &mut cmd, "edlforge", &mut std::io::stdout());
            Ok(())
        }
        Commands::Check { input } => {
            let config = load_config(&cli)?;
            run_check(config, input)
        }
        Commands::Export(args) => {
            let mut config = load_config(&cli)?;
            if let Some(title) = &args.title {
                config.export.title = Some(title.clone());
            }
            if args.lenient {
                config.preflight.policy = FailPolicy::Lenient;
            }
            config.validate().context("Configuration validation failed")?;
            run_export(config, &cli.config, args).await
        }
    }
}

/// Load or create the configuration and apply global overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let config_path = &cli.config;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(level_filter(&config.log_level));
    }

    if let Some(fps) = cli.fps {
        config.preflight.default_fps = fps;
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn run_check(config: Config, input: &Path) -> Result<()> {
    let controller = Controller::with_config(config)?;
    let run = controller.check_file(input)?;

    print!("{}", report::render_text(&input.to_string_lossy(), &run.summary));

    if !run.summary.can_proceed {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_export(config: Config, config_path: &str, args: &ExportArgs) -> Result<()> {
    let controller = Controller::with_config(config)?.with_config_file(config_path);

    if args.input.is_file() {
        let output_dir = match &args.output_dir {
            Some(dir) => dir.clone(),
            None => args.input.parent().unwrap_or(Path::new(".")).to_path_buf(),
        };
        match controller.run(args.input.clone(), output_dir, args.force_overwrite).await? {
            ExportOutcome::Exported { events, fingerprint, .. } => {
                info!("Exported {} events (sha256 {})", events, fingerprint);
            }
            ExportOutcome::Skipped { .. } => {}
        }
    } else if args.input.is_dir() {
        if args.output_dir.is_some() {
            warn!("--output-dir is ignored in folder mode; outputs are written next to each batch");
        }
        let summary = controller.run_folder(args.input.clone(), args.force_overwrite).await?;
        if summary.blocked > 0 || summary.failed > 0 {
            std::process::exit(1);
        }
    } else {
        return Err(anyhow::anyhow!("Input path does not exist: {:?}", args.input));
    }

    Ok(())
}
