// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use log::{debug, error, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::Write;
use std::process::ExitCode;
use clap::{Parser, ValueEnum, CommandFactory};
use clap::error::ErrorKind;
use clap_complete::{generate, Shell};

use txt2srt::app_config::{Config, LogLevel};
use txt2srt::app_controller::{Controller, RunOutcome};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// txt2srt - turn timestamped plain-text transcripts into SRT subtitles
#[derive(Parser, Debug)]
#[command(name = "txt2srt")]
#[command(version)]
#[command(about = "Convert timestamped text transcripts into SRT subtitles")]
#[command(long_about = "txt2srt reads a transcript where timestamps (MM:SS, H:MM:SS or HH:MM:SS) \
sit on their own lines, groups the text after each timestamp into a subtitle cue shown for two \
seconds, and writes the result as a SubRip (.srt) file.

EXAMPLES:
    txt2srt talk.txt talk.srt                   # Convert one transcript
    txt2srt -f transcripts/ subtitles/          # Convert a whole directory tree
    txt2srt --completions bash > txt2srt.bash   # Generate bash completions

CONFIGURATION:
    An optional JSON config can be passed with --config. Every field is optional:
    {\"log_level\": \"info\", \"transcript_extension\": \"txt\", \"output_extension\": \"srt\"}")]
struct CommandLineOptions {
    /// Print shell completions for txt2srt and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,

    /// Transcript file, or directory of transcripts
    #[arg(value_name = "INPUT")]
    input_path: Option<PathBuf>,

    /// Subtitle file to write, or output directory in folder mode
    #[arg(value_name = "OUTPUT")]
    output_path: Option<PathBuf>,

    /// Overwrite existing subtitle files in folder mode
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: ANSI colour sequence for log level
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
    // The global max level is what actually filters; this keeps the ceiling
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

fn print_usage() {
    let mut cmd = CommandLineOptions::command();
    println!("{}", cmd.render_usage());
    println!();
    println!("Run 'txt2srt --help' for more information.");
}

fn main() -> ExitCode {
    // Installed with the most verbose ceiling; the effective level is
    // narrowed through log::set_max_level once options are known
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = match CommandLineOptions::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            debug!("Argument error: {}", e);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    if let Some(shell) = cli.completions {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "txt2srt", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    let (input_path, output_path) = match (cli.input_path.clone(), cli.output_path.clone()) {
        (Some(input), Some(output)) => (input, output),
        _ => {
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match run_convert(&cli, input_path, output_path) {
        Ok(outcome) if outcome.is_success() => {
            println!("Conversion completed successfully!");
            ExitCode::SUCCESS
        }
        Ok(_) => {
            error!("Some transcripts could not be converted");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_convert(
    options: &CommandLineOptions,
    input_path: PathBuf,
    output_path: PathBuf,
) -> Result<RunOutcome> {
    // If log level is set via command line, apply it before loading the config
    if let Some(cmd_log_level) = options.log_level {
        log::set_max_level(LogLevel::from(cmd_log_level).to_level_filter());
    }

    let mut config = match &options.config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // Override config with CLI options if provided
    if let Some(log_level) = options.log_level {
        config.log_level = log_level.into();
    }

    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    info!("Converting {:?} -> {:?}", input_path, output_path);
    controller.run(input_path, output_path, options.force_overwrite)
}
