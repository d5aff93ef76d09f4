use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::transcript::{self, ConversionSummary};

// @module: Application controller for transcript conversion

/// Outcome of converting a directory of transcripts
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FolderSummary {
    /// Files converted successfully
    pub converted: usize,
    /// Files left alone because their output already existed
    pub skipped: usize,
    /// Files that failed to convert
    pub failed: usize,
    /// Cues written across all converted files
    pub cues_written: usize,
}

/// What a single [`Controller::run`] call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    File(ConversionSummary),
    Folder(FolderSummary),
}

impl RunOutcome {
    /// Whether every requested conversion succeeded
    pub fn is_success(&self) -> bool {
        match self {
            Self::File(_) => true,
            Self::Folder(summary) => summary.failed == 0,
        }
    }
}

/// Main application controller for transcript conversion
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Convert a single transcript, or every transcript below a directory
    pub fn run(
        &self,
        input_path: PathBuf,
        output_path: PathBuf,
        force_overwrite: bool,
    ) -> Result<RunOutcome> {
        if input_path.is_dir() {
            return self
                .run_folder(&input_path, &output_path, force_overwrite)
                .map(RunOutcome::Folder);
        }

        self.convert_file(&input_path, &output_path).map(RunOutcome::File)
    }

    /// Convert one transcript file into one subtitle file, replacing any existing output
    pub fn convert_file(&self, input_file: &Path, output_file: &Path) -> Result<ConversionSummary> {
        if Self::same_file(input_file, output_file) {
            return Err(anyhow!(
                "Output file would overwrite the input transcript: {:?}", output_file
            ));
        }

        debug!("Converting {:?} -> {:?}", input_file, output_file);
        // Malformed timestamp components read as zero
        let summary = transcript::convert_file(input_file, output_file, false)?;

        debug!(
            "{:?}: {} lines, {} cues, {} discarded before first timestamp, \
             {} empty timestamps dropped",
            input_file,
            summary.lines_seen,
            summary.cues_emitted,
            summary.lines_discarded,
            summary.empty_cues_dropped
        );
        if summary.cues_emitted == 0 {
            warn!("No subtitle cues found in {:?}", input_file);
        }

        Ok(summary)
    }

    /// Convert every transcript below input_dir into output_dir
    pub fn run_folder(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<FolderSummary> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let transcripts = FileManager::find_files(input_dir, &self.config.transcript_extension)?;
        if transcripts.is_empty() {
            return Err(anyhow!(
                "No .{} files found in directory: {:?}",
                self.config.transcript_extension,
                input_dir
            ));
        }

        FileManager::ensure_dir(output_dir)?;

        let folder_pb = ProgressBar::new(transcripts.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] \
                 {pos}/{len} files ({percent}%) {msg}",
            )
            .or_else(|_| {
                ProgressStyle::default_bar().template(
                    "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}",
                )
            })
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Converting transcripts");

        let mut summary = FolderSummary::default();

        for transcript_file in &transcripts {
            let file_name = transcript_file.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Converting: {}", file_name));

            let output_path = FileManager::generate_output_path(
                transcript_file,
                input_dir,
                output_dir,
                &self.config.output_extension,
            );

            if output_path.exists() && !force_overwrite {
                warn!(
                    "Skipping {}, {:?} already exists (use -f to force overwrite)",
                    file_name, output_path
                );
                summary.skipped += 1;
                folder_pb.inc(1);
                continue;
            }

            let result = output_path
                .parent()
                .map_or(Ok(()), |parent| FileManager::ensure_dir(parent))
                .and_then(|_| self.convert_file(transcript_file, &output_path));

            match result {
                Ok(file_summary) => {
                    summary.converted += 1;
                    summary.cues_written += file_summary.cues_emitted;
                }
                Err(e) => {
                    error!("Error converting file {}: {:#}", file_name, e);
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder conversion complete");

        info!(
            "Folder conversion completed in {:.1?}: {} converted, {} skipped, {} errors ({} cues)",
            start_time.elapsed(),
            summary.converted,
            summary.skipped,
            summary.failed,
            summary.cues_written
        );

        Ok(summary)
    }

    fn same_file(a: &Path, b: &Path) -> bool {
        match (a.canonicalize(), b.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}
