use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::AppError;

/// Application configuration module
/// This module handles loading and validating the optional JSON
/// configuration. Every field has a default, so a partial file is fine.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Extension of transcript files picked up in folder mode
    #[serde(default = "default_transcript_extension")]
    pub transcript_extension: String,

    /// Extension given to generated subtitle files in folder mode
    #[serde(default = "default_output_extension")]
    pub output_extension: String,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_transcript_extension() -> String {
    "txt".to_string()
}

fn default_output_extension() -> String {
    "srt".to_string()
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            AppError::Config(format!("Failed to open config file: {}: {}", path.display(), e))
        })?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader).map_err(|e| {
            AppError::Config(format!("Failed to parse config file: {}: {}", path.display(), e))
        })?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, ext) in [
            ("transcript_extension", &self.transcript_extension),
            ("output_extension", &self.output_extension),
        ] {
            if ext.trim().is_empty() {
                return Err(AppError::Config(format!("{} must not be empty", name)));
            }
            if ext.contains('.') || ext.contains('/') || ext.contains('\\') {
                return Err(AppError::Config(format!(
                    "{} must be a bare extension without dots or separators: {}",
                    name, ext
                )));
            }
        }

        if self.transcript_extension.eq_ignore_ascii_case(&self.output_extension) {
            return Err(AppError::Config(format!(
                "transcript_extension and output_extension must differ (both are '{}')",
                self.output_extension
            )));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: LogLevel::default(),
            transcript_extension: default_transcript_extension(),
            output_extension: default_output_extension(),
        }
    }
}
