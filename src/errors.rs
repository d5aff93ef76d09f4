/*!
 * Error types for the txt2srt application.
 *
 * This module contains custom error types for the different stages of a
 * conversion, using the thiserror crate for ergonomic error definitions.
 */

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while turning transcript lines into subtitle cues
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A timestamp component that is not a non-negative integer
    #[error("Malformed timestamp component '{component}' in '{token}'")]
    MalformedTimestamp {
        /// The whole timestamp token
        token: String,
        /// The offending fragment
        component: String,
    },

    /// A timestamp with neither two nor three colon-separated parts
    #[error("Timestamp '{0}' must have the form MM:SS or HH:MM:SS")]
    InvalidTimestampShape(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// The transcript could not be opened
    #[error("Error opening input file {path:?}: {source}")]
    InputOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The subtitle file could not be created
    #[error("Error creating output file {path:?}: {source}")]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading a line from the transcript failed mid-stream
    #[error("Error reading input: {0}")]
    Read(#[source] io::Error),

    /// Writing a cue to the output failed
    #[error("Error writing output: {0}")]
    Write(#[source] io::Error),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),
}

impl AppError {
    /// Whether the failure happened before any cue could be written
    pub fn is_setup_failure(&self) -> bool {
        matches!(
            self,
            Self::InputOpen { .. } | Self::OutputCreate { .. } | Self::Config(_)
        )
    }
}
