/*!
 * # txt2srt - plain-text transcripts to SubRip subtitles
 *
 * Converts a transcript annotated with loose timestamps (`MM:SS`, `H:MM:SS`
 * or `HH:MM:SS` on their own line) into an SRT file. Text lines after a
 * timestamp are joined into one cue shown for two seconds.
 *
 * ## Features
 *
 * - Streaming, single-pass conversion with no global state
 * - Lenient timestamp parsing by default, strict parsing on request
 * - Batch conversion of whole directory trees
 *
 * ## Architecture
 *
 * - `transcript`: Timestamp classification/parsing and the cue state machine
 * - `subtitle_processor`: Subtitle entries, time formatting and SRT output
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `app_controller`: Single-file and folder conversion workflows
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod transcript;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, FolderSummary, RunOutcome};
pub use subtitle_processor::{format_time, SubtitleCollection, SubtitleEntry};
pub use transcript::{
    convert_file, convert_lines, convert_reader, convert_str, is_timestamp_marker,
    parse_timestamp, try_parse_timestamp, ConversionSummary, CueTransducer,
};
pub use errors::{AppError, SubtitleError};
