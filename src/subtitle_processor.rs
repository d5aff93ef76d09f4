use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use log::debug;

// @module: Subtitle entries and SRT serialization

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    // @creates: Entry spanning whole seconds
    pub fn from_seconds(seq_num: usize, start_secs: u64, end_secs: u64, text: String) -> Self {
        Self::new(seq_num, start_secs.saturating_mul(1_000), end_secs.saturating_mul(1_000), text)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm).
    /// Hours are not wrapped at 24 and widen past two digits.
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

/// Format whole seconds as an SRT timestamp, always with `,000` milliseconds
pub fn format_time(total_secs: u64) -> String {
    SubtitleEntry::format_timestamp(total_secs.saturating_mul(1_000))
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Render entries in order, four lines per entry
pub fn write_srt<W: Write>(entries: &[SubtitleEntry], writer: &mut W) -> std::io::Result<()> {
    for entry in entries {
        write!(writer, "{}", entry)?;
    }
    Ok(())
}

/// Collection of subtitle entries with metadata
#[derive(Debug)]
pub struct SubtitleCollection {
    /// Transcript the entries were built from
    pub source_file: PathBuf,

    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Create a new subtitle collection
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleCollection {
            source_file,
            entries: Vec::new(),
        }
    }

    /// Build a collection from an in-memory transcript
    pub fn from_transcript(source_file: PathBuf, content: &str) -> Result<Self> {
        let entries = crate::transcript::convert_str(content)
            .with_context(|| format!("Failed to convert transcript: {}", source_file.display()))?;

        Ok(SubtitleCollection {
            source_file,
            entries,
        })
    }

    /// Write subtitles to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);

        write_srt(&self.entries, &mut writer)
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;
        writer.flush()
            .with_context(|| format!("Failed to flush subtitle file: {}", path.display()))?;

        debug!("Wrote {} entries to {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Total span covered by the entries, in milliseconds
    pub fn duration_ms(&self) -> u64 {
        let start = self.entries.iter().map(|e| e.start_time_ms).min();
        let end = self.entries.iter().map(|e| e.end_time_ms).max();
        match (start, end) {
            (Some(start), Some(end)) => end.saturating_sub(start),
            _ => 0,
        }
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
