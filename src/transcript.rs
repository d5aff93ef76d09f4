use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, trace, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{AppError, SubtitleError};
use crate::subtitle_processor::{format_time, SubtitleEntry};

// @module: Transcript scanning and cue accumulation

// @const: Timestamp marker regex (MM:SS, H:MM:SS or HH:MM:SS, whole line)
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{1,2}:[0-9]{2}(?::[0-9]{2})?$").unwrap()
});

/// Every cue is shown for this long, whatever the gap to the next marker
pub const CUE_DURATION_SECS: u64 = 2;

/// Whether a (trimmed) line is a timestamp marker
pub fn is_timestamp_marker(line: &str) -> bool {
    TIMESTAMP_REGEX.is_match(line)
}

/// Convert a timestamp token to elapsed seconds.
///
/// Two parts are read as MM:SS and three as HH:MM:SS. A component that is not
/// a number counts as zero, and any other part count yields zero.
pub fn parse_timestamp(token: &str) -> u64 {
    let component = |part: &str| -> u64 {
        part.parse().unwrap_or_else(|_| {
            warn!("Treating malformed timestamp component '{}' in '{}' as zero", part, token);
            0
        })
    };

    let parts: Vec<&str> = token.split(':').collect();
    match parts.as_slice() {
        [minutes, seconds] => elapsed(0, component(minutes), component(seconds)),
        [hours, minutes, seconds] => {
            elapsed(component(hours), component(minutes), component(seconds))
        }
        _ => 0,
    }
}

/// Strict counterpart of [`parse_timestamp`] that reports malformed input
pub fn try_parse_timestamp(token: &str) -> Result<u64, SubtitleError> {
    let component = |part: &str| -> Result<u64, SubtitleError> {
        let malformed = || SubtitleError::MalformedTimestamp {
            token: token.to_string(),
            component: part.to_string(),
        };
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        part.parse().map_err(|_| malformed())
    };

    let parts: Vec<&str> = token.split(':').collect();
    match parts.as_slice() {
        [minutes, seconds] => Ok(elapsed(0, component(minutes)?, component(seconds)?)),
        [hours, minutes, seconds] => {
            Ok(elapsed(component(hours)?, component(minutes)?, component(seconds)?))
        }
        _ => Err(SubtitleError::InvalidTimestampShape(token.to_string())),
    }
}

fn elapsed(hours: u64, minutes: u64, seconds: u64) -> u64 {
    hours
        .saturating_mul(3600)
        .saturating_add(minutes.saturating_mul(60))
        .saturating_add(seconds)
}

/// Counters describing one pass over a transcript
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Lines fed to the transducer
    pub lines_seen: usize,
    /// Lines dropped because no timestamp had been seen yet
    pub lines_discarded: usize,
    /// Cues flushed with text
    pub cues_emitted: usize,
    /// Timestamps that never collected a body line
    pub empty_cues_dropped: usize,
}

#[derive(Debug)]
enum CueState {
    Idle,
    Open { start_secs: u64, body: Vec<String> },
}

/// Line-to-cue state machine for a single conversion.
///
/// Lines go in one at a time through [`CueTransducer::push_line`]; a finished
/// cue comes out whenever a new timestamp closes the previous one. Call
/// [`CueTransducer::finish`] at end of input to flush the last cue.
#[derive(Debug)]
pub struct CueTransducer {
    state: CueState,
    next_seq_num: usize,
    strict_timestamps: bool,
    summary: ConversionSummary,
}

impl Default for CueTransducer {
    fn default() -> Self {
        Self::new()
    }
}

impl CueTransducer {
    pub fn new() -> Self {
        Self::with_strict_timestamps(false)
    }

    /// In strict mode a malformed timestamp component is an error instead of zero
    pub fn with_strict_timestamps(strict_timestamps: bool) -> Self {
        CueTransducer {
            state: CueState::Idle,
            next_seq_num: 1,
            strict_timestamps,
            summary: ConversionSummary::default(),
        }
    }

    /// Feed one input line. Returns the previous cue when this line is a
    /// timestamp that closes it.
    pub fn push_line(&mut self, line: &str) -> Result<Option<SubtitleEntry>, SubtitleError> {
        self.summary.lines_seen += 1;
        let trimmed = line.trim();

        if is_timestamp_marker(trimmed) {
            let start_secs = if self.strict_timestamps {
                try_parse_timestamp(trimmed)?
            } else {
                parse_timestamp(trimmed)
            };
            let previous = std::mem::replace(
                &mut self.state,
                CueState::Open { start_secs, body: Vec::new() },
            );
            return Ok(self.flush(previous));
        }

        match &mut self.state {
            CueState::Idle => {
                self.summary.lines_discarded += 1;
                trace!("Discarding line {} before first timestamp", self.summary.lines_seen);
            }
            // Blank lines are kept too and show up as extra spaces once joined
            CueState::Open { body, .. } => body.push(trimmed.to_string()),
        }

        Ok(None)
    }

    /// Flush the cue still open at end of input, if it has any text.
    /// The transducer is idle afterwards.
    pub fn finish(&mut self) -> Option<SubtitleEntry> {
        let last = std::mem::replace(&mut self.state, CueState::Idle);
        self.flush(last)
    }

    pub fn summary(&self) -> &ConversionSummary {
        &self.summary
    }

    fn flush(&mut self, state: CueState) -> Option<SubtitleEntry> {
        match state {
            CueState::Idle => None,
            CueState::Open { start_secs, body } if body.is_empty() => {
                self.summary.empty_cues_dropped += 1;
                debug!("Dropping cue at {} with no text", format_time(start_secs));
                None
            }
            CueState::Open { start_secs, body } => {
                let entry = SubtitleEntry::from_seconds(
                    self.next_seq_num,
                    start_secs,
                    start_secs.saturating_add(CUE_DURATION_SECS),
                    body.join(" "),
                );
                self.next_seq_num += 1;
                self.summary.cues_emitted += 1;
                Some(entry)
            }
        }
    }
}

/// Convert transcript lines into subtitle entries, reading timestamps leniently
pub fn convert_lines<I, S>(lines: I) -> Result<Vec<SubtitleEntry>, SubtitleError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut transducer = CueTransducer::new();
    let mut entries = Vec::new();

    for line in lines {
        if let Some(entry) = transducer.push_line(line.as_ref())? {
            entries.push(entry);
        }
    }
    entries.extend(transducer.finish());

    Ok(entries)
}

/// Convert an in-memory transcript into subtitle entries
pub fn convert_str(content: &str) -> Result<Vec<SubtitleEntry>, SubtitleError> {
    convert_lines(content.lines())
}

/// Stream a transcript into SRT, writing each cue as soon as it is flushed.
/// Cues already written stay in the output if a later line fails.
pub fn convert_reader<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    strict_timestamps: bool,
) -> Result<ConversionSummary, AppError> {
    let mut transducer = CueTransducer::with_strict_timestamps(strict_timestamps);

    for line in reader.lines() {
        let line = line.map_err(AppError::Read)?;
        if let Some(entry) = transducer.push_line(&line)? {
            write!(writer, "{}", entry).map_err(AppError::Write)?;
        }
    }
    if let Some(entry) = transducer.finish() {
        write!(writer, "{}", entry).map_err(AppError::Write)?;
    }
    writer.flush().map_err(AppError::Write)?;

    Ok(*transducer.summary())
}

/// Convert a transcript file into an SRT file.
///
/// The input is opened before the output is created, so a missing input
/// never leaves an empty subtitle file behind.
pub fn convert_file<P1: AsRef<Path>, P2: AsRef<Path>>(
    input_path: P1,
    output_path: P2,
    strict_timestamps: bool,
) -> Result<ConversionSummary, AppError> {
    let input_path = input_path.as_ref();
    let output_path = output_path.as_ref();

    let input = File::open(input_path).map_err(|source| AppError::InputOpen {
        path: input_path.to_path_buf(),
        source,
    })?;
    let output = File::create(output_path).map_err(|source| AppError::OutputCreate {
        path: output_path.to_path_buf(),
        source,
    })?;

    convert_reader(BufReader::new(input), BufWriter::new(output), strict_timestamps)
}
