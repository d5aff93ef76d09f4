/*!
 * Tests for timestamp handling and the line-to-cue transducer
 */

use anyhow::Result;
use txt2srt::errors::SubtitleError;
use txt2srt::subtitle_processor::format_time;
use txt2srt::transcript::{
    convert_lines, convert_str, is_timestamp_marker, parse_timestamp, try_parse_timestamp,
    CueTransducer,
};

/// Test the accepted timestamp shapes
#[test]
fn test_is_timestamp_marker_withValidShapes_shouldMatch() {
    for line in ["0:00", "00:00", "9:59", "12:34", "1:02:03", "01:02:03", "99:59:59"] {
        assert!(is_timestamp_marker(line), "{} should be a timestamp", line);
    }
}

/// Test lines that look close to timestamps but are not
#[test]
fn test_is_timestamp_marker_withNearMisses_shouldNotMatch() {
    for line in [
        "", "0", "0:0", "123:00", "1:2:03", "1:02:3", "1:02:03:04", "a0:00", "0:00 intro",
        "[0:00]", "0:00,000", "1:02:03.5", " 0:00", "٠:٠٠",
    ] {
        assert!(!is_timestamp_marker(line), "{:?} should not be a timestamp", line);
    }
}

/// Test MM:SS parsing
#[test]
fn test_parse_timestamp_withMinutesSeconds_shouldComputeSeconds() {
    assert_eq!(parse_timestamp("0:00"), 0);
    assert_eq!(parse_timestamp("0:05"), 5);
    assert_eq!(parse_timestamp("12:34"), 12 * 60 + 34);
    assert_eq!(parse_timestamp("99:59"), 99 * 60 + 59);
}

/// Test HH:MM:SS parsing
#[test]
fn test_parse_timestamp_withHoursMinutesSeconds_shouldComputeSeconds() {
    assert_eq!(parse_timestamp("1:02:03"), 3723);
    assert_eq!(parse_timestamp("01:00:05"), 3605);
    assert_eq!(parse_timestamp("10:00:00"), 36000);
}

/// Test the lenient parser on inputs the classifier would never pass through
#[test]
fn test_parse_timestamp_withMalformedInput_shouldTreatAsZero() {
    assert_eq!(parse_timestamp("xx:05"), 5);
    assert_eq!(parse_timestamp("1:yy:10"), 3610);
    assert_eq!(parse_timestamp("::"), 0);
    assert_eq!(parse_timestamp("42"), 0);
    assert_eq!(parse_timestamp("1:02:03:04"), 0);
}

/// Test the strict parser against the lenient one
#[test]
fn test_try_parse_timestamp_withMalformedInput_shouldReportError() {
    assert_eq!(try_parse_timestamp("1:02:03").unwrap(), 3723);

    match try_parse_timestamp("1:yy:10") {
        Err(SubtitleError::MalformedTimestamp { token, component }) => {
            assert_eq!(token, "1:yy:10");
            assert_eq!(component, "yy");
        }
        other => panic!("expected malformed component, got {:?}", other),
    }

    assert!(matches!(try_parse_timestamp("+1:00"), Err(SubtitleError::MalformedTimestamp { .. })));
    assert!(matches!(try_parse_timestamp("42"), Err(SubtitleError::InvalidTimestampShape(_))));
}

/// Test that parsing and formatting canonicalize padding
#[test]
fn test_format_time_withParsedTimestamp_shouldCanonicalizePadding() {
    assert_eq!(format_time(parse_timestamp("1:00:05")), "01:00:05,000");
    assert_eq!(format_time(parse_timestamp("01:00:05")), "01:00:05,000");
    assert_eq!(format_time(parse_timestamp("1:02:03")), "01:02:03,000");
    assert_eq!(format_time(parse_timestamp("5:07")), "00:05:07,000");
}

/// Scenario: two timestamps each with one body line
#[test]
fn test_convert_str_withTwoCues_shouldEmitBoth() -> Result<()> {
    let entries = convert_str("0:00\nHello world\n0:05\nSecond line\n")?;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].seq_num, 1);
    assert_eq!(entries[0].format_start_time(), "00:00:00,000");
    assert_eq!(entries[0].format_end_time(), "00:00:02,000");
    assert_eq!(entries[0].text, "Hello world");
    assert_eq!(entries[1].seq_num, 2);
    assert_eq!(entries[1].format_start_time(), "00:00:05,000");
    assert_eq!(entries[1].format_end_time(), "00:00:07,000");
    assert_eq!(entries[1].text, "Second line");

    Ok(())
}

/// Scenario: a timestamp directly followed by another timestamp
#[test]
fn test_convert_str_withBackToBackTimestamps_shouldDropEmptyCue() -> Result<()> {
    let entries = convert_str("0:01\n0:03\nonly text\n0:07\n")?;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].seq_num, 1);
    assert_eq!(entries[0].start_time_ms, 3_000);
    assert_eq!(entries[0].text, "only text");

    Ok(())
}

/// Scenario: text before the first timestamp
#[test]
fn test_convert_str_withPreamble_shouldDiscardIt() -> Result<()> {
    let entries = convert_str("Title\nby someone\n\n0:10\nfirst\n")?;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "first");
    assert!(entries.iter().all(|e| !e.text.contains("Title")));

    Ok(())
}

/// Test that multiple body lines are joined with single spaces and trimmed first
#[test]
fn test_convert_lines_withMultipleBodyLines_shouldJoinWithSpaces() -> Result<()> {
    let entries = convert_lines(["  0:05  ", "  first part ", "\tsecond part"])?;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].start_time_ms, 5_000);
    assert_eq!(entries[0].text, "first part second part");

    Ok(())
}

/// Test that blank body lines are kept literally
#[test]
fn test_convert_lines_withBlankBodyLines_shouldKeepEmptyElements() -> Result<()> {
    let entries = convert_lines(["0:01", "a", "", "b", "0:02", "", "0:03", "c", ""])?;

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].text, "a  b");
    assert_eq!(entries[1].text, "");
    assert_eq!(entries[2].text, "c ");

    Ok(())
}

/// Test that lines that are not exact timestamps become body text
#[test]
fn test_convert_lines_withNearMissTimestamps_shouldTreatAsText() -> Result<()> {
    let entries = convert_lines(["0:00", "1:2:03", "123:00", "at 0:30 we start"])?;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "1:2:03 123:00 at 0:30 we start");

    Ok(())
}

/// Test that every cue ends two seconds after it starts, whatever the gap
#[test]
fn test_convert_str_withVariousGaps_shouldUseFixedDuration() -> Result<()> {
    let entries = convert_str("0:00\na\n0:01\nb\n10:00\nc\n1:00:00\nd\n")?;

    for entry in &entries {
        assert_eq!(entry.end_time_ms, entry.start_time_ms + 2_000);
    }
    // Overlap with the next cue is left alone
    assert!(entries[0].end_time_ms > entries[1].start_time_ms);

    Ok(())
}

/// Test that sequence numbers are contiguous across dropped cues
#[test]
fn test_convert_str_withDroppedCues_shouldNumberContiguously() -> Result<()> {
    let entries = convert_str("0:00\n0:01\na\n0:02\n0:03\n0:04\nb\n0:05\nc\n0:06\n")?;

    let seq_nums: Vec<usize> = entries.iter().map(|e| e.seq_num).collect();
    assert_eq!(seq_nums, vec![1, 2, 3]);

    Ok(())
}

/// Test inputs that produce nothing
#[test]
fn test_convert_str_withNoCues_shouldReturnEmpty() -> Result<()> {
    assert!(convert_str("")?.is_empty());
    assert!(convert_str("no timestamps here\nat all")?.is_empty());
    assert!(convert_str("0:00")?.is_empty());
    assert!(convert_str("0:00\n0:05\n")?.is_empty());

    Ok(())
}

/// Test that Windows line endings are handled
#[test]
fn test_convert_str_withCrlfLineEndings_shouldParse() -> Result<()> {
    let entries = convert_str("0:00\r\nHello\r\n0:05\r\nWorld\r\n")?;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].text, "Hello");
    assert_eq!(entries[1].text, "World");

    Ok(())
}

/// Test the transducer's step-by-step outputs and counters
#[test]
fn test_cue_transducer_withLineByLineInput_shouldFlushOnNextTimestamp() -> Result<()> {
    let mut transducer = CueTransducer::new();

    assert!(transducer.push_line("intro")?.is_none());
    assert!(transducer.push_line("0:00")?.is_none());
    assert!(transducer.push_line("Hello")?.is_none());

    let first = transducer.push_line("0:05")?.expect("first cue should flush");
    assert_eq!(first.seq_num, 1);
    assert_eq!(first.text, "Hello");

    assert!(transducer.push_line("0:09")?.is_none());
    assert!(transducer.push_line("Bye")?.is_none());

    let last = transducer.finish().expect("last cue should flush");
    assert_eq!(last.seq_num, 2);
    assert_eq!(last.start_time_ms, 9_000);

    let summary = transducer.summary();
    assert_eq!(summary.lines_seen, 6);
    assert_eq!(summary.lines_discarded, 1);
    assert_eq!(summary.cues_emitted, 2);
    assert_eq!(summary.empty_cues_dropped, 1);

    Ok(())
}

/// Test that independent transducers do not share state
#[test]
fn test_cue_transducer_withTwoInstances_shouldNumberIndependently() -> Result<()> {
    let mut a = CueTransducer::new();
    let mut b = CueTransducer::new();

    a.push_line("0:00")?;
    a.push_line("from a")?;
    b.push_line("0:00")?;
    b.push_line("from b")?;

    assert_eq!(a.finish().map(|e| e.seq_num), Some(1));
    assert_eq!(b.finish().map(|e| e.seq_num), Some(1));

    Ok(())
}

/// Test that strict mode accepts every timestamp the classifier lets through
#[test]
fn test_cue_transducer_withStrictMode_shouldAcceptValidTimestamps() -> Result<()> {
    let mut transducer = CueTransducer::with_strict_timestamps(true);

    transducer.push_line("1:02:03")?;
    transducer.push_line("text")?;
    let entry = transducer.finish().expect("cue should flush");

    assert_eq!(entry.start_time_ms, 3_723_000);
    Ok(())
}
