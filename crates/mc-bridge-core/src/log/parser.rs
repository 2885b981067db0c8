//! Parser for Minecraft server log lines.
//!
//! Recognized shape:
//! ```text
//! [HH:MM:SS] [source/level]: message
//! ```
//!
//! The log only records a time of day.  The parser combines it with the
//! current local calendar date, so a line written before midnight and read
//! after it gets a timestamp one day in the future.  Callers that apply a
//! freshness window discard such lines anyway.

use std::sync::OnceLock;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;
use thiserror::Error;

/// The level is the part after the last `/` inside the second bracket, so
/// sources that themselves contain a `/` still parse.
const LOG_LINE_PATTERN: &str = r"^\[(\d{2}:\d{2}:\d{2})\] \[([^\]]*)/([^\]/]*)\]: (.*)$";

/// Errors returned for lines that are not structured log messages.
#[derive(Debug, Error, PartialEq)]
pub enum UnparsableError {
    /// The line does not have the `[time] [source/level]: message` shape.
    #[error("line does not match the log message shape: {line:?}")]
    Shape { line: String },

    /// The bracketed time is not a valid `HH:MM:SS` time of day.  Leap
    /// seconds (`:60`) are rejected and carry no `source`.
    #[error("invalid time of day {value:?}")]
    TimeOfDay {
        value: String,
        #[source]
        source: Option<chrono::ParseError>,
    },
}

/// One parsed log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    /// Local date-time: the parsed time of day on the assumed calendar date.
    pub timestamp: NaiveDateTime,
    /// Emitting thread or component, e.g. `Server thread`.
    pub source: String,
    /// Log level, e.g. `INFO`.
    pub level: String,
    /// Everything after `]: `.
    pub message: String,
}

fn log_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(LOG_LINE_PATTERN).expect("log line pattern is a valid regex"))
}

/// Parses `line`, assuming its timestamp belongs to today's local date.
///
/// # Errors
///
/// Returns [`UnparsableError`] when the line is not a structured log message.
///
/// # Examples
///
/// ```rust
/// use mc_bridge_core::parse_log_line;
///
/// let msg = parse_log_line("[14:05:22] [Server thread/INFO]: <Alice> hello").unwrap();
/// assert_eq!(msg.source, "Server thread");
/// assert_eq!(msg.level, "INFO");
/// assert_eq!(msg.message, "<Alice> hello");
/// ```
pub fn parse_log_line(line: &str) -> Result<LogMessage, UnparsableError> {
    parse_log_line_on(line, Local::now().date_naive())
}

/// Parses `line`, attaching its time of day to `date`.
///
/// # Errors
///
/// Returns [`UnparsableError`] when the line is not a structured log message.
pub fn parse_log_line_on(line: &str, date: NaiveDate) -> Result<LogMessage, UnparsableError> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    let caps = log_line_regex()
        .captures(line)
        .ok_or_else(|| UnparsableError::Shape {
            line: line.to_string(),
        })?;

    let time_str = &caps[1];
    let time = NaiveTime::parse_from_str(time_str, "%H:%M:%S").map_err(|source| {
        UnparsableError::TimeOfDay {
            value: time_str.to_string(),
            source: Some(source),
        }
    })?;
    // chrono folds a `:60` second into the nanosecond field.
    if time.second() > 59 || time.nanosecond() >= 1_000_000_000 {
        return Err(UnparsableError::TimeOfDay {
            value: time_str.to_string(),
            source: None,
        });
    }

    Ok(LogMessage {
        timestamp: date.and_time(time),
        source: caps[2].to_string(),
        level: caps[3].to_string(),
        message: caps[4].to_string(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_parse_chat_line_extracts_all_fields() {
        // Arrange
        let line = "[14:05:22] [Server thread/INFO]: <Alice> hello";

        // Act
        let msg = parse_log_line_on(line, day()).unwrap();

        // Assert
        assert_eq!(msg.source, "Server thread");
        assert_eq!(msg.level, "INFO");
        assert_eq!(msg.message, "<Alice> hello");
        assert_eq!(
            msg.timestamp,
            day().and_hms_opt(14, 5, 22).unwrap()
        );
    }

    #[test]
    fn test_parse_uses_todays_date_by_default() {
        let msg = parse_log_line("[00:00:01] [main/INFO]: Starting").unwrap();
        assert_eq!(msg.timestamp.date(), Local::now().date_naive());
        assert_eq!(msg.timestamp.second(), 1);
    }

    #[test]
    fn test_parse_source_containing_slash_takes_last_segment_as_level() {
        let msg = parse_log_line_on("[08:00:00] [Worker/Main-1/WARN]: slow tick", day()).unwrap();
        assert_eq!(msg.source, "Worker/Main-1");
        assert_eq!(msg.level, "WARN");
    }

    #[test]
    fn test_parse_empty_message_body() {
        let msg = parse_log_line_on("[08:00:00] [Server thread/INFO]: ", day()).unwrap();
        assert_eq!(msg.message, "");
    }

    #[test]
    fn test_parse_strips_trailing_carriage_return() {
        let msg = parse_log_line_on("[08:00:00] [Server thread/INFO]: hi\r", day()).unwrap();
        assert_eq!(msg.message, "hi");
    }

    #[test]
    fn test_parse_plain_text_is_shape_error() {
        let err = parse_log_line_on("hello world", day()).unwrap_err();
        assert_eq!(
            err,
            UnparsableError::Shape {
                line: "hello world".to_string()
            }
        );
    }

    #[test]
    fn test_parse_missing_level_is_shape_error() {
        let err = parse_log_line_on("[08:00:00] [Server thread]: hi", day()).unwrap_err();
        assert!(matches!(err, UnparsableError::Shape { .. }));
    }

    #[test]
    fn test_parse_leading_text_is_shape_error() {
        let line = "junk [08:00:00] [Server thread/INFO]: hi";
        assert!(matches!(
            parse_log_line_on(line, day()),
            Err(UnparsableError::Shape { .. })
        ));
    }

    #[test]
    fn test_parse_out_of_range_time_is_time_error() {
        let err = parse_log_line_on("[25:61:00] [Server thread/INFO]: hi", day()).unwrap_err();
        assert!(matches!(err, UnparsableError::TimeOfDay { ref value, .. } if value == "25:61:00"));
    }

    #[test]
    fn test_parse_leap_second_is_time_error() {
        // Arrange
        let line = "[23:59:60] [Server thread/INFO]: hi";

        // Act
        let err = parse_log_line_on(line, day()).unwrap_err();

        // Assert
        assert_eq!(
            err,
            UnparsableError::TimeOfDay {
                value: "23:59:60".to_string(),
                source: None,
            }
        );
    }

    #[test]
    fn test_parse_last_second_of_day_is_accepted() {
        let msg = parse_log_line_on("[23:59:59] [Server thread/INFO]: hi", day()).unwrap();
        assert_eq!(msg.timestamp.second(), 59);
    }
}
