//! WhatsApp TXT export parser.
//!
//! Exports are line oriented. A message starts on a *header line* carrying a
//! timestamp, a sender and the first line of text; any following line that is
//! not a header belongs to the same message.
//!
//! Supported header shapes, tried in this order:
//!
//! | Pattern | Example |
//! |---------|---------|
//! | [`HeaderPattern::NarrowSpaceMeridiem`] | `1/15/24, 10:30\u{202F}PM - Alice: Hi` |
//! | [`HeaderPattern::ShortYearMeridiem`] | `1/15/24, 10:30 PM - Alice: Hi` |
//! | [`HeaderPattern::Bracketed`] | `[15/01/2024, 22:30:05] Alice: Hi` |
//! | [`HeaderPattern::IsoDate`] | `2024-01-15, 22:30 - Alice: Hi` |
//! | [`HeaderPattern::LongYear24h`] | `15/01/2024, 22:30 - Alice: Hi` |
//! | [`HeaderPattern::AnyYearMeridiem`] | `1/15/2024, 10:30:05 PM - Alice: Hi` |
//! | [`HeaderPattern::ShortYear24h`] | `15/01/24, 22:30 - Alice: Hi` |
//!
//! The first pattern that matches wins, so the order is part of the contract.
//!
//! # Example
//!
//! ```rust
//! use chatpulse::parser::LogParser;
//!
//! let parser = LogParser::new();
//! let messages = parser.parse_lines(["01/01/24, 10:00 AM - Alice: Hello", "world"]);
//!
//! assert_eq!(messages.len(), 1);
//! assert_eq!(messages[0].body, "Hello\nworld");
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::Message;
use crate::error::Result;

/// Header line shapes found in WhatsApp exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPattern {
    /// Two-digit year, 12-hour clock with a narrow or no-break space before AM/PM
    NarrowSpaceMeridiem,
    /// Two-digit year, 12-hour clock with a regular space before AM/PM
    ShortYearMeridiem,
    /// Timestamp in square brackets, no dash before the sender
    Bracketed,
    /// `YYYY-MM-DD` date, 24-hour clock
    IsoDate,
    /// Four-digit year, 24-hour clock
    LongYear24h,
    /// Two- or four-digit year, 12-hour clock, optional seconds
    AnyYearMeridiem,
    /// Two-digit year, 24-hour clock
    ShortYear24h,
}

impl HeaderPattern {
    /// Returns the regex for this header shape.
    ///
    /// Capture groups: 1 = timestamp, 2 = sender, 3 = first line of the body.
    pub fn pattern(self) -> &'static str {
        match self {
            HeaderPattern::NarrowSpaceMeridiem => {
                r"(?i)^(\d{1,2}/\d{1,2}/\d{2}, \d{1,2}:\d{2}[\x{202F}\x{00A0}][AP]M) - (.*?): (.*)"
            }
            HeaderPattern::ShortYearMeridiem => {
                r"(?i)^(\d{1,2}/\d{1,2}/\d{2}, \d{1,2}:\d{2} [AP]M) - (.*?): (.*)"
            }
            HeaderPattern::Bracketed => {
                r"(?i)^\[(\d{1,2}/\d{1,2}/\d{2,4}, \d{1,2}:\d{2}(?::\d{2})?(?:[ \x{202F}\x{00A0}][AP]M)?)\] (.*?): (.*)"
            }
            HeaderPattern::IsoDate => {
                r"(?i)^(\d{4}-\d{1,2}-\d{1,2}, \d{1,2}:\d{2}(?::\d{2})?) - (.*?): (.*)"
            }
            HeaderPattern::LongYear24h => {
                r"(?i)^(\d{1,2}/\d{1,2}/\d{4}, \d{1,2}:\d{2}(?::\d{2})?) - (.*?): (.*)"
            }
            HeaderPattern::AnyYearMeridiem => {
                r"(?i)^(\d{1,2}/\d{1,2}/\d{2,4}, \d{1,2}:\d{2}(?::\d{2})? [AP]M) - (.*?): (.*)"
            }
            HeaderPattern::ShortYear24h => {
                r"(?i)^(\d{1,2}/\d{1,2}/\d{2}, \d{1,2}:\d{2}(?::\d{2})?) - (.*?): (.*)"
            }
        }
    }

    /// Returns all header shapes in matching priority order.
    pub fn all() -> &'static [HeaderPattern] {
        &[
            HeaderPattern::NarrowSpaceMeridiem,
            HeaderPattern::ShortYearMeridiem,
            HeaderPattern::Bracketed,
            HeaderPattern::IsoDate,
            HeaderPattern::LongYear24h,
            HeaderPattern::AnyYearMeridiem,
            HeaderPattern::ShortYear24h,
        ]
    }
}

/// Compiled header patterns, shared by every parser instance.
static HEADER_REGEXES: LazyLock<Vec<(HeaderPattern, Regex)>> = LazyLock::new(|| {
    HeaderPattern::all()
        .iter()
        .map(|&p| {
            let regex = Regex::new(p.pattern()).expect("header patterns are valid regexes");
            (p, regex)
        })
        .collect()
});

/// The pieces of a recognized header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch<'a> {
    /// Which header shape matched
    pub pattern: HeaderPattern,
    /// Raw timestamp text
    pub timestamp: &'a str,
    /// Sender name
    pub sender: &'a str,
    /// First line of the body
    pub body: &'a str,
}

/// Tries every header pattern in priority order.
pub fn match_header(line: &str) -> Option<HeaderMatch<'_>> {
    HEADER_REGEXES.iter().find_map(|(pattern, regex)| {
        let caps = regex.captures(line)?;
        Some(HeaderMatch {
            pattern: *pattern,
            timestamp: caps.get(1).map_or("", |m| m.as_str()),
            sender: caps.get(2).map_or("", |m| m.as_str()),
            body: caps.get(3).map_or("", |m| m.as_str()),
        })
    })
}

/// Parser state between lines.
enum ParseState {
    NoCurrentMessage,
    Accumulating(Message),
}

/// Parser for WhatsApp TXT exports.
///
/// Parsing never fails on malformed content: lines that are not headers are
/// continuations, and continuations before the first header are dropped.
/// Only I/O can fail, in [`parse_file`](Self::parse_file) and
/// [`parse_reader`](Self::parse_reader).
#[derive(Debug, Clone, Copy, Default)]
pub struct LogParser;

impl LogParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses an ordered sequence of raw lines.
    ///
    /// Messages come out in file order; no sorting happens here.
    pub fn parse_lines<I, S>(&self, lines: I) -> Vec<Message>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut messages = Vec::new();
        let mut state = ParseState::NoCurrentMessage;
        let mut orphans = 0usize;

        for raw in lines {
            let line = raw.as_ref().trim();
            if line.is_empty() {
                continue;
            }

            if let Some(header) = match_header(line) {
                if let ParseState::Accumulating(done) = state {
                    messages.push(done);
                }
                state = ParseState::Accumulating(Message::new(
                    header.timestamp,
                    header.sender,
                    header.body,
                ));
                continue;
            }

            match &mut state {
                ParseState::Accumulating(current) => current.append_line(line),
                ParseState::NoCurrentMessage => orphans += 1,
            }
        }

        if let ParseState::Accumulating(done) = state {
            messages.push(done);
        }

        if orphans > 0 {
            debug!(orphans, "dropped lines before the first header");
        }
        debug!(count = messages.len(), "parsed messages");

        messages
    }

    /// Parses export content held in memory.
    pub fn parse_str(&self, content: &str) -> Vec<Message> {
        self.parse_lines(content.lines())
    }

    /// Parses export content from a buffered reader.
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<Vec<Message>> {
        let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
        Ok(self.parse_lines(lines))
    }

    /// Parses an export file.
    pub fn parse_file(&self, path: &Path) -> Result<Vec<Message>> {
        let file = File::open(path)?;
        self.parse_reader(BufReader::new(file))
    }
}
