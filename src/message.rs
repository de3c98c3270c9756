//! The typed chat message record.
//!
//! A [`Message`] is what the [`parser`](crate::parser) reconstructs from an
//! export: the raw timestamp text, the sender and the (possibly multi-line)
//! body. The timestamp is kept exactly as it appeared in the file because
//! normalization is best-effort; use [`Message::instant`] to get the parsed
//! value when one exists.
//!
//! # Examples
//!
//! ```
//! use chatpulse::Message;
//! use chrono::Timelike;
//!
//! let msg = Message::new("1/15/24, 10:30 PM", "Alice", "Hello!");
//! assert_eq!(msg.sender(), "Alice");
//! assert_eq!(msg.instant().map(|t| t.hour()), Some(22));
//! ```
//!
//! ## Serialization
//!
//! The body is serialized under the `message` key, which is what downstream
//! consumers of the analytics output expect.
//!
//! ```
//! use chatpulse::Message;
//!
//! let msg = Message::new("1/15/24, 10:30 PM", "Alice", "Hello!");
//! let json = serde_json::to_string(&msg)?;
//! assert!(json.contains(r#""message":"Hello!""#));
//! # Ok::<(), serde_json::Error>(())
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::timestamp::normalize_timestamp;

/// A single chat message.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `timestamp` | `String` | Timestamp text as it appeared in the export |
/// | `sender` | `String` | Display name or phone number of the author |
/// | `body` | `String` | Message text, continuation lines joined with `\n` |
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    /// Raw timestamp text from the header line.
    pub timestamp: String,

    /// Display name or phone identifier of the author.
    ///
    /// Not unique across groups.
    pub sender: String,

    /// Message text.
    ///
    /// May contain newlines for multi-line messages.
    #[serde(rename = "message")]
    pub body: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(
        timestamp: impl Into<String>,
        sender: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            sender: sender.into(),
            body: body.into(),
        }
    }

    /// Returns the raw timestamp text.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Returns the sender name.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the message body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the normalized timestamp, or `None` if it cannot be parsed.
    pub fn instant(&self) -> Option<NaiveDateTime> {
        normalize_timestamp(&self.timestamp)
    }

    /// Returns the calendar date of the message, if the timestamp parses.
    pub fn date(&self) -> Option<NaiveDate> {
        self.instant().map(|ts| ts.date())
    }

    /// Appends a continuation line to the body.
    ///
    /// An empty body is replaced rather than prefixed with a blank line.
    pub fn append_line(&mut self, line: &str) {
        if self.body.is_empty() {
            self.body.push_str(line);
        } else {
            self.body.push('\n');
            self.body.push_str(line);
        }
    }

    /// Formats the message as a `sender: body` transcript line.
    pub fn transcript_line(&self) -> String {
        format!("{}: {}", self.sender, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_message_new() {
        let msg = Message::new("1/15/24, 10:30 AM", "Alice", "Hello");
        assert_eq!(msg.timestamp(), "1/15/24, 10:30 AM");
        assert_eq!(msg.sender(), "Alice");
        assert_eq!(msg.body(), "Hello");
    }

    #[test]
    fn test_instant_and_date() {
        let msg = Message::new("15/01/2024, 10:30", "Alice", "Hello");
        let date = msg.date().unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 1, 15));

        let broken = Message::new("sometime", "Alice", "Hello");
        assert!(broken.instant().is_none());
        assert!(broken.date().is_none());
    }

    #[test]
    fn test_append_line() {
        let mut msg = Message::new("t", "Alice", "Hello");
        msg.append_line("world");
        assert_eq!(msg.body, "Hello\nworld");

        let mut empty = Message::new("t", "Alice", "");
        empty.append_line("first");
        assert_eq!(empty.body, "first");
    }

    #[test]
    fn test_transcript_line() {
        let msg = Message::new("t", "Bob", "Hi there");
        assert_eq!(msg.transcript_line(), "Bob: Hi there");
    }

    #[test]
    fn test_message_deserialization() {
        let json = r#"{"timestamp":"1/15/24, 10:30 AM","sender":"Bob","message":"Hi"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.sender(), "Bob");
        assert_eq!(msg.body(), "Hi");
    }
}
