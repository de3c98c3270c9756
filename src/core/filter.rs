//! Filter messages by date range and sender.
//!
//! This module provides [`FilterConfig`] for defining filter criteria and
//! [`apply_filters`] for filtering message collections.
//!
//! # Filter Types
//!
//! | Filter | Method | Description |
//! |--------|--------|-------------|
//! | Date from | [`with_date_from`](FilterConfig::with_date_from) | Messages on or after the start of a day |
//! | Date to | [`with_date_to`](FilterConfig::with_date_to) | Messages on or before the end of a day |
//! | Sender | [`with_sender`](FilterConfig::with_sender) | Messages from a specific user |
//!
//! # Examples
//!
//! ```
//! use chatpulse::core::filter::{FilterConfig, apply_filters};
//! use chatpulse::Message;
//!
//! # fn main() -> chatpulse::Result<()> {
//! let messages = vec![
//!     Message::new("1/1/24, 12:00 PM", "Alice", "Old"),
//!     Message::new("6/15/24, 12:00 PM", "Alice", "New"),
//!     Message::new("garbled", "Alice", "Unknown"),
//! ];
//!
//! let config = FilterConfig::new()
//!     .with_date_from("2024-06-01")?
//!     .with_date_to("2024-06-15")?;
//!
//! let filtered = apply_filters(messages, &config);
//! assert_eq!(filtered.len(), 1);
//! assert_eq!(filtered[0].body, "New");
//! # Ok(())
//! # }
//! ```
//!
//! # Behavior Notes
//!
//! - Messages whose timestamp does not normalize are **excluded** whenever a
//!   date bound is set, and kept when none is
//! - The end date covers the whole day, up to 23:59:59
//! - Sender matching is case-insensitive for ASCII characters
//! - Multiple filters are combined with AND logic

use chrono::{NaiveDate, NaiveDateTime};

use crate::Message;
use crate::error::{ChatpulseError, Result};

/// Configuration for filtering messages by date and sender.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Include only messages on or after this instant.
    pub after: Option<NaiveDateTime>,

    /// Include only messages on or before this instant.
    pub before: Option<NaiveDateTime>,

    /// Include only messages from this sender (case-insensitive).
    pub from: Option<String>,
}

impl FilterConfig {
    /// Creates a new empty filter configuration.
    ///
    /// No filters are active by default; all messages pass through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a date-only filter from optional `YYYY-MM-DD` bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::InvalidDate`] if either bound is malformed.
    pub fn from_bounds(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let mut config = Self::new();
        if let Some(start) = start {
            config = config.with_date_from(start)?;
        }
        if let Some(end) = end {
            config = config.with_date_to(end)?;
        }
        Ok(config)
    }

    /// Sets the start date filter (inclusive, from 00:00:00).
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::InvalidDate`] if the format is invalid.
    pub fn with_date_from(mut self, date_str: &str) -> Result<Self> {
        let date = parse_filter_date(date_str)?;
        self.after = Some(start_of_day(date));
        Ok(self)
    }

    /// Sets the end date filter (inclusive, through 23:59:59).
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::InvalidDate`] if the format is invalid.
    pub fn with_date_to(mut self, date_str: &str) -> Result<Self> {
        let date = parse_filter_date(date_str)?;
        self.before = Some(end_of_day(date));
        Ok(self)
    }

    /// Sets the sender filter.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.from = Some(sender.into());
        self
    }

    /// Sets the start instant directly.
    #[must_use]
    pub fn with_after(mut self, dt: NaiveDateTime) -> Self {
        self.after = Some(dt);
        self
    }

    /// Sets the end instant directly.
    #[must_use]
    pub fn with_before(mut self, dt: NaiveDateTime) -> Self {
        self.before = Some(dt);
        self
    }

    /// Returns `true` if any filter is active.
    pub fn is_active(&self) -> bool {
        self.has_date_filter() || self.has_user_filter()
    }

    /// Returns `true` if date filters are active.
    pub fn has_date_filter(&self) -> bool {
        self.after.is_some() || self.before.is_some()
    }

    /// Returns `true` if sender filter is active.
    pub fn has_user_filter(&self) -> bool {
        self.from.is_some()
    }

    /// Returns `true` if `instant` lies within the date bounds.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        !self.after.is_some_and(|after| instant < after)
            && !self.before.is_some_and(|before| instant > before)
    }

    /// Returns `true` if the message passes every active filter.
    pub fn matches(&self, msg: &Message) -> bool {
        if let Some(ref from) = self.from {
            if !msg.sender.eq_ignore_ascii_case(from) {
                return false;
            }
        }

        if self.has_date_filter() {
            return msg.instant().is_some_and(|ts| self.contains(ts));
        }

        true
    }
}

/// Parses a filter date in `YYYY-MM-DD` form.
pub fn parse_filter_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|_| ChatpulseError::invalid_date(date_str))
}

/// Returns 00:00:00 on `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

/// Returns 23:59:59 on `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + chrono::Duration::seconds(86_399)
}

/// Filters a collection of messages based on the provided configuration.
///
/// If no filter is active, the input vector is returned as is.
pub fn apply_filters(messages: Vec<Message>, config: &FilterConfig) -> Vec<Message> {
    if !config.is_active() {
        return messages;
    }

    messages
        .into_iter()
        .filter(|msg| config.matches(msg))
        .collect()
}

/// Selects messages within optional `YYYY-MM-DD` bounds.
///
/// # Errors
///
/// Returns [`ChatpulseError::InvalidDate`] if a bound is malformed; the
/// messages are not inspected in that case.
pub fn filter_by_date(
    messages: Vec<Message>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Vec<Message>> {
    let config = FilterConfig::from_bounds(start, end)?;
    Ok(apply_filters(messages, &config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_msg(sender: &str, body: &str, ts: &str) -> Message {
        Message::new(ts, sender, body)
    }

    #[test]
    fn test_no_bounds_returns_input_unchanged() {
        let messages = vec![
            make_msg("Alice", "B", "garbage"),
            make_msg("Bob", "A", "1/15/24, 10:00 AM"),
        ];
        let filtered = filter_by_date(messages.clone(), None, None).unwrap();
        assert_eq!(filtered, messages);
    }

    #[test]
    fn test_filter_by_sender() {
        let messages = vec![
            make_msg("Alice", "Hello", "x"),
            make_msg("Bob", "Hi", "x"),
            make_msg("alice", "Bye", "x"),
        ];

        let config = FilterConfig::new().with_sender("Alice");
        let filtered = apply_filters(messages, &config);

        assert_eq!(filtered.len(), 2);
        assert!(
            filtered
                .iter()
                .all(|m| m.sender.eq_ignore_ascii_case("Alice"))
        );
    }

    #[test]
    fn test_end_date_widened_to_end_of_day() {
        let messages = vec![
            make_msg("Alice", "Late", "15/06/2024, 23:59:59"),
            make_msg("Alice", "Next day", "16/06/2024, 00:00"),
        ];
        let filtered = filter_by_date(messages, None, Some("2024-06-15")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].body, "Late");
    }

    #[test]
    fn test_start_date_inclusive() {
        let messages = vec![
            make_msg("Alice", "Midnight", "15/06/2024, 00:00"),
            make_msg("Alice", "Before", "14/06/2024, 23:59"),
        ];
        let filtered = filter_by_date(messages, Some("2024-06-15"), None).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].body, "Midnight");
    }

    #[test]
    fn test_unparseable_excluded_when_bounded() {
        let messages = vec![
            make_msg("Alice", "With date", "6/15/24, 10:00 AM"),
            make_msg("Alice", "No date", "sometime"),
        ];

        let filtered = filter_by_date(messages, Some("2024-01-01"), None).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].body, "With date");
    }

    #[test]
    fn test_invalid_date_format() {
        let result = FilterConfig::new().with_date_from("01-01-2024");
        assert!(matches!(result, Err(ChatpulseError::InvalidDate { .. })));

        let result = filter_by_date(vec![], None, Some("2024-13-01"));
        assert!(matches!(result, Err(ChatpulseError::InvalidDate { .. })));
    }

    #[test]
    fn test_combined_filters() {
        let messages = vec![
            make_msg("Alice", "Old Alice", "1/1/24, 10:00 AM"),
            make_msg("Alice", "New Alice", "6/15/24, 10:00 AM"),
            make_msg("Bob", "New Bob", "6/15/24, 10:00 AM"),
        ];

        let config = FilterConfig::new()
            .with_date_from("2024-06-01")
            .unwrap()
            .with_sender("Alice");

        let filtered = apply_filters(messages, &config);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].body, "New Alice");
    }

    #[test]
    fn test_day_bounds() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(start_of_day(date).to_string(), "2024-02-29 00:00:00");
        assert_eq!(end_of_day(date).to_string(), "2024-02-29 23:59:59");
    }

    #[test]
    fn test_is_active() {
        assert!(!FilterConfig::new().is_active());
        assert!(FilterConfig::new().with_sender("Alice").is_active());
        assert!(
            FilterConfig::new()
                .with_date_from("2024-01-01")
                .unwrap()
                .is_active()
        );
    }
}
