//! Unified error types for chatpulse.
//!
//! This module provides a single [`ChatpulseError`] enum that covers all error
//! cases in the library.
//!
//! # What is *not* an error
//!
//! A lot of irregular input is expected in chat exports and never surfaces here:
//!
//! - a timestamp that matches no known format normalizes to `None`
//! - a line that matches no header pattern is a continuation (or is dropped)
//! - a message the sentiment scorers cannot handle is counted as neutral
//!
//! What *is* reported is caller input that cannot be interpreted (bad filter
//! dates, unknown event kinds) and the explicit "no data" outcome of an
//! aggregation that received nothing to aggregate.

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for chatpulse operations.
///
/// # Example
///
/// ```rust
/// use chatpulse::error::Result;
/// use chatpulse::Message;
///
/// fn load() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatpulseError>;

/// The error type for all chatpulse operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatpulseError {
    /// An I/O error occurred while reading an export.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A filter date supplied by the caller could not be parsed.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// There was nothing to aggregate.
    ///
    /// Returned instead of a zero-filled result when the input is empty,
    /// when no message survives filtering, or when preprocessing leaves no
    /// usable text.
    #[error("No data: {context}")]
    NoData {
        /// What was being computed
        context: String,
    },

    /// The requested group is not loaded in the cache.
    #[error("Group not found: {0}")]
    UnknownGroup(String),

    /// The requested event kind does not exist.
    #[error("Unknown event kind '{0}'")]
    UnknownEventKind(String),

    /// The requested report feature does not exist.
    #[error("Unknown report feature '{0}'")]
    UnknownFeature(String),

    /// An [`AnalysisConfig`](crate::config::AnalysisConfig) value is out of range.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong
        message: String,
    },

    /// JSON parsing/serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatpulseError {
    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        ChatpulseError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates a "no data" error for the given computation.
    pub fn no_data(context: impl Into<String>) -> Self {
        ChatpulseError::NoData {
            context: context.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ChatpulseError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatpulseError::Io(_))
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, ChatpulseError::InvalidDate { .. })
    }

    /// Returns `true` if this is the explicit "no data" outcome.
    pub fn is_no_data(&self) -> bool {
        matches!(self, ChatpulseError::NoData { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = ChatpulseError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_invalid_date_display() {
        let err = ChatpulseError::invalid_date("not-a-date");
        let display = err.to_string();
        assert!(display.contains("not-a-date"));
        assert!(display.contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_no_data_display() {
        let err = ChatpulseError::no_data("sentiment analysis");
        assert_eq!(err.to_string(), "No data: sentiment analysis");
    }

    #[test]
    fn test_unknown_names_display() {
        assert!(
            ChatpulseError::UnknownEventKind("joined".into())
                .to_string()
                .contains("joined")
        );
        assert!(
            ChatpulseError::UnknownGroup("Family".into())
                .to_string()
                .contains("Family")
        );
        assert!(
            ChatpulseError::UnknownFeature("summary".into())
                .to_string()
                .contains("summary")
        );
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = ChatpulseError::from(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_is_methods() {
        let io_err = ChatpulseError::Io(io::Error::new(io::ErrorKind::NotFound, ""));
        assert!(io_err.is_io());
        assert!(!io_err.is_invalid_date());
        assert!(!io_err.is_no_data());

        let date_err = ChatpulseError::invalid_date("bad");
        assert!(date_err.is_invalid_date());
        assert!(!date_err.is_io());

        assert!(ChatpulseError::no_data("x").is_no_data());
    }

    #[cfg(feature = "json-output")]
    #[test]
    fn test_json_error_from() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ChatpulseError::from(json_err);
        assert!(err.to_string().contains("JSON error"));
    }
}
