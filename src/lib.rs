//! # Chatpulse
//!
//! A Rust library for parsing WhatsApp group chat exports and computing
//! analytics over them.
//!
//! ## Overview
//!
//! Chatpulse turns a plain-text export into typed [`Message`] records and runs
//! a set of independent engines over them:
//!
//! - **Events** - membership and administrative events (added, left, removed, ...)
//! - **Sentiment** - per-message polarity, tallies and explained negative messages
//! - **Topics** - TF-IDF keywords plus LDA topic clusters on larger corpora
//! - **Activity** - message counts by user, hour and weekday, keyword frequencies
//!
//! Every engine takes a message list and an [`AnalysisConfig`](config::AnalysisConfig)
//! and returns a serializable result, or [`ChatpulseError::NoData`] when there
//! is nothing to analyze.
//!
//! ## Quick Start
//!
//! ```rust
//! use chatpulse::prelude::*;
//!
//! let export = "\
//! 1/15/24, 9:00 AM - Alice: Welcome everyone!
//! 1/15/24, 9:01 AM - Alice: Alice added Bob
//! 1/16/24, 6:30 PM - Bob: Thanks, I love this group";
//!
//! let messages = LogParser::new().parse_str(export);
//! let filter = FilterConfig::from_bounds(Some("2024-01-15"), Some("2024-01-15"))?;
//! let messages = apply_filters(messages, &filter);
//!
//! let events = extract_events(&messages);
//! assert_eq!(events.counts().added, 1);
//!
//! let report = compose_report(&messages, &[Feature::Activity], &AnalysisConfig::default())?;
//! assert_eq!(report.activity.map(|a| a.total_messages), Some(2));
//! # Ok::<(), chatpulse::ChatpulseError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`timestamp`] - Best-effort timestamp normalization
//! - [`parser`] - Line-oriented export parser ([`LogParser`](parser::LogParser))
//! - [`message`] - The [`Message`] record
//! - [`core`] - Filtering ([`FilterConfig`](core::FilterConfig)) and the export cache ([`ChatCache`](core::ChatCache))
//! - [`analysis`] - Events, sentiment, topics, activity, digests and combined reports
//! - [`config`] - Analysis tunables
//! - [`error`] - Unified error types ([`ChatpulseError`], [`Result`])
//! - [`cli`] - CLI types (feature `cli`)
//! - [`prelude`] - Convenient re-exports

pub mod analysis;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod message;
pub mod parser;
pub mod timestamp;

// Re-export the main types at the crate root for convenience
pub use error::{ChatpulseError, Result};
pub use message::Message;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatpulse::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Message;
    pub use crate::error::{ChatpulseError, Result};

    // Parsing and selection
    pub use crate::core::{ChatCache, FilterConfig, apply_filters, filter_by_date};
    pub use crate::parser::LogParser;
    pub use crate::timestamp::normalize_timestamp;

    pub use crate::config::AnalysisConfig;

    // Engines
    pub use crate::analysis::{
        ActivityScope, AnalysisReport, EventKind, Feature, SentimentLabel, Topic,
        analyze_activity, analyze_sentiment, calculate_activity, compose_report, extract_events,
        extract_topics,
    };
}
