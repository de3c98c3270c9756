//! Analytics over parsed messages.
//!
//! Every engine is a pass over a message slice that has already been
//! filtered by the caller:
//!
//! - [`events`] - membership and administrative events (added, left, removed, ...)
//! - [`activity`] - per-user, per-hour and per-weekday counts plus keyword frequencies
//! - [`sentiment`] - blended polarity scoring, tallies and negative-message explanations
//! - [`topics`] - TF-IDF keywords merged with topic-model clusters
//! - [`digest`] - groupings handed to an external summarizer
//! - [`report`] - combines the engines into one response structure
//!
//! All entry points return [`ChatpulseError::NoData`](crate::ChatpulseError::NoData)
//! for empty input instead of a zero-filled result.

pub mod activity;
pub mod digest;
pub mod events;
pub mod report;
pub mod sentiment;
pub mod topics;

use std::collections::HashMap;

pub use activity::{ActivityMetrics, ActivityScope, analyze_activity, calculate_activity};
pub use events::{EventKind, EventLog, GroupEvent, extract_events};
pub use report::{AnalysisReport, Feature, compose_report};
pub use sentiment::{SentimentLabel, SentimentReport, analyze_sentiment};
pub use topics::{Topic, TopicMethod, extract_topics};

/// Counts string keys while remembering the order they were first seen.
///
/// Rankings built from it break ties by first appearance.
#[derive(Debug, Clone, Default)]
pub(crate) struct OrderedCounter {
    index: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl OrderedCounter {
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the count for `key`.
    pub fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    /// Returns the `limit` highest counts, ties in first-seen order.
    pub fn most_common(&self, limit: usize) -> Vec<(String, usize)> {
        let mut ranked = self.entries.clone();
        // sort_by is stable, which keeps first-seen order among equal counts
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }
}

/// Share of `part` in `total` as a percentage rounded to two decimals.
pub(crate) fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 10_000.0).round() / 100.0
}
