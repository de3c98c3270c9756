//! Combined analytics report.
//!
//! [`compose_report`] runs the engines selected by a list of [`Feature`]s
//! over one message list and gathers their results. An engine that reports
//! no data for a non-empty list (for example topics on a chat of emoji)
//! leaves its section out instead of failing the whole report.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use super::activity::{ActivityMetrics, calculate_activity};
use super::events::{EventCounts, extract_events};
use super::sentiment::{SentimentReport, analyze_sentiment};
use super::topics::{Topic, extract_topics};
use crate::Message;
use crate::config::AnalysisConfig;
use crate::error::{ChatpulseError, Result};

/// Topics included in a combined report.
pub const REPORT_TOPICS: usize = 10;

/// A report section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Sentiment,
    Topics,
    Activity,
    Events,
    Messages,
}

impl Feature {
    /// Every section, in report order.
    pub fn all() -> &'static [Feature] {
        &[
            Feature::Sentiment,
            Feature::Topics,
            Feature::Activity,
            Feature::Events,
            Feature::Messages,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::Sentiment => "sentiment",
            Feature::Topics => "topics",
            Feature::Activity => "activity",
            Feature::Events => "events",
            Feature::Messages => "messages",
        }
    }

    /// Parses feature names; `all` expands to every section.
    ///
    /// Duplicates are dropped and the result follows [`Feature::all`] order.
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::UnknownFeature`] for an unrecognized name.
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<Vec<Feature>> {
        let mut selected = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.eq_ignore_ascii_case("all") {
                selected.extend_from_slice(Feature::all());
            } else {
                selected.push(name.parse()?);
            }
        }
        Ok(Feature::all()
            .iter()
            .copied()
            .filter(|f| selected.contains(f))
            .collect())
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = ChatpulseError;

    fn from_str(s: &str) -> Result<Self> {
        Feature::all()
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ChatpulseError::UnknownFeature(s.to_string()))
    }
}

/// Event counts and the remover ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSummary {
    pub event_counts: EventCounts,
    pub top_removers: Vec<(String, usize)>,
}

impl EventSummary {
    /// Extracts events and summarizes them.
    pub fn from_messages(messages: &[Message], config: &AnalysisConfig) -> Self {
        let log = extract_events(messages);
        Self {
            event_counts: log.counts(),
            top_removers: log.top_removers(config.top_removers_limit),
        }
    }
}

/// Sections produced by [`compose_report`]; unselected ones are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<Topic>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<ActivityMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<EventSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
}

/// Runs the selected engines over `messages`.
///
/// # Errors
///
/// Returns [`ChatpulseError::NoData`] if `messages` is empty. Other errors
/// from the engines are propagated.
pub fn compose_report(
    messages: &[Message],
    features: &[Feature],
    config: &AnalysisConfig,
) -> Result<AnalysisReport> {
    if messages.is_empty() {
        return Err(ChatpulseError::no_data("report: no messages"));
    }

    let mut report = AnalysisReport::default();
    for &feature in features {
        match feature {
            Feature::Sentiment => report.sentiment = section(feature, analyze_sentiment(messages, config))?,
            Feature::Topics => {
                report.topics = section(feature, extract_topics(messages, REPORT_TOPICS, config))?;
            }
            Feature::Activity => report.activity = section(feature, calculate_activity(messages, config))?,
            Feature::Events => report.events = Some(EventSummary::from_messages(messages, config)),
            Feature::Messages => report.messages = Some(messages.to_vec()),
        }
    }
    Ok(report)
}

/// Turns a "no data" outcome into an absent section.
fn section<T>(feature: Feature, result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_no_data() => {
            debug!(%feature, error = %err, "section left out");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Message> {
        vec![
            Message::new("1/15/24, 9:00 AM", "Alice", "Welcome to the garden club"),
            Message::new("1/15/24, 9:01 AM", "Alice", "Alice added Bob"),
            Message::new("1/15/24, 9:02 AM", "Bob", "Thanks, the garden looks great"),
            Message::new("1/15/24, 9:03 AM", "Alice", "Alice removed Carol"),
        ]
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            Feature::parse_list(&["topics", "sentiment", "topics"]).unwrap(),
            vec![Feature::Sentiment, Feature::Topics]
        );
        assert_eq!(Feature::parse_list(&["all"]).unwrap(), Feature::all());
        assert!(matches!(
            Feature::parse_list(&["summary"]),
            Err(ChatpulseError::UnknownFeature(name)) if name == "summary"
        ));
    }

    #[test]
    fn test_selected_sections_only() {
        let report =
            compose_report(&sample(), &[Feature::Events], &AnalysisConfig::default()).unwrap();
        assert!(report.sentiment.is_none());
        assert!(report.messages.is_none());

        let events = report.events.unwrap();
        assert_eq!(events.event_counts.added, 1);
        assert_eq!(events.event_counts.removed, 1);
        assert_eq!(events.top_removers, vec![("Alice".to_string(), 1)]);
    }

    #[test]
    fn test_full_report() {
        let report =
            compose_report(&sample(), Feature::all(), &AnalysisConfig::default()).unwrap();
        assert_eq!(report.sentiment.unwrap().overall_sentiment.total(), 4);
        assert!(!report.topics.unwrap().is_empty());
        assert_eq!(report.activity.unwrap().total_messages, 4);
        assert_eq!(report.messages.unwrap().len(), 4);
    }

    #[test]
    fn test_topics_without_text_are_left_out() {
        let messages = [Message::new("1/15/24, 9:00 AM", "A", "123 456")];
        let report =
            compose_report(&messages, &[Feature::Topics, Feature::Activity], &AnalysisConfig::default())
                .unwrap();
        assert!(report.topics.is_none());
        assert!(report.activity.is_some());
    }

    #[test]
    fn test_empty_is_no_data() {
        let err = compose_report(&[], Feature::all(), &AnalysisConfig::default()).unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn test_serialized_field_names() {
        let report =
            compose_report(&sample(), &[Feature::Events, Feature::Activity], &AnalysisConfig::default())
                .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["events"]["event_counts"].is_object());
        assert!(json["events"]["top_removers"].is_array());
        assert!(json["activity"]["activity_by_hour"].is_object());
        assert!(json.get("sentiment").is_none());
    }
}
