//! Activity and business metrics.
//!
//! Counts who talks, when, and about what. Time buckets only include
//! messages whose timestamp normalizes; sender and keyword counts use every
//! message.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use chrono::{NaiveDate, Timelike};
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::OrderedCounter;
use crate::Message;
use crate::config::AnalysisConfig;
use crate::core::filter::{FilterConfig, end_of_day, parse_filter_date, start_of_day};
use crate::error::{ChatpulseError, Result};

/// Words excluded from the keyword ranking.
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is", "are",
    "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should", "may", "might", "must", "can", "this", "that", "these", "those", "a", "an",
];

/// Substrings counted in [`ActivityMetrics::business_keywords_count`].
pub const BUSINESS_KEYWORDS: &[&str] = &[
    "price",
    "cost",
    "order",
    "delivery",
    "payment",
    "product",
    "service",
    "meeting",
    "client",
    "customer",
    "project",
    "deadline",
    "invoice",
    "contract",
    "deal",
    "offer",
    "discount",
    "profit",
    "loss",
    "revenue",
    "sales",
    "marketing",
    "promotion",
];

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("word pattern is a valid regex"));

/// Time window an activity report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityScope {
    /// Every message
    All,
    /// One calendar day, for an hour-by-hour view
    Day(NaiveDate),
    /// An inclusive range of days
    Week { start: NaiveDate, end: NaiveDate },
}

impl ActivityScope {
    /// Builds a scope from optional `YYYY-MM-DD` arguments.
    ///
    /// A single `day` wins over a range; a range needs both ends.
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::InvalidDate`] for malformed dates and
    /// [`ChatpulseError::InvalidConfig`] if only one end of a range is given.
    pub fn from_args(day: Option<&str>, start: Option<&str>, end: Option<&str>) -> Result<Self> {
        if let Some(day) = day {
            return Ok(ActivityScope::Day(parse_filter_date(day)?));
        }
        match (start, end) {
            (Some(start), Some(end)) => Ok(ActivityScope::Week {
                start: parse_filter_date(start)?,
                end: parse_filter_date(end)?,
            }),
            (None, None) => Ok(ActivityScope::All),
            _ => Err(ChatpulseError::invalid_config(
                "a weekly activity range needs both a start and an end date",
            )),
        }
    }

    /// Label reported as `analysis_type`.
    pub fn analysis_type(self) -> &'static str {
        match self {
            ActivityScope::All => "all",
            ActivityScope::Day(_) => "hourly",
            ActivityScope::Week { .. } => "weekly",
        }
    }

    /// Date filter selecting the scope's messages.
    pub fn filter(self) -> FilterConfig {
        match self {
            ActivityScope::All => FilterConfig::new(),
            ActivityScope::Day(day) => FilterConfig::new()
                .with_after(start_of_day(day))
                .with_before(end_of_day(day)),
            ActivityScope::Week { start, end } => FilterConfig::new()
                .with_after(start_of_day(start))
                .with_before(end_of_day(end)),
        }
    }
}

/// A word and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

/// Activity counts for a message list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityMetrics {
    pub analysis_type: &'static str,
    pub total_messages: usize,
    pub total_users: usize,
    pub messages_per_user: BTreeMap<String, usize>,
    /// Hour of day (0-23) to message count
    pub activity_by_hour: BTreeMap<u32, usize>,
    /// English weekday name to message count
    pub activity_by_day: BTreeMap<String, usize>,
    /// Every hour 0-23 is present, possibly with no senders
    pub activity_by_hour_with_users: BTreeMap<u32, BTreeMap<String, usize>>,
    /// Most frequent words, ties in first-seen order. Serialized as a
    /// word-to-count map keeping this order.
    #[serde(serialize_with = "serialize_ranked")]
    pub top_keywords: Vec<KeywordCount>,
    /// Only keywords that occur at least once
    pub business_keywords_count: BTreeMap<String, usize>,
}

/// Computes activity metrics over every message.
///
/// # Errors
///
/// Returns [`ChatpulseError::NoData`] if `messages` is empty.
pub fn calculate_activity(messages: &[Message], config: &AnalysisConfig) -> Result<ActivityMetrics> {
    if messages.is_empty() {
        return Err(ChatpulseError::no_data("activity: no messages"));
    }

    let mut messages_per_user: BTreeMap<String, usize> = BTreeMap::new();
    let mut activity_by_hour: BTreeMap<u32, usize> = BTreeMap::new();
    let mut activity_by_day: BTreeMap<String, usize> = BTreeMap::new();
    let mut activity_by_hour_with_users: BTreeMap<u32, BTreeMap<String, usize>> =
        (0..24).map(|h| (h, BTreeMap::new())).collect();

    for msg in messages {
        *messages_per_user.entry(msg.sender.clone()).or_default() += 1;

        if let Some(ts) = msg.instant() {
            let hour = ts.hour();
            *activity_by_hour.entry(hour).or_default() += 1;
            *activity_by_hour_with_users
                .entry(hour)
                .or_default()
                .entry(msg.sender.clone())
                .or_default() += 1;
            *activity_by_day
                .entry(ts.format("%A").to_string())
                .or_default() += 1;
        }
    }

    let all_text = messages
        .iter()
        .map(|m| m.body.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(ActivityMetrics {
        analysis_type: ActivityScope::All.analysis_type(),
        total_messages: messages.len(),
        total_users: messages_per_user.len(),
        messages_per_user,
        activity_by_hour,
        activity_by_day,
        activity_by_hour_with_users,
        top_keywords: top_keywords(&all_text, config.top_keywords_limit),
        business_keywords_count: business_keyword_counts(&all_text),
    })
}

/// Restricts `messages` to `scope` and computes activity metrics.
///
/// # Errors
///
/// Returns [`ChatpulseError::NoData`] if no message falls in the scope.
pub fn analyze_activity(
    messages: &[Message],
    scope: ActivityScope,
    config: &AnalysisConfig,
) -> Result<ActivityMetrics> {
    let filter = scope.filter();
    let scoped: Vec<Message> = if filter.is_active() {
        messages.iter().filter(|m| filter.matches(m)).cloned().collect()
    } else {
        messages.to_vec()
    };

    let mut metrics = calculate_activity(&scoped, config)?;
    metrics.analysis_type = scope.analysis_type();
    Ok(metrics)
}

fn top_keywords(all_text: &str, limit: usize) -> Vec<KeywordCount> {
    let stop: HashSet<&str> = STOP_WORDS.iter().copied().collect();
    let mut counter = OrderedCounter::new();
    for word in WORD.find_iter(all_text).map(|m| m.as_str()) {
        if word.chars().count() > 2 && !stop.contains(word) {
            counter.add(word);
        }
    }
    counter
        .most_common(limit)
        .into_iter()
        .map(|(keyword, count)| KeywordCount { keyword, count })
        .collect()
}

fn serialize_ranked<S: Serializer>(
    keywords: &[KeywordCount],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(keywords.len()))?;
    for kw in keywords {
        map.serialize_entry(&kw.keyword, &kw.count)?;
    }
    map.end()
}

fn business_keyword_counts(all_text: &str) -> BTreeMap<String, usize> {
    BUSINESS_KEYWORDS
        .iter()
        .filter_map(|kw| {
            let count = all_text.matches(kw).count();
            (count > 0).then(|| ((*kw).to_string(), count))
        })
        .collect()
}
