//! Sentiment analysis.
//!
//! Each message body is scored by a [`PolarityScorer`] (by default a 0.6/0.4
//! blend of [`PatternScorer`] and [`ValenceScorer`]) and classified with a
//! symmetric threshold:
//!
//! | Polarity | Label |
//! |----------|-------|
//! | `> threshold` | positive |
//! | `< -threshold` | negative |
//! | otherwise | neutral |
//!
//! A message that cannot be scored counts as neutral and the batch continues.
//!
//! ```rust
//! use chatpulse::analysis::sentiment::analyze_sentiment;
//! use chatpulse::config::AnalysisConfig;
//! use chatpulse::Message;
//!
//! let report = analyze_sentiment(
//!     &[
//!         Message::new("1/15/24, 9:00 AM", "Alice", "I love this group, great people"),
//!         Message::new("1/15/24, 9:05 AM", "Bob", "This delay is terrible"),
//!     ],
//!     &AnalysisConfig::default(),
//! )?;
//!
//! assert_eq!(report.overall_sentiment.positive, 1);
//! assert_eq!(report.overall_sentiment.negative, 1);
//! assert_eq!(report.negative_messages[0].sender, "Bob");
//! # Ok::<(), chatpulse::ChatpulseError>(())
//! ```

pub mod lexicon;
pub mod rationale;
pub mod scorer;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

pub use rationale::{Emotion, detect_emotion, explain_negative};
pub use scorer::{
    BlendedScorer, PatternScorer, PolarityScorer, ScoreError, ValenceBreakdown, ValenceScorer,
};

use self::lexicon::{NEGATIVE_KEYWORDS, POSITIVE_KEYWORDS};
use crate::Message;
use crate::config::AnalysisConfig;
use crate::error::{ChatpulseError, Result};

/// Scorer used when none is supplied.
pub type DefaultScorer = BlendedScorer<PatternScorer, ValenceScorer>;

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("sentence pattern is a valid regex"));

/// Categorical sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Classifies a polarity; both comparisons are strict.
    pub fn classify(polarity: f64, threshold: f64) -> Self {
        if polarity > threshold {
            SentimentLabel::Positive
        } else if polarity < -threshold {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// Number of messages per label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentTally {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentTally {
    pub fn add(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

/// Sentiment of one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentRecord {
    pub timestamp: String,
    pub sender: String,
    pub polarity: f64,
    pub sentiment: SentimentLabel,
    pub emotion: Option<Emotion>,
    /// Set for negative messages only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

/// One point of the sentiment trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub sentiment: SentimentLabel,
    pub polarity: f64,
}

/// An emotional keyword found in a message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordHit {
    pub keyword: &'static str,
    /// The sentence containing the keyword
    pub message: String,
    pub sender: String,
    pub timestamp: String,
    pub polarity: f64,
}

/// Emotional keyword hits by direction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmotionalKeywords {
    pub positive: Vec<KeywordHit>,
    pub negative: Vec<KeywordHit>,
}

/// A negative message with the reasons it reads that way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NegativeMessage {
    pub timestamp: String,
    pub sender: String,
    pub message: String,
    pub polarity: f64,
    /// `reasons` joined with `"; "`
    pub explanation: String,
    pub reasons: Vec<String>,
}

/// Sentiment over a message list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SentimentReport {
    pub overall_sentiment: SentimentTally,
    /// Keyed by `YYYY-MM-DD`; messages without a parseable timestamp are not bucketed
    pub daily_sentiment: BTreeMap<String, SentimentTally>,
    pub user_sentiment: BTreeMap<String, SentimentTally>,
    pub sentiment_trend: Vec<TrendPoint>,
    pub emotional_keywords: EmotionalKeywords,
    pub sentiment_scores: Vec<SentimentRecord>,
    pub negative_messages: Vec<NegativeMessage>,
    /// Messages that could not be scored and were counted as neutral
    pub scoring_failures: usize,
}

/// Scores and aggregates message sentiment.
#[derive(Debug, Clone)]
pub struct SentimentAnalyzer<S = DefaultScorer> {
    scorer: S,
    threshold: f64,
}

impl SentimentAnalyzer<DefaultScorer> {
    /// Creates an analyzer with the default blended scorer.
    pub fn new(config: &AnalysisConfig) -> Self {
        Self::with_scorer(DefaultScorer::default(), config.sentiment_threshold)
    }
}

impl<S: PolarityScorer> SentimentAnalyzer<S> {
    /// Creates an analyzer around a custom scorer.
    pub fn with_scorer(scorer: S, threshold: f64) -> Self {
        Self { scorer, threshold }
    }

    /// Scores a single message.
    pub fn score_message(&self, msg: &Message) -> std::result::Result<SentimentRecord, ScoreError> {
        let polarity = self.scorer.score(&msg.body)?;
        let sentiment = SentimentLabel::classify(polarity, self.threshold);
        let rationale = (sentiment == SentimentLabel::Negative)
            .then(|| explain_negative(&msg.body, polarity).join("; "));

        Ok(SentimentRecord {
            timestamp: msg.timestamp.clone(),
            sender: msg.sender.clone(),
            polarity,
            sentiment,
            emotion: detect_emotion(&msg.body),
            rationale,
        })
    }

    /// Scores every message and aggregates the results.
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::NoData`] if `messages` is empty.
    pub fn analyze(&self, messages: &[Message]) -> Result<SentimentReport> {
        if messages.is_empty() {
            return Err(ChatpulseError::no_data("sentiment: no messages"));
        }

        let mut report = SentimentReport::default();

        for msg in messages {
            let date = msg.date().map(|d| d.format("%Y-%m-%d").to_string());
            if let Some(date) = &date {
                report.daily_sentiment.entry(date.clone()).or_default();
            }

            let record = match self.score_message(msg) {
                Ok(record) => record,
                Err(err) => {
                    debug!(sender = %msg.sender, timestamp = %msg.timestamp, error = %err, "scored as neutral");
                    report.scoring_failures += 1;
                    report.tally(date.as_deref(), &msg.sender, SentimentLabel::Neutral);
                    continue;
                }
            };

            report.tally(date.as_deref(), &msg.sender, record.sentiment);

            if let Some(date) = date {
                report.sentiment_trend.push(TrendPoint {
                    date,
                    sentiment: record.sentiment,
                    polarity: record.polarity,
                });
            }

            collect_keywords(
                msg,
                record.polarity,
                POSITIVE_KEYWORDS,
                &mut report.emotional_keywords.positive,
            );
            collect_keywords(
                msg,
                record.polarity,
                NEGATIVE_KEYWORDS,
                &mut report.emotional_keywords.negative,
            );

            if let Some(explanation) = &record.rationale {
                report.negative_messages.push(NegativeMessage {
                    timestamp: msg.timestamp.clone(),
                    sender: msg.sender.clone(),
                    message: msg.body.clone(),
                    polarity: record.polarity,
                    explanation: explanation.clone(),
                    reasons: explanation.split("; ").map(str::to_string).collect(),
                });
            }

            report.sentiment_scores.push(record);
        }

        Ok(report)
    }
}

impl SentimentReport {
    fn tally(&mut self, date: Option<&str>, sender: &str, label: SentimentLabel) {
        self.overall_sentiment.add(label);
        if let Some(date) = date {
            self.daily_sentiment.entry(date.to_string()).or_default().add(label);
        }
        self.user_sentiment
            .entry(sender.to_string())
            .or_default()
            .add(label);
    }
}

fn collect_keywords(
    msg: &Message,
    polarity: f64,
    keywords: &'static [&'static str],
    hits: &mut Vec<KeywordHit>,
) {
    let lower = msg.body.to_lowercase();
    for &keyword in keywords {
        if !lower.contains(keyword) {
            continue;
        }
        let context = SENTENCE_BREAK
            .split(&msg.body)
            .find(|s| s.to_lowercase().contains(keyword))
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        hits.push(KeywordHit {
            keyword,
            message: context,
            sender: msg.sender.clone(),
            timestamp: msg.timestamp.clone(),
            polarity,
        });
    }
}

/// Runs sentiment analysis with the default scorer.
///
/// # Errors
///
/// Returns [`ChatpulseError::NoData`] if `messages` is empty.
pub fn analyze_sentiment(messages: &[Message], config: &AnalysisConfig) -> Result<SentimentReport> {
    SentimentAnalyzer::new(config).analyze(messages)
}
