//! Configuration for the analysis engines.
//!
//! [`AnalysisConfig`] collects every tunable constant used by the sentiment,
//! topic, activity and event engines. Defaults match what the engines were
//! calibrated with; override individual values with the `with_*` builders or
//! load a JSON file where missing keys keep their defaults.
//!
//! # Example
//!
//! ```rust
//! use chatpulse::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::new()
//!     .with_sentiment_threshold(0.2)
//!     .with_topic_max_topics(5);
//!
//! assert!(config.validate().is_ok());
//! ```

#[cfg(feature = "json-output")]
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChatpulseError, Result};

/// Tunable constants for every analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Symmetric polarity threshold for positive/negative labels (default: 0.1)
    pub sentiment_threshold: f64,

    /// TF-IDF terms must be strictly longer than this (default: 3)
    pub topic_min_word_length: usize,

    /// Upper bound on the number of LDA topics (default: 15)
    pub topic_max_topics: usize,

    /// LDA only runs when the corpus has more documents than this (default: 10)
    pub topic_model_min_corpus: usize,

    /// Size of the TF-IDF vocabulary, most frequent terms first (default: 1000)
    pub topic_max_features: usize,

    /// Most recent messages fed into topic extraction (default: 5000)
    pub topic_max_corpus: usize,

    /// Gibbs sampling sweeps for the topic model (default: 200)
    pub lda_iterations: usize,

    /// Seed for the topic model's random number generator (default: 42)
    pub lda_seed: u64,

    /// Number of keywords in the activity ranking (default: 20)
    pub top_keywords_limit: usize,

    /// Number of entries in the remover ranking (default: 5)
    pub top_removers_limit: usize,

    /// Transcript size handed to an external summarizer (default: 30000)
    pub max_transcript_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sentiment_threshold: 0.1,
            topic_min_word_length: 3,
            topic_max_topics: 15,
            topic_model_min_corpus: 10,
            topic_max_features: 1000,
            topic_max_corpus: 5000,
            lda_iterations: 200,
            lda_seed: 42,
            top_keywords_limit: 20,
            top_removers_limit: 5,
            max_transcript_chars: 30_000,
        }
    }
}

impl AnalysisConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sentiment classification threshold.
    #[must_use]
    pub fn with_sentiment_threshold(mut self, threshold: f64) -> Self {
        self.sentiment_threshold = threshold;
        self
    }

    /// Sets the minimum TF-IDF term length (exclusive).
    #[must_use]
    pub fn with_topic_min_word_length(mut self, len: usize) -> Self {
        self.topic_min_word_length = len;
        self
    }

    /// Sets the maximum number of LDA topics.
    #[must_use]
    pub fn with_topic_max_topics(mut self, topics: usize) -> Self {
        self.topic_max_topics = topics;
        self
    }

    /// Sets the corpus size above which the topic model runs.
    #[must_use]
    pub fn with_topic_model_min_corpus(mut self, docs: usize) -> Self {
        self.topic_model_min_corpus = docs;
        self
    }

    /// Sets the cap on documents fed into topic extraction.
    #[must_use]
    pub fn with_topic_max_corpus(mut self, docs: usize) -> Self {
        self.topic_max_corpus = docs;
        self
    }

    /// Sets the number of Gibbs sampling sweeps.
    #[must_use]
    pub fn with_lda_iterations(mut self, iterations: usize) -> Self {
        self.lda_iterations = iterations;
        self
    }

    /// Sets the topic model seed.
    #[must_use]
    pub fn with_lda_seed(mut self, seed: u64) -> Self {
        self.lda_seed = seed;
        self
    }

    /// Sets the size of the remover ranking.
    #[must_use]
    pub fn with_top_removers_limit(mut self, limit: usize) -> Self {
        self.top_removers_limit = limit;
        self
    }

    /// Sets the transcript size limit.
    #[must_use]
    pub fn with_max_transcript_chars(mut self, chars: usize) -> Self {
        self.max_transcript_chars = chars;
        self
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if !self.sentiment_threshold.is_finite() || self.sentiment_threshold < 0.0 {
            return Err(ChatpulseError::invalid_config(format!(
                "sentiment_threshold must be a non-negative number, got {}",
                self.sentiment_threshold
            )));
        }
        if self.topic_max_topics == 0 {
            return Err(ChatpulseError::invalid_config(
                "topic_max_topics must be at least 1",
            ));
        }
        if self.topic_max_features == 0 {
            return Err(ChatpulseError::invalid_config(
                "topic_max_features must be at least 1",
            ));
        }
        if self.topic_max_corpus == 0 {
            return Err(ChatpulseError::invalid_config(
                "topic_max_corpus must be at least 1",
            ));
        }
        Ok(())
    }

    /// Parses a configuration from JSON. Missing keys keep their defaults.
    #[cfg(feature = "json-output")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration from a JSON file.
    #[cfg(feature = "json-output")]
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
