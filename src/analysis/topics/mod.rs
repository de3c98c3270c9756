//! Topic extraction.
//!
//! Two views of what a conversation is about are merged into one ranking:
//!
//! 1. **Keywords** - terms ranked by summed TF-IDF weight, one message per document
//! 2. **Clusters** - groups of co-occurring terms from an LDA topic model, only
//!    when the corpus is larger than [`AnalysisConfig::topic_model_min_corpus`]
//!
//! Every entry carries up to two example messages that contain the term (or
//! one of the cluster's terms) as a whole word. Entries without examples are
//! dropped before the list is cut to the requested size.

pub mod lda;
pub mod tfidf;

use serde::Serialize;
use tracing::debug;

use self::lda::GibbsLda;
use self::tfidf::{TfidfModel, preprocess};
use crate::Message;
use crate::config::AnalysisConfig;
use crate::error::{ChatpulseError, Result};

/// Example messages kept per topic.
pub const MAX_EXAMPLES: usize = 2;

/// Example text longer than this is cut and suffixed with `...`.
pub const EXAMPLE_CHARS: usize = 100;

/// How a topic entry was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicMethod {
    Tfidf,
    Lda,
}

/// A message supporting a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicExample {
    pub sender: String,
    pub timestamp: String,
    pub message: String,
}

impl TopicExample {
    fn from_message(msg: &Message) -> Self {
        let message = if msg.body.chars().count() > EXAMPLE_CHARS {
            let head: String = msg.body.chars().take(EXAMPLE_CHARS).collect();
            format!("{head}...")
        } else {
            msg.body.clone()
        };
        Self {
            sender: msg.sender.clone(),
            timestamp: msg.timestamp.clone(),
            message,
        }
    }
}

/// A ranked topic entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Topic {
    /// The keyword, or a cluster's terms joined with `", "`
    pub topic: String,
    pub method: TopicMethod,
    pub score: f64,
    pub examples: Vec<TopicExample>,
}

/// Extracts the `top_n` highest-scoring topics.
///
/// Only the most recent [`AnalysisConfig::topic_max_corpus`] messages are used.
///
/// # Errors
///
/// Returns [`ChatpulseError::NoData`] if there are no messages, no message
/// has text left after cleanup, or no term survives the stop-word and
/// length filters.
pub fn extract_topics(
    messages: &[Message],
    top_n: usize,
    config: &AnalysisConfig,
) -> Result<Vec<Topic>> {
    if messages.is_empty() {
        return Err(ChatpulseError::no_data("topics: no messages"));
    }

    let start = messages.len().saturating_sub(config.topic_max_corpus);
    let (docs, sources): (Vec<String>, Vec<&Message>) = messages[start..]
        .iter()
        .filter_map(|msg| {
            let doc = preprocess(&msg.body);
            (!doc.is_empty()).then_some((doc, msg))
        })
        .unzip();
    if docs.is_empty() {
        return Err(ChatpulseError::no_data("topics: no text left after cleanup"));
    }

    let model = TfidfModel::fit(&docs, config.topic_max_features, config.topic_min_word_length)
        .ok_or_else(|| ChatpulseError::no_data("topics: empty vocabulary"))?;

    let mut topics: Vec<Topic> = model
        .ranked_terms()
        .into_iter()
        .take(top_n)
        .map(|(term, score)| Topic {
            topic: term.to_string(),
            method: TopicMethod::Tfidf,
            score,
            examples: find_examples(&sources, &[term]),
        })
        .collect();

    if docs.len() > config.topic_model_min_corpus && top_n > 0 {
        let n_topics = top_n.min(config.topic_max_topics);
        let clusters = GibbsLda::new(n_topics, config.lda_iterations, config.lda_seed)
            .fit(&model.documents, model.vocabulary.len());
        debug!(documents = docs.len(), clusters = clusters.len(), "fitted topic model");

        for cluster in clusters {
            let terms: Vec<&str> = cluster
                .terms
                .iter()
                .map(|&i| model.vocabulary[i].as_str())
                .collect();
            topics.push(Topic {
                topic: terms.join(", "),
                method: TopicMethod::Lda,
                score: cluster.weight,
                examples: find_examples(&sources, &terms),
            });
        }
    }

    topics.retain(|t| !t.examples.is_empty());
    topics.sort_by(|a, b| b.score.total_cmp(&a.score));
    topics.truncate(top_n);
    Ok(topics)
}

/// First messages containing any of `terms` as a whole word.
fn find_examples(sources: &[&Message], terms: &[&str]) -> Vec<TopicExample> {
    sources
        .iter()
        .filter(|msg| contains_word(&msg.body, terms))
        .take(MAX_EXAMPLES)
        .map(|msg| TopicExample::from_message(msg))
        .collect()
}

fn contains_word(text: &str, terms: &[&str]) -> bool {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .any(|word| terms.contains(&word))
}
