//! Text cleanup and TF-IDF keyword scoring.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

/// Words never treated as topic terms.
#[rustfmt::skip]
pub const STOP_WORDS: &[&str] = &[
    "the", "is", "in", "and", "to", "a", "of", "for", "on", "with", "at", "by", "an", "be",
    "this", "that", "it", "as", "are", "was", "from", "or", "but", "not", "have", "has", "had",
    "you", "i", "we", "they", "he", "she", "his", "her", "them", "our", "your", "my", "me",
    "so", "do", "does", "did", "can", "could", "will", "would", "should", "about", "just",
    "if", "then", "than", "too", "very", "all", "any", "some", "no", "yes", "one", "two",
    "up", "down", "out", "over", "under", "again", "more", "most", "such", "only", "own",
    "same", "other", "new", "now", "after", "before", "because", "how", "when", "where",
    "who", "what", "which", "why", "whom", "whose", "been", "being", "into", "during",
    "while", "through", "each", "few", "many", "much", "every", "both", "either", "neither",
    "between", "among", "against", "per", "via", "like", "unlike", "within", "without",
    "across", "toward", "upon", "off", "onto", "beside", "besides", "along", "around",
    "behind", "beyond", "despite", "except", "inside", "outside", "past", "since", "until",
];

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?\S+|www\S+").expect("link pattern is a valid regex"));
static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+").expect("mention pattern is a valid regex"));
static NON_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z ]").expect("letter pattern is a valid regex"));
static TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("term pattern is a valid regex"));

/// Lowercases a message and strips links, mentions and anything but ASCII letters.
///
/// Returns an empty string when nothing is left.
pub fn preprocess(body: &str) -> String {
    let text = body.to_lowercase();
    let text = LINK.replace_all(&text, "");
    let text = MENTION.replace_all(&text, "");
    let text = NON_LETTER.replace_all(&text, " ");
    if text.trim().is_empty() {
        String::new()
    } else {
        text.into_owned()
    }
}

/// A fitted TF-IDF model.
#[derive(Debug, Clone, PartialEq)]
pub struct TfidfModel {
    /// Vocabulary in alphabetical order
    pub vocabulary: Vec<String>,
    /// Per document, the vocabulary index of every kept token
    pub documents: Vec<Vec<usize>>,
    /// Column sums of the L2-normalized TF-IDF matrix, aligned with `vocabulary`
    pub scores: Vec<f64>,
}

impl TfidfModel {
    /// Fits the model on cleaned documents.
    ///
    /// Terms are at least two characters, not stop words and longer than
    /// `min_word_length`. The vocabulary keeps the `max_features` most frequent
    /// terms, ties broken alphabetically. Returns `None` if no term survives.
    pub fn fit(docs: &[String], max_features: usize, min_word_length: usize) -> Option<Self> {
        let stop: HashSet<&str> = STOP_WORDS.iter().copied().collect();

        let tokenized: Vec<Vec<&str>> = docs
            .iter()
            .map(|doc| {
                TERM.find_iter(doc)
                    .map(|m| m.as_str())
                    .filter(|t| !stop.contains(t) && t.chars().count() > min_word_length)
                    .collect()
            })
            .collect();

        let mut frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for term in tokenized.iter().flatten() {
            *frequency.entry(*term).or_default() += 1;
        }
        if frequency.is_empty() {
            return None;
        }

        // BTreeMap iteration is alphabetical and the sort is stable
        let mut ranked: Vec<(&str, usize)> = frequency.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(max_features);
        let mut vocabulary: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
        vocabulary.sort();

        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let documents: Vec<Vec<usize>> = tokenized
            .iter()
            .map(|tokens| tokens.iter().filter_map(|t| index.get(t).copied()).collect())
            .collect();

        let scores = column_scores(&documents, vocabulary.len());
        Some(Self {
            vocabulary,
            documents,
            scores,
        })
    }

    /// Terms by descending score, ties alphabetical.
    pub fn ranked_terms(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .vocabulary
            .iter()
            .map(String::as_str)
            .zip(self.scores.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// Smooth IDF, raw term counts, L2-normalized rows, summed per column.
fn column_scores(documents: &[Vec<usize>], vocab_size: usize) -> Vec<f64> {
    let n_docs = documents.len() as f64;

    let mut document_frequency = vec![0usize; vocab_size];
    for doc in documents {
        let unique: HashSet<usize> = doc.iter().copied().collect();
        for term in unique {
            document_frequency[term] += 1;
        }
    }
    let idf: Vec<f64> = document_frequency
        .iter()
        .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
        .collect();

    let mut scores = vec![0.0; vocab_size];
    for doc in documents {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for &term in doc {
            *counts.entry(term).or_default() += 1;
        }
        let weights: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(term, tf)| (term, tf as f64 * idf[term]))
            .collect();
        let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (term, weight) in weights {
                scores[term] += weight / norm;
            }
        }
    }
    scores
}
