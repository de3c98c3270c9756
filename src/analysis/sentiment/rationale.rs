//! Emotion tags and explanations for negative messages.

use serde::Serialize;

use super::lexicon::{
    ANGER_WORDS, COMPLAINT_INDICATORS, DISGUST_WORDS, FEAR_WORDS, JOY_WORDS, SADNESS_WORDS,
    STRONG_NEGATIVE_PHRASES, SURPRISE_WORDS, fold, is_shouted, tokenize,
};
use super::scorer::ValenceScorer;

/// Dominant emotion of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Anger,
    Sadness,
    Fear,
    Disgust,
    Surprise,
}

impl Emotion {
    /// Every emotion; earlier entries win ties.
    pub fn all() -> &'static [Emotion] {
        &[
            Emotion::Joy,
            Emotion::Anger,
            Emotion::Sadness,
            Emotion::Fear,
            Emotion::Disgust,
            Emotion::Surprise,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Anger => "anger",
            Emotion::Sadness => "sadness",
            Emotion::Fear => "fear",
            Emotion::Disgust => "disgust",
            Emotion::Surprise => "surprise",
        }
    }

    fn words(self) -> &'static [&'static str] {
        match self {
            Emotion::Joy => JOY_WORDS,
            Emotion::Anger => ANGER_WORDS,
            Emotion::Sadness => SADNESS_WORDS,
            Emotion::Fear => FEAR_WORDS,
            Emotion::Disgust => DISGUST_WORDS,
            Emotion::Surprise => SURPRISE_WORDS,
        }
    }
}

fn matching_words(words: &[String], emotion: Emotion) -> Vec<&'static str> {
    emotion
        .words()
        .iter()
        .copied()
        .filter(|kw| words.iter().any(|w| w == kw))
        .collect()
}

/// Returns the emotion with the most keyword hits, if any.
pub fn detect_emotion(text: &str) -> Option<Emotion> {
    let words: Vec<String> = tokenize(text).into_iter().map(fold).collect();
    let mut best: Option<(Emotion, usize)> = None;
    for &emotion in Emotion::all() {
        let hits = matching_words(&words, emotion).len();
        if hits > 0 && best.is_none_or(|(_, top)| hits > top) {
            best = Some((emotion, hits));
        }
    }
    best.map(|(emotion, _)| emotion)
}

/// Lists the reasons a message reads as negative.
///
/// Never empty: without any specific indicator the polarity itself is described.
pub fn explain_negative(text: &str, polarity: f64) -> Vec<String> {
    let tokens = tokenize(text);
    let words: Vec<String> = tokens.iter().map(|t| fold(t)).collect();
    let lower = text.to_lowercase();
    let mut reasons = Vec::new();

    for emotion in [Emotion::Anger, Emotion::Sadness, Emotion::Fear, Emotion::Disgust] {
        let hits = matching_words(&words, emotion);
        if !hits.is_empty() {
            reasons.push(format!("Expresses {} ({})", emotion.as_str(), hits.join(", ")));
        }
    }

    let strong: Vec<&str> = STRONG_NEGATIVE_PHRASES
        .iter()
        .copied()
        .filter(|p| lower.contains(p))
        .collect();
    if !strong.is_empty() {
        reasons.push(format!("Strongly negative language ({})", strong.join(", ")));
    }

    let complaints: Vec<&str> = COMPLAINT_INDICATORS
        .iter()
        .copied()
        .filter(|p| lower.contains(p))
        .collect();
    if !complaints.is_empty() {
        reasons.push(format!("Complaint indicators ({})", complaints.join(", ")));
    }

    if let Ok(breakdown) = ValenceScorer.breakdown(text) {
        let share = breakdown.negative * 100.0;
        if breakdown.negative >= 0.5 {
            reasons.push(format!("Mostly negative wording ({share:.0}% of the signal)"));
        } else if breakdown.negative >= 0.25 {
            reasons.push(format!("Notable negative wording ({share:.0}% of the signal)"));
        }
    }

    let exclamations = text.matches('!').count();
    if exclamations >= 2 {
        reasons.push(format!("{exclamations} exclamation marks suggest heightened emotion"));
    }

    let shouted = tokens.iter().filter(|t| is_shouted(t)).count();
    if shouted >= 2 {
        reasons.push(format!("{shouted} words in capitals suggest shouting"));
    }

    if reasons.is_empty() {
        if polarity <= -0.5 {
            reasons.push(format!("Strongly negative overall tone (polarity {polarity:.2})"));
        } else {
            reasons.push(format!("Mildly negative overall tone (polarity {polarity:.2})"));
        }
    }
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_emotion() {
        assert_eq!(detect_emotion("I am so angry and annoyed"), Some(Emotion::Anger));
        assert_eq!(detect_emotion("yay, so happy"), Some(Emotion::Joy));
        assert_eq!(detect_emotion("see you at noon"), None);
        // one hit each; joy comes first
        assert_eq!(detect_emotion("happy but scared"), Some(Emotion::Joy));
    }

    #[test]
    fn test_explain_categories() {
        let reasons = explain_negative("I hate this, still waiting for a refund!!", -0.6);
        let joined = reasons.join("; ");
        assert!(joined.contains("Expresses anger (hate)"));
        assert!(joined.contains("Strongly negative language (hate)"));
        assert!(joined.contains("Complaint indicators (still waiting, refund)"));
        assert!(joined.contains("2 exclamation marks"));
        assert!(!joined.contains("overall tone"));
    }

    #[test]
    fn test_explain_caps() {
        let reasons = explain_negative("WHY IS this late", -0.2);
        assert!(reasons.iter().any(|r| r == "2 words in capitals suggest shouting"));
    }

    #[test]
    fn test_explain_fallback() {
        assert_eq!(
            explain_negative("meh", -0.15),
            vec!["Mildly negative overall tone (polarity -0.15)".to_string()]
        );
        assert_eq!(
            explain_negative("meh", -0.8),
            vec!["Strongly negative overall tone (polarity -0.80)".to_string()]
        );
    }
}
