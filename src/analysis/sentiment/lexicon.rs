//! Word lists used by the scorers and the negative-message explanations.
//!
//! Valences are on a -4..=4 scale. Lookups expect lowercase words with
//! straight apostrophes.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

#[rustfmt::skip]
const VALENCE_ENTRIES: &[(&str, f64)] = &[
    // positive
    ("good", 1.9), ("great", 3.1), ("excellent", 2.7), ("amazing", 2.8), ("wonderful", 2.7),
    ("fantastic", 2.6), ("love", 3.2), ("loved", 2.9), ("lovely", 2.8), ("like", 1.5),
    ("happy", 2.7), ("pleased", 1.9), ("satisfied", 1.8), ("perfect", 2.7), ("awesome", 3.1),
    ("brilliant", 2.8), ("outstanding", 3.0), ("superb", 3.1), ("delighted", 2.9),
    ("thrilled", 2.8), ("excited", 2.2), ("exciting", 2.2), ("grateful", 2.0), ("blessed", 2.0),
    ("yay", 2.4), ("hooray", 2.3), ("nice", 1.8), ("thanks", 1.9), ("thank", 1.5),
    ("fine", 0.8), ("best", 3.2), ("better", 1.9), ("cool", 1.3), ("fun", 2.3), ("glad", 2.0),
    ("congrats", 2.4), ("congratulations", 2.9), ("beautiful", 2.9), ("enjoy", 2.2),
    ("enjoyed", 2.3), ("welcome", 2.0), ("win", 2.8), ("won", 2.7), ("success", 2.7),
    ("successful", 2.8), ("helpful", 1.8), ("kind", 2.4), ("smile", 1.5), ("laugh", 2.6),
    ("haha", 1.6), ("lol", 1.8), ("hope", 1.9), ("proud", 2.1), ("agree", 1.5), ("yes", 1.7),
    ("ok", 0.9), ("okay", 0.9), ("sure", 1.3), ("wow", 2.8), ("safe", 1.9), ("calm", 1.3),
    ("easy", 1.9), ("strong", 2.3), ("support", 1.7), ("care", 2.2), ("friendly", 2.2),
    ("celebrate", 2.7), ("impressive", 2.3), ("incredible", 1.7), ("positive", 2.6),
    ("delicious", 2.7), ("sweet", 2.0), ("cute", 2.0), ("peace", 2.5), ("joy", 2.8),
    ("appreciate", 1.7), ("glorious", 2.6), ("recommend", 1.5), ("favorite", 2.0),
    // negative
    ("sad", -2.1), ("bad", -2.5), ("terrible", -2.1), ("awful", -2.0), ("horrible", -2.5),
    ("hate", -2.7), ("hated", -3.2), ("dislike", -1.6), ("angry", -2.3), ("disappointed", -1.9),
    ("disappointing", -2.2), ("frustrated", -2.4), ("frustrating", -1.9), ("upset", -1.6),
    ("annoyed", -1.6), ("annoying", -1.8), ("furious", -2.7), ("disgusted", -2.4),
    ("disgusting", -2.4), ("worried", -1.2), ("concerned", -0.7), ("confused", -1.3),
    ("devastated", -3.1), ("miserable", -2.2), ("depressed", -2.3), ("anxious", -1.0),
    ("stressed", -1.4), ("worst", -3.1), ("worse", -2.1), ("wrong", -2.1), ("fail", -2.5),
    ("failed", -2.3), ("failure", -2.3), ("problem", -1.7), ("problems", -1.7), ("issue", -0.8),
    ("broken", -1.0), ("sorry", -0.3), ("stupid", -2.4), ("useless", -1.8), ("pathetic", -2.7),
    ("ugly", -2.1), ("sick", -2.0), ("pain", -2.3), ("hurt", -2.4), ("cry", -2.1),
    ("crying", -2.1), ("scared", -2.2), ("afraid", -2.0), ("fear", -2.2), ("terrified", -3.0),
    ("lonely", -1.8), ("lost", -1.3), ("poor", -2.1), ("boring", -1.3), ("bored", -1.1),
    ("tired", -1.9), ("mad", -2.2), ("rude", -2.0), ("unfair", -2.1), ("unacceptable", -2.0),
    ("ridiculous", -2.0), ("damn", -1.7), ("shit", -2.6), ("crap", -1.6), ("sucks", -1.5),
    ("kill", -3.7), ("dead", -3.3), ("die", -2.9), ("died", -2.6), ("death", -2.9),
    ("danger", -2.4), ("disaster", -3.1), ("shame", -2.1), ("guilty", -1.8), ("regret", -1.8),
    ("complain", -1.5), ("complaint", -1.2), ("delay", -1.3), ("nasty", -2.6), ("gross", -2.1),
    ("sadly", -1.9), ("unfortunately", -1.6), ("hopeless", -2.0), ("rubbish", -1.8),
    ("waste", -1.8), ("mess", -1.5), ("nervous", -1.1), ("panic", -2.3), ("ashamed", -2.1),
    ("jealous", -2.0), ("shocked", -1.3), ("horrified", -2.5), ("cruel", -2.8), ("evil", -3.4),
    ("idiot", -2.3), ("heartbroken", -3.0), ("outraged", -2.9), ("irritated", -2.0),
];

/// Word valences on a -4..=4 scale.
pub static VALENCE: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| VALENCE_ENTRIES.iter().copied().collect());

/// Intensity modifiers and their signed increment.
#[rustfmt::skip]
const BOOSTER_ENTRIES: &[(&str, f64)] = &[
    ("absolutely", 0.293), ("amazingly", 0.293), ("awfully", 0.293), ("completely", 0.293),
    ("considerably", 0.293), ("deeply", 0.293), ("enormously", 0.293), ("entirely", 0.293),
    ("especially", 0.293), ("exceptionally", 0.293), ("extremely", 0.293), ("fully", 0.293),
    ("greatly", 0.293), ("highly", 0.293), ("hugely", 0.293), ("incredibly", 0.293),
    ("intensely", 0.293), ("really", 0.293), ("remarkably", 0.293), ("so", 0.293),
    ("substantially", 0.293), ("thoroughly", 0.293), ("totally", 0.293), ("tremendously", 0.293),
    ("truly", 0.293), ("unbelievably", 0.293), ("very", 0.293), ("super", 0.293),
    ("particularly", 0.293), ("quite", 0.293),
    ("almost", -0.293), ("barely", -0.293), ("hardly", -0.293), ("less", -0.293),
    ("little", -0.293), ("marginally", -0.293), ("occasionally", -0.293), ("partly", -0.293),
    ("scarcely", -0.293), ("slightly", -0.293), ("somewhat", -0.293),
];

pub static BOOSTERS: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| BOOSTER_ENTRIES.iter().copied().collect());

#[rustfmt::skip]
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "nowhere", "cannot",
    "without", "dont", "cant", "wont", "isnt", "didnt", "doesnt", "aint",
];

/// Returns `true` for a negating word, including any `n't` contraction.
pub fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.ends_with("n't")
}

/// Keywords reported under `emotional_keywords.positive`.
pub const POSITIVE_KEYWORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "wonderful", "fantastic", "love", "like", "happy",
    "pleased", "satisfied", "perfect", "awesome", "brilliant", "outstanding", "superb",
    "delighted", "thrilled", "excited", "grateful", "blessed", "yay", "hooray",
];

/// Keywords reported under `emotional_keywords.negative`.
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "hate", "dislike", "angry", "sad", "disappointed",
    "frustrated", "upset", "annoyed", "furious", "disgusted", "worried", "concerned", "confused",
    "devastated", "miserable", "depressed", "anxious", "stressed",
];

pub const JOY_WORDS: &[&str] = &[
    "happy", "glad", "excited", "delighted", "love", "joy", "great", "awesome", "yay", "thrilled",
    "haha", "lol",
];

pub const ANGER_WORDS: &[&str] = &[
    "angry", "furious", "mad", "rage", "annoyed", "irritated", "frustrated", "pissed", "livid",
    "outraged", "hate",
];

pub const SADNESS_WORDS: &[&str] = &[
    "sad", "unhappy", "depressed", "miserable", "heartbroken", "upset", "disappointed", "cry",
    "crying", "lonely", "devastated",
];

pub const FEAR_WORDS: &[&str] = &[
    "afraid", "scared", "worried", "anxious", "nervous", "terrified", "panic", "fear",
    "frightened",
];

pub const DISGUST_WORDS: &[&str] = &[
    "disgusted", "disgusting", "gross", "nasty", "revolting", "yuck", "sick",
];

pub const SURPRISE_WORDS: &[&str] = &["wow", "surprised", "shocked", "unexpected", "omg"];

/// Phrases matched as substrings of the lowercased text.
pub const STRONG_NEGATIVE_PHRASES: &[&str] = &[
    "hate", "worst", "terrible", "awful", "disgusting", "pathetic", "useless", "stupid",
    "shut up", "never again", "sick of", "fed up", "waste of time",
];

/// Phrases matched as substrings of the lowercased text.
pub const COMPLAINT_INDICATORS: &[&str] = &[
    "not working", "doesn't work", "broken", "still waiting", "complain", "refund",
    "unacceptable", "problem", "issue", "delay", "no response", "why is",
];

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['\u{2019}][\p{L}]+)*").expect("token pattern is a valid regex")
});

/// Splits text into words, keeping case and inner apostrophes.
pub fn tokenize(text: &str) -> Vec<&str> {
    TOKEN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Lowercases a token and straightens curly apostrophes.
pub fn fold(token: &str) -> String {
    token.to_lowercase().replace('\u{2019}', "'")
}

/// Returns `true` for an all-uppercase word of at least two letters.
pub fn is_shouted(token: &str) -> bool {
    token.chars().filter(|c| c.is_alphabetic()).count() >= 2
        && token.chars().all(|c| !c.is_alphabetic() || c.is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("I don't LIKE it!!"), vec!["I", "don't", "LIKE", "it"]);
        assert_eq!(tokenize("caf\u{e9} \u{2014} ok"), vec!["caf\u{e9}", "ok"]);
        assert!(tokenize("!!! ...").is_empty());
    }

    #[test]
    fn test_negation() {
        assert!(is_negation("not"));
        assert!(is_negation("isn't"));
        assert!(is_negation(&fold("Didn\u{2019}t")));
        assert!(!is_negation("note"));
    }

    #[test]
    fn test_shouted() {
        assert!(is_shouted("STOP"));
        assert!(is_shouted("WHY'D"));
        assert!(!is_shouted("I"));
        assert!(!is_shouted("Stop"));
        assert!(!is_shouted("42"));
    }

    #[test]
    fn test_lexicon_keys_are_folded() {
        for word in VALENCE.keys().chain(BOOSTERS.keys()) {
            assert_eq!(*word, fold(word));
        }
    }
}
