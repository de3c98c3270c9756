//! Polarity scorers.
//!
//! Two lexicon-based scorers look at the same words differently:
//!
//! - [`PatternScorer`] averages the polarity of every sentiment-bearing word,
//!   so long neutral stretches do not dilute the score
//! - [`ValenceScorer`] sums valences with negation, intensity, capitalization,
//!   contrast (`but`) and punctuation adjustments, then squashes the sum into
//!   -1..=1
//!
//! [`BlendedScorer`] combines them with fixed weights.

use thiserror::Error;

use super::lexicon::{BOOSTERS, VALENCE, fold, is_negation, is_shouted, tokenize};

/// Why a message could not be scored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// The text has no words to score
    #[error("no scorable words")]
    EmptyText,

    /// A scorer produced NaN or infinity
    #[error("{scorer} produced a non-finite score")]
    NonFinite { scorer: &'static str },
}

/// Maps text to a polarity in -1..=1.
pub trait PolarityScorer {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Scores `text`.
    fn score(&self, text: &str) -> Result<f64, ScoreError>;
}

fn finite(scorer: &'static str, value: f64) -> Result<f64, ScoreError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScoreError::NonFinite { scorer })
    }
}

/// Averaged-lexicon scorer.
///
/// Each known word contributes `valence / 4`. A preceding intensifier scales
/// it by 1.3 (or 0.7 for a dampener); a negation within the two previous
/// words flips it at half strength.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternScorer;

impl PolarityScorer for PatternScorer {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn score(&self, text: &str) -> Result<f64, ScoreError> {
        let words: Vec<String> = tokenize(text).into_iter().map(fold).collect();
        if words.is_empty() {
            return Err(ScoreError::EmptyText);
        }

        let mut polarities = Vec::new();
        for (i, word) in words.iter().enumerate() {
            let Some(&valence) = VALENCE.get(word.as_str()) else {
                continue;
            };
            let mut polarity = valence / 4.0;

            if let Some(prev) = i.checked_sub(1).map(|j| words[j].as_str()) {
                if let Some(&boost) = BOOSTERS.get(prev) {
                    polarity *= if boost > 0.0 { 1.3 } else { 0.7 };
                }
            }
            if words[i.saturating_sub(2)..i].iter().any(|w| is_negation(w)) {
                polarity *= -0.5;
            }
            polarities.push(polarity);
        }

        if polarities.is_empty() {
            return Ok(0.0);
        }
        let mean = polarities.iter().sum::<f64>() / polarities.len() as f64;
        finite(self.name(), mean.clamp(-1.0, 1.0))
    }
}

const NEGATION_SCALAR: f64 = -0.74;
const CAPS_INCREMENT: f64 = 0.733;
const NORMALIZATION_ALPHA: f64 = 15.0;

/// Proportions of positive, negative and neutral signal, plus the compound score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValenceBreakdown {
    pub compound: f64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

/// Compound-valence scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValenceScorer;

impl ValenceScorer {
    /// Scores `text` and reports the signal proportions.
    pub fn breakdown(&self, text: &str) -> Result<ValenceBreakdown, ScoreError> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Err(ScoreError::EmptyText);
        }
        let words: Vec<String> = tokens.iter().map(|t| fold(t)).collect();

        // emphasis only counts when the text is not shouted throughout
        let shouted = tokens.iter().filter(|t| is_shouted(t)).count();
        let caps_differential = shouted > 0 && shouted < tokens.len();

        let mut valences: Vec<f64> = words
            .iter()
            .enumerate()
            .map(|(i, word)| {
                let Some(&base) = VALENCE.get(word.as_str()) else {
                    return 0.0;
                };
                let sign = base.signum();
                let mut valence = base;

                if caps_differential && is_shouted(tokens[i]) {
                    valence += sign * CAPS_INCREMENT;
                }
                for (distance, decay) in [(1, 1.0), (2, 0.95), (3, 0.9)] {
                    let Some(j) = i.checked_sub(distance) else {
                        break;
                    };
                    if let Some(&boost) = BOOSTERS.get(words[j].as_str()) {
                        valence += sign * boost * decay;
                    }
                }
                if words[i.saturating_sub(3)..i].iter().any(|w| is_negation(w)) {
                    valence *= NEGATION_SCALAR;
                }
                valence
            })
            .collect();

        if let Some(pivot) = words.iter().position(|w| w == "but") {
            for (i, valence) in valences.iter_mut().enumerate() {
                if i < pivot {
                    *valence *= 0.5;
                } else if i > pivot {
                    *valence *= 1.5;
                }
            }
        }

        let emphasis = punctuation_emphasis(text);
        let mut sum: f64 = valences.iter().sum();
        if sum > 0.0 {
            sum += emphasis;
        } else if sum < 0.0 {
            sum -= emphasis;
        }
        let compound = (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0);

        let mut positive: f64 = valences.iter().filter(|v| **v > 0.0).map(|v| v + 1.0).sum();
        let mut negative: f64 = valences.iter().filter(|v| **v < 0.0).map(|v| v - 1.0).sum();
        let neutral = valences.iter().filter(|v| **v == 0.0).count() as f64;
        if positive > negative.abs() {
            positive += emphasis;
        } else if positive < negative.abs() {
            negative -= emphasis;
        }
        let total = positive + negative.abs() + neutral;

        Ok(ValenceBreakdown {
            compound: finite(self.name(), compound)?,
            positive: finite(self.name(), positive / total)?,
            negative: finite(self.name(), negative.abs() / total)?,
            neutral: finite(self.name(), neutral / total)?,
        })
    }
}

impl PolarityScorer for ValenceScorer {
    fn name(&self) -> &'static str {
        "valence"
    }

    fn score(&self, text: &str) -> Result<f64, ScoreError> {
        self.breakdown(text).map(|b| b.compound)
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64 * 0.292;
    let questions = match text.matches('?').count() {
        0 | 1 => 0.0,
        n @ 2..=3 => n as f64 * 0.18,
        _ => 0.96,
    };
    exclamations + questions
}

/// Weighted combination of two scorers.
#[derive(Debug, Clone, Copy)]
pub struct BlendedScorer<A, B> {
    primary: A,
    secondary: B,
    primary_weight: f64,
    secondary_weight: f64,
}

impl<A, B> BlendedScorer<A, B> {
    pub fn new(primary: A, secondary: B, primary_weight: f64, secondary_weight: f64) -> Self {
        Self {
            primary,
            secondary,
            primary_weight,
            secondary_weight,
        }
    }
}

impl Default for BlendedScorer<PatternScorer, ValenceScorer> {
    fn default() -> Self {
        Self::new(PatternScorer, ValenceScorer, 0.6, 0.4)
    }
}

impl<A: PolarityScorer, B: PolarityScorer> PolarityScorer for BlendedScorer<A, B> {
    fn name(&self) -> &'static str {
        "blended"
    }

    fn score(&self, text: &str) -> Result<f64, ScoreError> {
        let a = self.primary.score(text)?;
        let b = self.secondary.score(text)?;
        finite(
            self.name(),
            self.primary_weight * a + self.secondary_weight * b,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_averages() {
        let score = PatternScorer.score("good and bad").unwrap();
        assert!((score - (1.9 - 2.5) / 8.0).abs() < 1e-9);
        assert_eq!(PatternScorer.score("the meeting is at noon").unwrap(), 0.0);
    }

    #[test]
    fn test_pattern_modifiers() {
        let plain = PatternScorer.score("good").unwrap();
        let boosted = PatternScorer.score("very good").unwrap();
        let negated = PatternScorer.score("not good").unwrap();
        assert!(boosted > plain);
        assert!(negated < 0.0);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(PatternScorer.score(""), Err(ScoreError::EmptyText));
        assert_eq!(ValenceScorer.score("!!!"), Err(ScoreError::EmptyText));
        assert!(BlendedScorer::default().score("\u{1F600}").is_err());
    }

    #[test]
    fn test_valence_signs() {
        assert!(ValenceScorer.score("I love this, it is great").unwrap() > 0.5);
        assert!(ValenceScorer.score("This is terrible and I hate it").unwrap() < -0.5);
        assert_eq!(ValenceScorer.score("see you at noon").unwrap(), 0.0);
    }

    #[test]
    fn test_valence_heuristics() {
        let plain = ValenceScorer.score("this is good").unwrap();
        assert!(ValenceScorer.score("this is GOOD").unwrap() > plain);
        assert!(ValenceScorer.score("this is good!!").unwrap() > plain);
        assert!(ValenceScorer.score("this is extremely good").unwrap() > plain);
        assert!(ValenceScorer.score("this isn't good").unwrap() < 0.0);
        // the clause after "but" dominates
        assert!(ValenceScorer.score("the food was good but the service was terrible").unwrap() < 0.0);
    }

    #[test]
    fn test_breakdown_proportions() {
        let b = ValenceScorer.breakdown("I hate this awful day").unwrap();
        assert!((b.positive + b.negative + b.neutral - 1.0).abs() < 1e-9);
        assert!(b.negative > 0.5);
        assert_eq!(b.positive, 0.0);
    }

    #[test]
    fn test_blend_weights() {
        let text = "good morning";
        let expected =
            0.6 * PatternScorer.score(text).unwrap() + 0.4 * ValenceScorer.score(text).unwrap();
        let blended = BlendedScorer::default().score(text).unwrap();
        assert!((blended - expected).abs() < 1e-12);
    }
}
