//! Latent Dirichlet allocation by collapsed Gibbs sampling.
//!
//! Priors are symmetric with `alpha = beta = 1 / n_topics`. The sampler is
//! driven by a seeded [`StdRng`], so a fit is reproducible for a given seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Terms reported per topic.
pub const TOP_TERMS: usize = 5;

/// A fitted topic.
#[derive(Debug, Clone, PartialEq)]
pub struct LdaTopic {
    /// Vocabulary indices, most strongly associated first
    pub terms: Vec<usize>,
    /// Pseudo-count mass of the topic: assigned tokens plus the prior
    pub weight: f64,
}

/// Collapsed Gibbs sampler.
#[derive(Debug, Clone, Copy)]
pub struct GibbsLda {
    n_topics: usize,
    iterations: usize,
    seed: u64,
}

impl GibbsLda {
    pub fn new(n_topics: usize, iterations: usize, seed: u64) -> Self {
        Self {
            n_topics,
            iterations,
            seed,
        }
    }

    /// Fits topics to documents given as vocabulary indices.
    ///
    /// Topics that end up with no tokens are not returned.
    pub fn fit(&self, documents: &[Vec<usize>], vocab_size: usize) -> Vec<LdaTopic> {
        let k = self.n_topics;
        if k == 0 || vocab_size == 0 {
            return Vec::new();
        }

        let alpha = 1.0 / k as f64;
        let beta = 1.0 / k as f64;
        let v_beta = vocab_size as f64 * beta;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut doc_topic = vec![vec![0usize; k]; documents.len()];
        let mut topic_term = vec![vec![0usize; vocab_size]; k];
        let mut topic_total = vec![0usize; k];
        let mut assignments: Vec<Vec<usize>> = Vec::with_capacity(documents.len());

        for (d, doc) in documents.iter().enumerate() {
            let mut z_doc = Vec::with_capacity(doc.len());
            for &w in doc {
                let z = rng.gen_range(0..k);
                doc_topic[d][z] += 1;
                topic_term[z][w] += 1;
                topic_total[z] += 1;
                z_doc.push(z);
            }
            assignments.push(z_doc);
        }

        let mut weights = vec![0.0; k];
        for _ in 0..self.iterations {
            for (d, doc) in documents.iter().enumerate() {
                for (i, &w) in doc.iter().enumerate() {
                    let old = assignments[d][i];
                    doc_topic[d][old] -= 1;
                    topic_term[old][w] -= 1;
                    topic_total[old] -= 1;

                    for (t, weight) in weights.iter_mut().enumerate() {
                        *weight = (doc_topic[d][t] as f64 + alpha)
                            * (topic_term[t][w] as f64 + beta)
                            / (topic_total[t] as f64 + v_beta);
                    }
                    let new = sample(&weights, &mut rng);

                    doc_topic[d][new] += 1;
                    topic_term[new][w] += 1;
                    topic_total[new] += 1;
                    assignments[d][i] = new;
                }
            }
        }

        topic_term
            .iter()
            .zip(&topic_total)
            .filter(|(_, total)| **total > 0)
            .map(|(counts, &total)| {
                let mut terms: Vec<usize> = (0..vocab_size).filter(|&w| counts[w] > 0).collect();
                // stable: equal counts keep vocabulary order
                terms.sort_by(|a, b| counts[*b].cmp(&counts[*a]));
                terms.truncate(TOP_TERMS);
                LdaTopic {
                    terms,
                    weight: total as f64 + v_beta,
                }
            })
            .collect()
    }
}

fn sample(weights: &[f64], rng: &mut StdRng) -> usize {
    let total: f64 = weights.iter().sum();
    let mut remaining = rng.r#gen::<f64>() * total;
    for (t, &weight) in weights.iter().enumerate() {
        if remaining < weight {
            return t;
        }
        remaining -= weight;
    }
    weights.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Vec<usize>> {
        let mut docs = Vec::new();
        for _ in 0..10 {
            docs.push(vec![0, 1, 2, 0, 1]);
            docs.push(vec![3, 4, 5, 3, 4]);
        }
        docs
    }

    #[test]
    fn test_deterministic_for_seed() {
        let docs = corpus();
        let a = GibbsLda::new(2, 50, 42).fit(&docs, 6);
        let b = GibbsLda::new(2, 50, 42).fit(&docs, 6);
        assert_eq!(a, b);
    }

    #[test]
    fn test_token_mass_is_conserved() {
        let docs = corpus();
        let topics = GibbsLda::new(3, 20, 7).fit(&docs, 6);
        let tokens: usize = docs.iter().map(Vec::len).sum();
        let prior = 6.0 / 3.0;
        let assigned: f64 = topics.iter().map(|t| t.weight - prior).sum();
        assert!((assigned - tokens as f64).abs() < 1e-9);
    }

    #[test]
    fn test_terms_are_bounded() {
        let topics = GibbsLda::new(2, 10, 1).fit(&corpus(), 6);
        assert!(!topics.is_empty());
        for topic in topics {
            assert!(!topic.terms.is_empty());
            assert!(topic.terms.len() <= TOP_TERMS);
            assert!(topic.terms.iter().all(|&w| w < 6));
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(GibbsLda::new(0, 10, 1).fit(&corpus(), 6).is_empty());
        assert!(GibbsLda::new(2, 10, 1).fit(&[], 0).is_empty());
        assert!(GibbsLda::new(2, 10, 1).fit(&[vec![]], 3).is_empty());
    }
}
