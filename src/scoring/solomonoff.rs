// Solomonoff-style rule scores.
//
// A rule's weight is its normalized prior divided by its complexity, so a
// structurally larger predicate contributes less than a small one that
// passes just as often. How the per-pair outcomes fold into a single
// number is selectable.

use serde::{Deserialize, Serialize};

use crate::core::{ClassifyError, Result};

pub const DEFAULT_PENALTY: f64 = 0.01;
pub const DEFAULT_EPSILON: f64 = 1e-9;
pub const DEFAULT_COMPLEXITY_SCALE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Aggregation {
    /// Product over pairs: `prior / complexity` on a pass, `penalty` on a fail.
    Multiplicative { penalty: f64 },
    /// Log-domain cost `-sum(ln(prior / complexity + epsilon))` over passing
    /// pairs, scored as the code length it saves against the epsilon floor.
    /// Failing pairs add nothing.
    LogDomain { epsilon: f64 },
    /// `prior * 2^(-complexity / scale)` when every pair passes, else 0.
    AllPass { scale: f64 },
}

impl Default for Aggregation {
    fn default() -> Self {
        Aggregation::Multiplicative { penalty: DEFAULT_PENALTY }
    }
}

impl Aggregation {
    pub fn validate(&self) -> Result<()> {
        match *self {
            Aggregation::Multiplicative { penalty } if !(penalty > 0.0 && penalty < 1.0) => Err(
                ClassifyError::InvalidConfig(format!("penalty must lie in (0, 1), got {}", penalty)),
            ),
            Aggregation::LogDomain { epsilon } if !(epsilon > 0.0 && epsilon.is_finite()) => Err(
                ClassifyError::InvalidConfig(format!("epsilon must be positive, got {}", epsilon)),
            ),
            Aggregation::AllPass { scale } if !(scale > 0.0 && scale.is_finite()) => Err(
                ClassifyError::InvalidConfig(format!("complexity scale must be positive, got {}", scale)),
            ),
            _ => Ok(()),
        }
    }

    /// Fold one rule's per-pair outcomes into its score.
    ///
    /// An empty outcome list and a zero prior both score exactly 0.
    pub fn rule_score(&self, passes: &[bool], prior: f64, complexity: u32) -> f64 {
        if passes.is_empty() || prior <= 0.0 || complexity == 0 {
            return 0.0;
        }
        let ratio = prior / complexity as f64;
        match *self {
            Aggregation::Multiplicative { penalty } => passes
                .iter()
                .fold(1.0, |acc, &passed| acc * if passed { ratio } else { penalty }),
            Aggregation::LogDomain { epsilon } => {
                let hits = passes.iter().filter(|&&passed| passed).count();
                hits as f64 * -epsilon.ln() - log_cost(passes, ratio, epsilon)
            }
            Aggregation::AllPass { scale } => {
                if passes.iter().all(|&passed| passed) {
                    prior * 2f64.powf(-(complexity as f64) / scale)
                } else {
                    0.0
                }
            }
        }
    }
}

/// `-sum(ln(ratio + epsilon))` over passing pairs. Grows as rules get more
/// complex, so it is a cost: lower is better.
pub fn log_cost(passes: &[bool], ratio: f64, epsilon: f64) -> f64 {
    passes
        .iter()
        .filter(|&&passed| passed)
        .map(|_| -(ratio + epsilon).ln())
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Raw category sums.
    None,
    /// Divide each category sum by its rule count.
    RuleCount,
    /// `exp(s - max) / sum(exp(s_j - max))` across categories.
    #[default]
    Softmax,
}

impl Normalization {
    pub fn apply(&self, raw: &[f64], rule_counts: &[usize]) -> Vec<f64> {
        match self {
            Normalization::None => raw.to_vec(),
            Normalization::RuleCount => raw
                .iter()
                .zip(rule_counts)
                .map(|(&s, &n)| if n == 0 { 0.0 } else { s / n as f64 })
                .collect(),
            Normalization::Softmax => softmax(raw),
        }
    }
}

pub fn softmax(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() { return Vec::new(); }
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|&s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.iter().map(|&e| e / total).collect()
}
