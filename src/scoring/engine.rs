// Task classification.
//
// For each training pair the object sets are extracted lazily, once per
// distinct extraction config, and shared by every rule that asks for that
// config. Rules are then folded per category, category sums normalized and
// the argmax taken in `Category::ALL` order.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ScoringConfig;
use crate::core::{Category, Result};
use crate::perception::grid::{ArcTask, Grid};
use crate::perception::objects::{extract_objects, ExtractConfig, ObjectSet};
use crate::rules::{standard_rules, CategoryRules, Rule, RuleSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleOutcome {
    pub name: &'static str,
    pub prior: f64,
    pub complexity: u32,
    /// One entry per training pair, in task order.
    pub passes: Vec<bool>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTrace {
    pub category: Category,
    pub raw_score: f64,
    pub rules: Vec<RuleOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub task_id: String,
    /// Category sums before normalization.
    pub raw: BTreeMap<Category, f64>,
    pub scores: BTreeMap<Category, f64>,
    pub predicted: Category,
}

impl Classification {
    pub fn score(&self, category: Category) -> f64 {
        self.scores.get(&category).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub classification: Classification,
    pub categories: Vec<CategoryTrace>,
}

struct PairContext<'t> {
    input: &'t Grid,
    output: &'t Grid,
    objects: FxHashMap<ExtractConfig, Option<(ObjectSet, ObjectSet)>>,
}

impl<'t> PairContext<'t> {
    fn new(input: &'t Grid, output: &'t Grid) -> Self {
        Self { input, output, objects: FxHashMap::default() }
    }

    fn evaluate(&mut self, rule: &Rule, default: ExtractConfig) -> bool {
        let config = rule.extraction.unwrap_or(default);
        let (input, output) = (self.input, self.output);
        let sets = self
            .objects
            .entry(config)
            .or_insert_with(|| extract_pair(input, output, config));
        match sets.as_ref() {
            Some((io, oo)) => rule.evaluate(input, output, Some(io), Some(oo)),
            None => rule.evaluate(input, output, None, None),
        }
    }
}

fn extract_pair(input: &Grid, output: &Grid, config: ExtractConfig) -> Option<(ObjectSet, ObjectSet)> {
    let extracted = extract_objects(input, config)
        .and_then(|io| Ok((io, extract_objects(output, config)?)));
    match extracted {
        Ok(sets) => Some(sets),
        Err(err) => {
            warn!(%err, ?config, "object extraction failed, rules see no objects for this pair");
            None
        }
    }
}

fn pair_contexts(task: &ArcTask) -> Vec<PairContext<'_>> {
    task.train_pairs().map(|(i, o)| PairContext::new(i, o)).collect()
}

fn score_category(pairs: &mut [PairContext<'_>], rules: &CategoryRules, config: &ScoringConfig) -> CategoryTrace {
    let mut outcomes = Vec::with_capacity(rules.len());
    let mut raw_score = 0.0;
    for rule in rules.rules() {
        let passes: Vec<bool> = pairs.iter_mut().map(|p| p.evaluate(rule, config.extraction)).collect();
        let score = config.aggregation.rule_score(&passes, rule.prior, rule.complexity);
        debug!(category = %rules.category, rule = rule.name, ?passes, score, "rule evaluated");
        raw_score += score;
        outcomes.push(RuleOutcome {
            name: rule.name,
            prior: rule.prior,
            complexity: rule.complexity,
            passes,
            score,
        });
    }
    CategoryTrace { category: rules.category, raw_score, rules: outcomes }
}

/// Raw score of one category over the task's training pairs.
///
/// A task without training pairs scores 0.
pub fn evaluate_category(task: &ArcTask, rules: &CategoryRules, config: &ScoringConfig) -> f64 {
    let mut pairs = pair_contexts(task);
    score_category(&mut pairs, rules, config).raw_score
}

// First maximum wins, so ties go to the earliest category.
fn argmax(scores: &[f64]) -> Category {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate().skip(1) {
        if s > scores[best] {
            best = i;
        }
    }
    Category::ALL[best]
}

#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleSet,
    config: ScoringConfig,
}

impl Classifier {
    pub fn new(rules: RuleSet, config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { rules, config })
    }

    /// The built-in rule table with the given config.
    pub fn with_config(config: ScoringConfig) -> Result<Self> {
        Self::new(standard_rules()?, config)
    }

    pub fn standard() -> Result<Self> {
        Self::with_config(ScoringConfig::default())
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn classify(&self, task: &ArcTask) -> Classification {
        self.explain(task).classification
    }

    /// Classification plus every rule's per-pair outcome.
    pub fn explain(&self, task: &ArcTask) -> Explanation {
        let mut pairs = pair_contexts(task);
        let categories: Vec<CategoryTrace> = Category::ALL
            .iter()
            .map(|&category| match self.rules.get(category) {
                Some(rules) => score_category(&mut pairs, rules, &self.config),
                None => CategoryTrace { category, raw_score: 0.0, rules: Vec::new() },
            })
            .collect();

        let raw: Vec<f64> = categories.iter().map(|t| t.raw_score).collect();
        let counts: Vec<usize> = categories.iter().map(|t| t.rules.len()).collect();
        let normalized = if pairs.is_empty() {
            raw.clone()
        } else {
            self.config.normalization.apply(&raw, &counts)
        };
        let predicted = argmax(&normalized);

        let classification = Classification {
            task_id: task.id.clone(),
            raw: Category::ALL.iter().copied().zip(raw).collect(),
            scores: Category::ALL.iter().copied().zip(normalized).collect(),
            predicted,
        };
        Explanation { classification, categories }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::solomonoff::{Aggregation, Normalization};

    fn single_object(_: &Grid, _: &Grid, io: Option<&ObjectSet>, _: Option<&ObjectSet>) -> bool {
        io.is_some_and(|o| o.len() == 1)
    }

    fn two_objects(_: &Grid, _: &Grid, io: Option<&ObjectSet>, _: Option<&ObjectSet>) -> bool {
        io.is_some_and(|o| o.len() == 2)
    }

    fn grids_differ(inp: &Grid, out: &Grid, _: Option<&ObjectSet>, _: Option<&ObjectSet>) -> bool {
        inp != out
    }

    fn raw_config() -> ScoringConfig {
        ScoringConfig { normalization: Normalization::None, ..ScoringConfig::default() }
    }

    fn diagonal_task() -> ArcTask {
        let g = vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 0]];
        ArcTask::from_pairs("diag", vec![(g.clone(), g)])
    }

    #[test]
    fn per_rule_extraction_override() {
        let rules = RuleSet::builder()
            .category(
                Category::Object,
                vec![
                    Rule::new("eight", single_object, 1.0, 1),
                    Rule::new("four", two_objects, 1.0, 1)
                        .with_extraction(ExtractConfig::new(true, false, true)),
                ],
            )
            .build()
            .unwrap();
        let clf = Classifier::new(rules, raw_config()).unwrap();
        let explained = clf.explain(&diagonal_task());
        let object = &explained.categories[Category::Object.index()];
        assert!(object.rules.iter().all(|r| r.passes == vec![true]));
    }

    #[test]
    fn multiplicative_category_sum() {
        let rules = RuleSet::builder()
            .category(
                Category::Number,
                vec![Rule::new("differ", grids_differ, 1.0, 2), Rule::new("one", single_object, 1.0, 4)],
            )
            .build()
            .unwrap();
        let task = ArcTask::from_pairs(
            "t",
            vec![
                (vec![vec![1, 0], vec![0, 0]], vec![vec![2, 0], vec![0, 0]]),
                (vec![vec![1, 0], vec![0, 0]], vec![vec![1, 0], vec![0, 0]]),
            ],
        );
        // differ: 0.25 * 0.01; one: 0.125 * 0.125
        let raw = evaluate_category(&task, &rules.categories()[0], &raw_config());
        assert!((raw - (0.0025 + 0.015625)).abs() < 1e-12);
    }

    #[test]
    fn empty_task_scores_zero_everywhere() {
        let clf = Classifier::standard().unwrap();
        let result = clf.classify(&ArcTask::from_pairs("empty", Vec::new()));
        assert!(result.scores.values().all(|&s| s == 0.0));
        assert_eq!(result.predicted, Category::Colour);
    }

    #[test]
    fn missing_categories_score_zero() {
        let rules = RuleSet::builder()
            .category(Category::Movement, vec![Rule::new("differ", grids_differ, 1.0, 1)])
            .build()
            .unwrap();
        let clf = Classifier::new(rules, raw_config()).unwrap();
        let task = ArcTask::from_pairs("t", vec![(vec![vec![1]], vec![vec![2]])]);
        let result = clf.classify(&task);
        assert_eq!(result.predicted, Category::Movement);
        assert_eq!(result.score(Category::Colour), 0.0);
        assert!((result.score(Category::Movement) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn simpler_category_wins_under_every_aggregation() {
        let rules = RuleSet::builder()
            .category(Category::Colour, vec![Rule::new("complex", grids_differ, 1.0, 9)])
            .category(Category::Geometry, vec![Rule::new("simple", grids_differ, 1.0, 2)])
            .build()
            .unwrap();
        let task = ArcTask::from_pairs("t", vec![(vec![vec![1]], vec![vec![2]])]);
        for aggregation in [
            Aggregation::default(),
            Aggregation::LogDomain { epsilon: 1e-9 },
            Aggregation::AllPass { scale: 1.0 },
        ] {
            let config = ScoringConfig { aggregation, ..raw_config() };
            let clf = Classifier::new(rules.clone(), config).unwrap();
            assert_eq!(clf.classify(&task).predicted, Category::Geometry, "{:?}", aggregation);
        }
    }

    #[test]
    fn ties_resolve_to_first_category() {
        assert_eq!(argmax(&[0.0, 1.0, 1.0, 0.5, 1.0, 0.0]), Category::CommonSense);
        assert_eq!(argmax(&[0.2; 6]), Category::Colour);
    }

    #[test]
    fn softmax_scores_form_a_distribution() {
        let clf = Classifier::standard().unwrap();
        let task = ArcTask::from_pairs("t", vec![(vec![vec![1, 2], vec![3, 4]], vec![vec![2, 1], vec![4, 3]])]);
        let result = clf.classify(&task);
        let total: f64 = result.scores.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(result.scores.values().all(|s| s.is_finite()));
    }

    #[test]
    fn malformed_pair_fails_every_rule() {
        let clf = Classifier::standard().unwrap();
        let task = ArcTask::from_pairs("bad", vec![(vec![vec![1, 2], vec![3]], vec![vec![1]])]);
        let explained = clf.explain(&task);
        for cat in &explained.categories {
            assert!(cat.rules.iter().all(|r| r.passes == vec![false]));
        }
    }

    #[test]
    fn invalid_config_rejected() {
        let config = ScoringConfig {
            aggregation: Aggregation::Multiplicative { penalty: 0.0 },
            ..ScoringConfig::default()
        };
        assert!(Classifier::with_config(config).is_err());
    }
}
