// Static category -> rule table.
//
// Built once through `RuleSetBuilder`; priors are normalized to sum to 1
// within each category at build time, so a category whose priors sum to
// zero is rejected before anything is scored.

use rustc_hash::FxHashSet;

use super::{colour, commonsense, geometry, movement, number, object, Rule};
use crate::core::{Category, ClassifyError, Result};

#[derive(Debug, Clone)]
pub struct CategoryRules {
    pub category: Category,
    rules: Vec<Rule>,
}

impl CategoryRules {
    /// Validate the rules and normalize their priors.
    pub fn new(category: Category, mut rules: Vec<Rule>) -> Result<Self> {
        let mut seen = FxHashSet::default();
        for rule in &rules {
            if rule.complexity == 0 {
                return Err(ClassifyError::InvalidComplexity { rule: rule.name });
            }
            if !rule.prior.is_finite() || rule.prior < 0.0 {
                return Err(ClassifyError::InvalidConfig(format!(
                    "rule {} has prior {}",
                    rule.name, rule.prior
                )));
            }
            if !seen.insert(rule.name) {
                return Err(ClassifyError::DuplicateRule { category, rule: rule.name });
            }
        }
        let total: f64 = rules.iter().map(|r| r.prior).sum();
        if total <= 0.0 {
            return Err(ClassifyError::ZeroPriorSum { category });
        }
        for rule in &mut rules {
            rule.prior /= total;
        }
        Ok(Self { category, rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Rules for every category, in [`Category::ALL`] order.
#[derive(Debug, Clone)]
pub struct RuleSet {
    categories: Vec<CategoryRules>,
}

impl RuleSet {
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    pub fn categories(&self) -> &[CategoryRules] {
        &self.categories
    }

    pub fn get(&self, category: Category) -> Option<&CategoryRules> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn rule_count(&self) -> usize {
        self.categories.iter().map(CategoryRules::len).sum()
    }
}

#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    entries: Vec<(Category, Vec<Rule>)>,
}

impl RuleSetBuilder {
    /// Add rules to a category. Repeated calls for one category append.
    pub fn category(mut self, category: Category, rules: Vec<Rule>) -> Self {
        match self.entries.iter_mut().find(|(c, _)| *c == category) {
            Some((_, existing)) => existing.extend(rules),
            None => self.entries.push((category, rules)),
        }
        self
    }

    /// Categories without rules are left out and score zero.
    pub fn build(self) -> Result<RuleSet> {
        let mut entries = self.entries;
        entries.sort_by_key(|(c, _)| c.index());
        let categories = entries
            .into_iter()
            .filter(|(_, rules)| !rules.is_empty())
            .map(|(category, rules)| CategoryRules::new(category, rules))
            .collect::<Result<Vec<_>>>()?;
        Ok(RuleSet { categories })
    }
}

/// The built-in rule table.
pub fn standard_rules() -> Result<RuleSet> {
    RuleSet::builder()
        .category(Category::Colour, colour::rules())
        .category(Category::CommonSense, commonsense::rules())
        .category(Category::Geometry, geometry::rules())
        .category(Category::Movement, movement::rules())
        .category(Category::Number, number::rules())
        .category(Category::Object, object::rules())
        .build()
}
