// Rule predicate library.
//
// Every predicate has the same shape: the raw input and output grids plus
// the object sets extracted from them, when available. Predicates that only
// look at grids ignore the object arguments; predicates that need objects
// either fall back to a grid-level heuristic or answer false when the sets
// are missing. No predicate panics or errors.

pub mod colour;
pub mod commonsense;
pub mod geometry;
pub mod movement;
pub mod number;
pub mod object;
pub mod registry;

use crate::perception::grid::{is_well_formed, Grid};
use crate::perception::objects::{ExtractConfig, ObjectSet};

pub use registry::{standard_rules, CategoryRules, RuleSet, RuleSetBuilder};

pub type Predicate = fn(&Grid, &Grid, Option<&ObjectSet>, Option<&ObjectSet>) -> bool;

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub predicate: Predicate,
    /// Declared belief in the rule; normalized per category at registration.
    pub prior: f64,
    /// Static size proxy for the predicate. Must be positive.
    pub complexity: u32,
    /// Extraction used for this rule's object sets; the engine default when None.
    pub extraction: Option<ExtractConfig>,
}

impl Rule {
    pub fn new(name: &'static str, predicate: Predicate, prior: f64, complexity: u32) -> Self {
        Self { name, predicate, prior, complexity, extraction: None }
    }

    pub fn with_extraction(mut self, config: ExtractConfig) -> Self {
        self.extraction = Some(config);
        self
    }

    /// Run the predicate on one pair. Malformed grids evaluate to false.
    pub fn evaluate(
        &self,
        input: &Grid,
        output: &Grid,
        input_objects: Option<&ObjectSet>,
        output_objects: Option<&ObjectSet>,
    ) -> bool {
        if !is_well_formed(input) || !is_well_formed(output) {
            return false;
        }
        (self.predicate)(input, output, input_objects, output_objects)
    }
}

pub(crate) fn both<'a>(
    a: Option<&'a ObjectSet>,
    b: Option<&'a ObjectSet>,
) -> Option<(&'a ObjectSet, &'a ObjectSet)> {
    Some((a?, b?))
}

pub(crate) fn same_shape(a: &Grid, b: &Grid) -> bool {
    crate::perception::grid::grid_dimensions(a) == crate::perception::grid::grid_dimensions(b)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::perception::grid::Grid;
    use crate::perception::objects::{extract_objects, ExtractConfig, ObjectSet};

    /// Objects under the extraction the classifier uses by default.
    pub fn objs(grid: &Grid) -> ObjectSet {
        extract_objects(grid, ExtractConfig::default()).unwrap()
    }
}
