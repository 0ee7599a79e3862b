pub mod engine;
pub mod solomonoff;

pub use engine::{evaluate_category, CategoryTrace, Classification, Classifier, Explanation, RuleOutcome};
pub use solomonoff::{Aggregation, Normalization};
