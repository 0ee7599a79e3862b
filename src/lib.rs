pub mod core;
pub mod perception;
pub mod rules;
pub mod scoring;
pub mod config;
pub mod bench;

pub use crate::config::ScoringConfig;
pub use crate::core::{Category, ClassifyError, Result};
pub use crate::perception::{ArcTask, Grid};
pub use crate::scoring::{Classification, Classifier};
