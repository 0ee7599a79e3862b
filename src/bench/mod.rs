pub mod runner;

pub use runner::{run_batch, BatchReport, TaskReport};
