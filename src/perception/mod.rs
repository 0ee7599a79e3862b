pub mod grid;
pub mod matching;
pub mod objects;

pub use grid::{ArcExample, ArcTask, Grid};
pub use objects::{extract_objects, objects, Cell, ExtractConfig, Mirror, Object, ObjectSet};
