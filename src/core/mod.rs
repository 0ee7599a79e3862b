pub mod error;
pub mod types;

pub use error::{ClassifyError, Result};
pub use types::Category;
