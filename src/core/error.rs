use thiserror::Error;

use super::types::Category;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("malformed grid: {reason}")]
    MalformedGrid { reason: String },
    #[error("priors of category {category} sum to zero")]
    ZeroPriorSum { category: Category },
    #[error("rule {rule} declares zero complexity")]
    InvalidComplexity { rule: &'static str },
    #[error("rule {rule} registered twice in {category}")]
    DuplicateRule { category: Category, rule: &'static str },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClassifyError>;
