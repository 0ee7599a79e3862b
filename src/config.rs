// Scoring configuration, loadable from JSON.
//
// Every field has a default, so `{}` is a valid config and partial files
// only override what they name.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::perception::objects::ExtractConfig;
use crate::scoring::solomonoff::{Aggregation, Normalization};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub aggregation: Aggregation,
    pub normalization: Normalization,
    /// Extraction for rules that do not declare their own.
    pub extraction: ExtractConfig,
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        self.aggregation.validate()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ScoringConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClassifyError;

    #[test]
    fn empty_object_gives_defaults() {
        let config = ScoringConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ScoringConfig::default());
        assert_eq!(config.normalization, Normalization::Softmax);
        assert_eq!(config.extraction, ExtractConfig::new(true, true, true));
    }

    #[test]
    fn partial_override() {
        let json = r#"{
            "aggregation": { "kind": "log_domain", "epsilon": 1e-6 },
            "normalization": "rule_count",
            "extraction": { "diagonal": false }
        }"#;
        let config = ScoringConfig::from_json_str(json).unwrap();
        assert_eq!(config.aggregation, Aggregation::LogDomain { epsilon: 1e-6 });
        assert_eq!(config.normalization, Normalization::RuleCount);
        assert_eq!(config.extraction, ExtractConfig::new(true, false, true));
    }

    #[test]
    fn out_of_range_penalty_rejected() {
        let json = r#"{ "aggregation": { "kind": "multiplicative", "penalty": 2.0 } }"#;
        assert!(matches!(ScoringConfig::from_json_str(json), Err(ClassifyError::InvalidConfig(_))));
    }

    #[test]
    fn bad_json_is_a_json_error() {
        assert!(matches!(ScoringConfig::from_json_str("{ nope"), Err(ClassifyError::Json(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ScoringConfig::load_from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ClassifyError::Io(_)));
    }
}
