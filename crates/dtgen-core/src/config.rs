//! Run configuration.
//!
//! Keys are camelCase in JSON (`combInvalid`, `randomMaxStringSize`, ...);
//! every key is optional and falls back to its default.

use dtgen_comb::{CombinationOption, CombinationOptions, InvalidOption, VariantSelectionOption};
use dtgen_data::GeneratorOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("randomMinStringSize {min} is greater than randomMaxStringSize {max}")]
    InvertedStringSizes { min: usize, max: usize },

    #[error("{0} must be at least 1")]
    ZeroTries(&'static str),
}

/// Everything a generation run can be tuned with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    /// Seed of the run. `None` seeds from the current time.
    pub seed: Option<String>,
    pub comb_variant: VariantSelectionOption,
    pub comb_state: CombinationOption,
    pub comb_invalid: InvalidOption,
    pub comb_data: CombinationOption,
    /// Length bounds for strings of elements without a declared length range.
    pub random_min_string_size: usize,
    pub random_max_string_size: usize,
    pub random_tries_to_invalid_value: usize,
    pub max_not_in_set_tries: usize,
    /// Caps the invalid subsets enumerated when `combInvalid` is a number.
    pub max_invalid_subsets: Option<usize>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            comb_variant: VariantSelectionOption::Random,
            comb_state: CombinationOption::SingleRandomOfEach,
            comb_invalid: InvalidOption::Smart,
            comb_data: CombinationOption::SingleRandomOfEach,
            random_min_string_size: 0,
            random_max_string_size: 500,
            random_tries_to_invalid_value: 5,
            max_not_in_set_tries: 10,
            max_invalid_subsets: None, // every subset
        }
    }
}

impl GenerationConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_seed(mut self, seed: &str) -> Self {
        self.seed = Some(seed.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.random_min_string_size > self.random_max_string_size {
            return Err(ConfigError::InvertedStringSizes {
                min: self.random_min_string_size,
                max: self.random_max_string_size,
            });
        }
        if self.random_tries_to_invalid_value == 0 {
            return Err(ConfigError::ZeroTries("randomTriesToInvalidValue"));
        }
        if self.max_not_in_set_tries == 0 {
            return Err(ConfigError::ZeroTries("maxNotInSetTries"));
        }
        Ok(())
    }

    pub fn combination_options(&self) -> CombinationOptions {
        CombinationOptions {
            variant: self.comb_variant,
            state: self.comb_state,
            invalid: self.comb_invalid,
            data: self.comb_data,
        }
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            random_min_string_size: self.random_min_string_size,
            random_max_string_size: self.random_max_string_size,
            random_tries_to_invalid_value: self.random_tries_to_invalid_value,
            max_not_in_set_tries: self.max_not_in_set_tries,
            ..GeneratorOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.seed, None);
        assert_eq!(config.comb_invalid, InvalidOption::Smart);
        assert_eq!(config.comb_data, CombinationOption::SingleRandomOfEach);
        assert_eq!(config.random_max_string_size, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_camel_case_keys_and_partial_config() {
        let config = GenerationConfig::from_json(
            r#"{ "seed": "abc", "combInvalid": 2, "combData": "ow", "randomMaxStringSize": 40 }"#,
        )
        .unwrap();
        assert_eq!(config.seed.as_deref(), Some("abc"));
        assert_eq!(config.comb_invalid, InvalidOption::Exactly(2));
        assert_eq!(config.comb_data, CombinationOption::OneWise);
        assert_eq!(config.random_max_string_size, 40);
        assert_eq!(config.max_not_in_set_tries, 10);
    }

    #[test]
    fn test_named_invalid_policy() {
        let config = GenerationConfig::from_json(r#"{ "combInvalid": "random", "combVariant": "fmi" }"#).unwrap();
        assert_eq!(config.comb_invalid, InvalidOption::Random);
        assert_eq!(config.comb_variant, VariantSelectionOption::FirstMostImportant);
    }

    #[test]
    fn test_unknown_option_rejected() {
        assert!(matches!(
            GenerationConfig::from_json(r#"{ "combData": "pairwise" }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_sizes() {
        let err = GenerationConfig::from_json(r#"{ "randomMinStringSize": 10, "randomMaxStringSize": 5 }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvertedStringSizes { min: 10, max: 5 }));
    }

    #[test]
    fn test_validate_rejects_zero_tries() {
        let config = GenerationConfig {
            max_not_in_set_tries: 0,
            ..GenerationConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTries("maxNotInSetTries"))));
    }

    #[test]
    fn test_generator_options_follow_config() {
        let config = GenerationConfig {
            random_min_string_size: 3,
            random_tries_to_invalid_value: 9,
            ..GenerationConfig::default()
        };
        let options = config.generator_options();
        assert_eq!(options.random_min_string_size, 3);
        assert_eq!(options.random_tries_to_invalid_value, 9);
        assert_eq!(options.double_delta, GeneratorOptions::default().double_delta);
    }
}
