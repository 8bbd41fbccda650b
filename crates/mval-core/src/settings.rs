//! # Settings
//!
//! File-loadable configuration for a validation engine. Settings are parsed
//! from JSON or YAML, every field has a default, and unknown fields are
//! rejected so a typo cannot silently fall back to a default.
//!
//! ```yaml
//! strategy: fail_fast
//! max_depth: 20
//! collection_force_key: "*"
//! required_message: "This field is required"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::errors::Error;
use crate::options::{
    ExecutionOptions, ValidationStrategy, DEFAULT_COLLECTION_FORCE_KEY, DEFAULT_ERROR_MESSAGE,
    DEFAULT_MAX_DEPTH, DEFAULT_REQUIRED_MESSAGE,
};

/// Upper bound accepted for `max_depth`.
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// Serializable form of [`ExecutionOptions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationSettings {
    /// Default strategy for validation calls.
    pub strategy: ValidationStrategy,
    /// Nested-model recursion limit.
    pub max_depth: usize,
    /// Member name used for collections validated by force.
    pub collection_force_key: String,
    /// Message of the global required error.
    pub required_message: String,
    /// Message of the global default error.
    pub default_message: String,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            strategy: ValidationStrategy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            collection_force_key: DEFAULT_COLLECTION_FORCE_KEY.to_string(),
            required_message: DEFAULT_REQUIRED_MESSAGE.to_string(),
            default_message: DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }
}

impl ValidationSettings {
    /// Parse settings from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Json`] on malformed input or unknown fields.
    pub fn from_json_str(input: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Parse settings from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Yaml`] on malformed input or unknown fields.
    pub fn from_yaml_str(input: &str) -> Result<Self, SettingsError> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Validate the settings and build execution options.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidValue`] for an empty force key or
    /// message, or a `max_depth` above [`MAX_DEPTH_LIMIT`].
    pub fn into_options(self) -> Result<ExecutionOptions, SettingsError> {
        if self.collection_force_key.is_empty() {
            return Err(SettingsError::InvalidValue {
                field: "collection_force_key",
                reason: "must not be empty".into(),
            });
        }
        if self.required_message.trim().is_empty() {
            return Err(SettingsError::InvalidValue {
                field: "required_message",
                reason: "must not be blank".into(),
            });
        }
        if self.default_message.trim().is_empty() {
            return Err(SettingsError::InvalidValue {
                field: "default_message",
                reason: "must not be blank".into(),
            });
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(SettingsError::InvalidValue {
                field: "max_depth",
                reason: format!("{} exceeds the limit of {MAX_DEPTH_LIMIT}", self.max_depth),
            });
        }
        if self.strategy.is_force() {
            tracing::warn!("settings select the force strategy as the default for every call");
        }

        Ok(ExecutionOptions {
            strategy: self.strategy,
            max_depth: self.max_depth,
            collection_force_key: self.collection_force_key,
            required_error: Error::new(self.required_message),
            default_error: Error::new(self.default_message),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let s = ValidationSettings::from_json_str("{}").unwrap();
        assert_eq!(s, ValidationSettings::default());
        assert_eq!(s.into_options().unwrap(), ExecutionOptions::default());
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
strategy: fail_fast
max_depth: 3
collection_force_key: "*"
required_message: "Missing"
"#;
        let options = ValidationSettings::from_yaml_str(yaml)
            .unwrap()
            .into_options()
            .unwrap();
        assert_eq!(options.strategy, ValidationStrategy::FailFast);
        assert_eq!(options.max_depth, 3);
        assert_eq!(options.collection_force_key, "*");
        assert_eq!(options.required_error.message(), "Missing");
        assert_eq!(options.default_error.message(), "Error");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ValidationSettings::from_json_str(r#"{"max_dept": 3}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_empty_force_key_rejected() {
        let s = ValidationSettings {
            collection_force_key: String::new(),
            ..ValidationSettings::default()
        };
        match s.into_options() {
            Err(SettingsError::InvalidValue { field, .. }) => {
                assert_eq!(field, "collection_force_key")
            }
            other => panic!("Expected InvalidValue, got: {other:?}"),
        }
    }

    #[test]
    fn test_max_depth_limit() {
        let s = ValidationSettings {
            max_depth: MAX_DEPTH_LIMIT + 1,
            ..ValidationSettings::default()
        };
        assert!(s.into_options().is_err());
    }
}
