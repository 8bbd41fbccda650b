//! # Execution Options
//!
//! Per-call inputs of the executor: which strategy to run, how deep nested
//! models may recurse, and the fallback errors used when a rule or member
//! declares none of its own.

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// How many rules run and how absence is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStrategy {
    /// Evaluate every rule and scope, accumulating all errors.
    #[default]
    Complete,
    /// Stop evaluating siblings within a node once one produced an error.
    FailFast,
    /// Treat every member as absent and every rule as failing, without
    /// evaluating predicates. Materializes the full possible error shape.
    Force,
}

impl ValidationStrategy {
    /// Whether a node stops after its first failing child. A node with a
    /// summary error only needs to know that something failed, so
    /// `Complete` is demoted for that node alone.
    pub fn stops_early(self, has_summary_error: bool) -> bool {
        match self {
            Self::FailFast => true,
            Self::Complete => has_summary_error,
            Self::Force => false,
        }
    }

    /// True for [`ValidationStrategy::Force`].
    pub fn is_force(self) -> bool {
        matches!(self, Self::Force)
    }
}

/// Default recursion limit for nested models.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Default member name for errors of a collection validated by force.
pub const DEFAULT_COLLECTION_FORCE_KEY: &str = "#";

/// Default message of the required error.
pub const DEFAULT_REQUIRED_MESSAGE: &str = "Required";

/// Default message of a failing rule that carries no message.
pub const DEFAULT_ERROR_MESSAGE: &str = "Error";

/// Options supplied to every top-level validation call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOptions {
    /// Strategy for this call.
    pub strategy: ValidationStrategy,
    /// Deepest nested-model level allowed. The root model is level 0.
    pub max_depth: usize,
    /// Member name for the synthetic item of a collection under `Force`.
    pub collection_force_key: String,
    /// Emitted for an absent, non-optional member without its own required error.
    pub required_error: Error,
    /// Emitted for a failing rule without its own message.
    pub default_error: Error,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            strategy: ValidationStrategy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            collection_force_key: DEFAULT_COLLECTION_FORCE_KEY.to_string(),
            required_error: Error::new(DEFAULT_REQUIRED_MESSAGE),
            default_error: Error::new(DEFAULT_ERROR_MESSAGE),
        }
    }
}

impl ExecutionOptions {
    /// The same options under another strategy.
    pub fn with_strategy(&self, strategy: ValidationStrategy) -> Self {
        Self {
            strategy,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_early_matrix() {
        assert!(!ValidationStrategy::Complete.stops_early(false));
        assert!(ValidationStrategy::Complete.stops_early(true));
        assert!(ValidationStrategy::FailFast.stops_early(false));
        assert!(ValidationStrategy::FailFast.stops_early(true));
        assert!(!ValidationStrategy::Force.stops_early(false));
        assert!(!ValidationStrategy::Force.stops_early(true));
    }

    #[test]
    fn test_defaults() {
        let o = ExecutionOptions::default();
        assert_eq!(o.strategy, ValidationStrategy::Complete);
        assert_eq!(o.max_depth, 10);
        assert_eq!(o.collection_force_key, "#");
        assert_eq!(o.required_error.message(), "Required");
        assert_eq!(o.default_error.message(), "Error");
    }

    #[test]
    fn test_with_strategy_keeps_other_fields() {
        let o = ExecutionOptions {
            max_depth: 3,
            ..ExecutionOptions::default()
        };
        let forced = o.with_strategy(ValidationStrategy::Force);
        assert_eq!(forced.strategy, ValidationStrategy::Force);
        assert_eq!(forced.max_depth, 3);
    }

    #[test]
    fn test_strategy_serde_snake_case() {
        let s: ValidationStrategy = serde_json::from_str("\"fail_fast\"").unwrap();
        assert_eq!(s, ValidationStrategy::FailFast);
        assert_eq!(serde_json::to_string(&ValidationStrategy::Force).unwrap(), "\"force\"");
    }
}
