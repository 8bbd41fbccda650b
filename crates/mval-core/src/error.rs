//! # Error Types — Engine Contract Violations
//!
//! Validation findings are never errors in the Rust sense: they are data,
//! collected into an [`ErrorsCollection`](crate::ErrorsCollection). The types
//! in this module cover the other category, contract violations that abort a
//! `compile` or `validate` call immediately.
//!
//! ## Design
//!
//! - Compile-time violations name the offending command, its index within the
//!   scope's command list, and the dotted path of the scope being compiled.
//! - Execution errors are fatal to the current call and are never recovered
//!   internally.

use thiserror::Error;

/// Top-level error type for mval.
#[derive(Error, Debug)]
pub enum MvalError {
    /// A specification could not be compiled.
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    /// A validation run aborted.
    #[error("execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// An error message template could not be rendered.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Settings could not be loaded.
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// A malformed specification, detected while compiling the command list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A command that may appear at most once per scope appeared again.
    #[error("duplicate command '{command}' at index {index} in scope '{scope}'")]
    DuplicateCommand {
        /// Command name, e.g. `SetOptional`.
        command: &'static str,
        /// Index of the second occurrence.
        index: usize,
        /// Dotted path of the scope being compiled.
        scope: String,
    },

    /// `WithMessage` did not follow a rule.
    #[error("misplaced command 'WithMessage' at index {index} in scope '{scope}': {reason}")]
    MisplacedWithMessage {
        /// Index of the `WithMessage` command.
        index: usize,
        /// Dotted path of the scope being compiled.
        scope: String,
        /// Why the command could not attach to a rule.
        reason: String,
    },

    /// A command that is not permitted inside a restricted scope (`AsNullable`).
    #[error("command '{command}' at index {index} is not allowed inside '{container}' in scope '{scope}'")]
    RestrictedCommand {
        /// Command name.
        command: &'static str,
        /// Index of the command.
        index: usize,
        /// The restricting container command, e.g. `AsNullable`.
        container: &'static str,
        /// Dotted path of the scope being compiled.
        scope: String,
    },

    /// No inline specification was given and the repository has no entry.
    #[error("no specification registered for type '{type_name}'{}", key.as_ref().map(|k| format!(" under key '{k}'")).unwrap_or_default())]
    SpecificationNotFound {
        /// Rust type name of the model.
        type_name: &'static str,
        /// Explicit repository key, if one was requested.
        key: Option<String>,
    },
}

impl CompileError {
    /// Name of the offending command, when the error refers to one.
    pub fn command(&self) -> Option<&'static str> {
        match self {
            Self::DuplicateCommand { command, .. } | Self::RestrictedCommand { command, .. } => {
                Some(command)
            }
            Self::MisplacedWithMessage { .. } => Some("WithMessage"),
            Self::SpecificationNotFound { .. } => None,
        }
    }

    /// Index of the offending command, when the error refers to one.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::DuplicateCommand { index, .. }
            | Self::MisplacedWithMessage { index, .. }
            | Self::RestrictedCommand { index, .. } => Some(*index),
            Self::SpecificationNotFound { .. } => None,
        }
    }
}

/// A fatal error raised while executing a compiled validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// Recursion went deeper than the configured limit. Cyclic graphs and
    /// pathologically deep acyclic graphs both end here.
    #[error("maximum validation depth {max_depth} exceeded")]
    MaxDepthExceeded {
        /// The configured limit.
        max_depth: usize,
    },

    /// A nested specification failed to compile on first use.
    #[error("nested specification failed to compile: {0}")]
    Compile(#[from] CompileError),
}

/// Error rendering an error message template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Two arguments passed to the same render call share a name.
    #[error("duplicate template argument '{0}'")]
    DuplicateArgument(String),
}

/// Error loading or validating [`ValidationSettings`](crate::ValidationSettings).
#[derive(Error, Debug)]
pub enum SettingsError {
    /// JSON parse failure.
    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse failure.
    #[error("invalid YAML settings: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A field parsed but holds an unusable value.
    #[error("invalid setting '{field}': {reason}")]
    InvalidValue {
        /// Setting name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_command_display_names_command_and_index() {
        let err = CompileError::DuplicateCommand {
            command: "SetOptional",
            index: 3,
            scope: "User.Email".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("SetOptional"));
        assert!(msg.contains("index 3"));
        assert!(msg.contains("User.Email"));
        assert_eq!(err.command(), Some("SetOptional"));
        assert_eq!(err.index(), Some(3));
    }

    #[test]
    fn test_not_found_display_with_and_without_key() {
        let plain = CompileError::SpecificationNotFound {
            type_name: "app::Address",
            key: None,
        };
        assert_eq!(
            plain.to_string(),
            "no specification registered for type 'app::Address'"
        );

        let keyed = CompileError::SpecificationNotFound {
            type_name: "app::Address",
            key: Some("billing".into()),
        };
        assert!(keyed.to_string().ends_with("under key 'billing'"));
        assert_eq!(keyed.command(), None);
    }

    #[test]
    fn test_execution_error_wraps_compile_error() {
        let inner = CompileError::MisplacedWithMessage {
            index: 0,
            scope: "Order".into(),
            reason: "no preceding rule".into(),
        };
        let err: ExecutionError = inner.clone().into();
        assert_eq!(err, ExecutionError::Compile(inner));
    }

    #[test]
    fn test_max_depth_display() {
        let err = ExecutionError::MaxDepthExceeded { max_depth: 5 };
        assert_eq!(err.to_string(), "maximum validation depth 5 exceeded");
    }
}
