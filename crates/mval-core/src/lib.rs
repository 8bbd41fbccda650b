//! # mval-core — Foundational Types for Model Validation
//!
//! This crate defines the data every other mval crate exchanges: the
//! hierarchical error tree produced by a validation run, the message
//! templates that tree carries, the per-call execution options, and the
//! error enums for engine contract violations.
//!
//! ## Key Design Principles
//!
//! 1. **Findings are data, violations are errors.** A failing rule becomes an
//!    [`Error`] inside an [`ErrorsCollection`]. A malformed specification or
//!    an exceeded depth limit becomes a [`CompileError`] or [`ExecutionError`]
//!    returned from the call site.
//!
//! 2. **Eager pruning.** No node of an [`ErrorsCollection`] ever holds an
//!    empty child, so `is_empty` on the root answers "is the model valid".
//!
//! 3. **Late rendering.** Messages stay templates with typed [`Arg`]s until a
//!    report renders them, so one result can be rendered under many
//!    translations.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mval-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod errors;
pub mod message;
pub mod options;
pub mod settings;

// Re-export primary types for ergonomic imports.
pub use error::{CompileError, ExecutionError, MvalError, SettingsError, TemplateError};
pub use errors::{Error, ErrorsCollection};
pub use message::{render, Arg, Number, LINE_BREAK_MARKER};
pub use options::{
    ExecutionOptions, ValidationStrategy, DEFAULT_COLLECTION_FORCE_KEY, DEFAULT_ERROR_MESSAGE,
    DEFAULT_MAX_DEPTH, DEFAULT_REQUIRED_MESSAGE,
};
pub use settings::ValidationSettings;
