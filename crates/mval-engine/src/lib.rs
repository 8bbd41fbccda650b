//! # mval-engine — Specification Compiler and Recursive Executor
//!
//! Turns declarative specifications into compiled validators and runs them
//! over model instances, producing an
//! [`ErrorsCollection`](mval_core::ErrorsCollection) tree.
//!
//! ```text
//! specification closure ─▶ command list ─▶ compiler ─▶ Validator ─▶ executor ─▶ ErrorsCollection
//!                                                          ▲
//!                                      ValidatorCache ─────┘ (per type / key)
//! ```
//!
//! ## Key Design Principles
//!
//! 1. **Builders are passed by `&mut`.** A specification closure records
//!    commands on the builder it is given and returns nothing.
//!
//! 2. **Members are read through accessors.** Each member scope captures a
//!    closure from the model to the member value at build time.
//!
//! 3. **Rule kinds are a closed enum.** The executor matches them
//!    exhaustively; there is no "unknown rule" path at runtime.
//!
//! 4. **Nested specifications resolve lazily.** `as_model` rules compile on
//!    first execution, so self-referential specifications compile in finite
//!    time and the depth counter bounds recursion.
//!
//! ## Crate Policy
//!
//! - Compiled validators are `Send + Sync`; execution takes `&self`.
//! - Contract violations are returned as [`CompileError`] /
//!   [`ExecutionError`]; findings are data.
//! - No `unsafe` code.
//!
//! [`CompileError`]: mval_core::CompileError
//! [`ExecutionError`]: mval_core::ExecutionError

pub mod builder;
pub mod cache;
mod command;
pub mod compiler;
pub mod engine;
mod executor;
mod nested;
pub mod presence;
pub mod repository;
pub mod validator;

pub use builder::{specification, MemberSpec, ModelSpec, Specification};
pub use cache::ValidatorCache;
pub use compiler::compile;
pub use engine::{CompiledValidator, EngineBuilder, ValidationEngine};
pub use presence::{Collection, Presence};
pub use repository::SpecificationRepository;
pub use validator::Validator;

// Re-export the core types callers need alongside the engine.
pub use mval_core::{
    Arg, CompileError, Error, ErrorsCollection, ExecutionError, ExecutionOptions, MvalError,
    ValidationSettings, ValidationStrategy,
};
