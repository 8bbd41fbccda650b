//! # mval-rules — Predefined Leaf Rules
//!
//! Common checks for strings, numbers and collections, offered as extension
//! traits over [`MemberSpec`](mval_engine::MemberSpec). Every rule is an
//! ordinary leaf predicate with a default message; the message template
//! references typed arguments such as `{min}` so reports can reformat or
//! translate it.
//!
//! ```
//! use mval_engine::{compile, specification, ModelSpec};
//! use mval_rules::{NumberRules, StringRules};
//!
//! struct Signup {
//!     email: String,
//!     age: u32,
//! }
//!
//! let validator = compile(&specification(|s: &mut ModelSpec<Signup>| {
//!     s.member("email", |u| &u.email, |m| {
//!         m.not_empty().email();
//!     });
//!     s.member("age", |u| &u.age, |m| {
//!         m.greater_than_or_equal(18);
//!     });
//! }))
//! .unwrap();
//! assert_eq!(validator.rule_count(), 3);
//! ```
//!
//! ## Key Design Principles
//!
//! 1. **Rules are plain predicates.** Nothing here reaches into the
//!    compiler; each method records one `rule_with_error` command.
//!
//! 2. **Messages are templates.** Bounds travel as [`Arg`](mval_core::Arg)
//!    values and are substituted at render time, never formatted eagerly.
//!
//! 3. **`with_message` still applies.** A following `with_message` replaces
//!    the template and keeps the arguments.
//!
//! ## Crate Policy
//!
//! - Default messages are public constants in [`messages`].
//! - String lengths count Unicode scalar values, not bytes.

pub mod collection;
pub mod messages;
pub mod number;
pub mod string;

pub use collection::CollectionRules;
pub use number::NumberRules;
pub use string::{is_email, StringRules};
