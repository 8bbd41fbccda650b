//! # mval-report — Error Tree Renderers
//!
//! Pure transformations over a finished
//! [`ErrorsCollection`](mval_core::ErrorsCollection): a flat list of
//! `path → message` entries, a nested JSON document, and translated
//! messages.
//!
//! ```text
//! ErrorsCollection ─▶ Renderer (translation lookup ─▶ template render) ─▶ flatten / to_json / Report
//! ```
//!
//! ## Key Design Principles
//!
//! 1. **Translate, then render.** A translation replaces the message
//!    template and the error's own arguments are substituted afterwards, so
//!    a localized template can reorder or reformat `{min}`-style arguments.
//!
//! 2. **Paths are dotted member names.** Collection indices and the force
//!    key are ordinary segments (`tags.2`, `tags.#`); the root's own errors
//!    use the empty path.
//!
//! 3. **Empty parts are omitted.** JSON nodes carry `errors` and `members`
//!    only when non-empty.
//!
//! ## Crate Policy
//!
//! - Renderers never mutate the tree; one tree may be rendered many times.
//! - A message with no translation falls back to the original template.

pub mod error;
pub mod flatten;
pub mod json;
pub mod renderer;
pub mod report;
pub mod translation;

pub use error::ReportError;
pub use flatten::{flatten, FlatEntry};
pub use json::to_json;
pub use renderer::Renderer;
pub use report::Report;
pub use translation::{Translation, Translations};
