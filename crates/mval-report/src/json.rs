//! Nested JSON rendering.
//!
//! Each node becomes an object with an `errors` array of rendered messages
//! and a `members` object of child nodes. Either key is left out when it
//! would be empty, so a valid model renders as `{}`.

use mval_core::ErrorsCollection;
use serde_json::{Map, Value};

use crate::error::ReportError;
use crate::renderer::Renderer;

/// Render `tree` as a JSON value mirroring its shape.
///
/// # Errors
///
/// Returns [`ReportError::Template`] if any message fails to render.
pub fn to_json(tree: &ErrorsCollection, renderer: &Renderer<'_>) -> Result<Value, ReportError> {
    let mut node = Map::new();

    if !tree.errors().is_empty() {
        let errors = tree
            .errors()
            .iter()
            .map(|error| renderer.render(error).map(Value::String))
            .collect::<Result<Vec<_>, _>>()?;
        node.insert("errors".to_string(), Value::Array(errors));
    }

    if !tree.members().is_empty() {
        let mut members = Map::new();
        for (name, child) in tree.members() {
            members.insert(name.clone(), to_json(child, renderer)?);
        }
        node.insert("members".to_string(), Value::Object(members));
    }

    Ok(Value::Object(node))
}
