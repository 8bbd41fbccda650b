//! Flat `path → message` rendering.

use mval_core::ErrorsCollection;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::renderer::Renderer;

/// One rendered finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatEntry {
    /// Dotted member path. Empty for the root's own errors.
    pub path: String,
    /// The rendered message.
    pub message: String,
}

/// Every error of `tree`, depth first. A node's own errors come before its
/// children, and children follow key order.
///
/// # Errors
///
/// Returns [`ReportError::Template`] if any message fails to render.
pub fn flatten(
    tree: &ErrorsCollection,
    renderer: &Renderer<'_>,
) -> Result<Vec<FlatEntry>, ReportError> {
    let mut out = Vec::with_capacity(tree.error_count());
    collect(tree, "", renderer, &mut out)?;
    Ok(out)
}

fn collect(
    node: &ErrorsCollection,
    path: &str,
    renderer: &Renderer<'_>,
    out: &mut Vec<FlatEntry>,
) -> Result<(), ReportError> {
    for error in node.errors() {
        out.push(FlatEntry {
            path: path.to_string(),
            message: renderer.render(error)?,
        });
    }
    for (name, child) in node.members() {
        let child_path = if path.is_empty() {
            name.clone()
        } else {
            format!("{path}.{name}")
        };
        collect(child, &child_path, renderer, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mval_core::{Arg, Error};

    fn sample() -> ErrorsCollection {
        let mut address = ErrorsCollection::new();
        address.add_member_error("city", Error::new("Required"));
        let mut tags = ErrorsCollection::new();
        tags.add_member_error("2", Error::with_args("Max {max}", vec![Arg::number("max", 8)]));

        let mut root = ErrorsCollection::new();
        root.add_error(Error::new("Name or address needed"));
        root.add_member("address", address);
        root.add_member("tags", tags);
        root
    }

    #[test]
    fn test_paths_are_dotted_and_root_is_empty() {
        let entries = flatten(&sample(), &Renderer::new()).unwrap();
        let pairs: Vec<(&str, &str)> = entries
            .iter()
            .map(|e| (e.path.as_str(), e.message.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("", "Name or address needed"),
                ("address.city", "Required"),
                ("tags.2", "Max 8"),
            ]
        );
    }

    #[test]
    fn test_empty_tree_flattens_to_nothing() {
        assert!(flatten(&ErrorsCollection::new(), &Renderer::new())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_entry_count_matches_error_count() {
        let tree = sample();
        assert_eq!(
            flatten(&tree, &Renderer::new()).unwrap().len(),
            tree.error_count()
        );
    }
}
