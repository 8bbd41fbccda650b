//! A rendered, displayable report.

use std::fmt;

use mval_core::ErrorsCollection;
use serde::Serialize;
use tracing::debug;

use crate::error::ReportError;
use crate::flatten::{flatten, FlatEntry};
use crate::renderer::Renderer;

/// Rendered findings of one validation run.
///
/// `Display` prints one finding per line as `path: message`; root findings
/// print the message alone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Report {
    entries: Vec<FlatEntry>,
}

impl Report {
    /// Render `tree` without translation.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Template`] if any message fails to render.
    pub fn new(tree: &ErrorsCollection) -> Result<Self, ReportError> {
        Self::with_renderer(tree, &Renderer::new())
    }

    /// Render `tree` with `renderer`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Template`] if any message fails to render.
    pub fn with_renderer(
        tree: &ErrorsCollection,
        renderer: &Renderer<'_>,
    ) -> Result<Self, ReportError> {
        let entries = flatten(tree, renderer)?;
        debug!(
            entries = entries.len(),
            translation = renderer.translation().map(|t| t.name()),
            "rendered validation report"
        );
        Ok(Self { entries })
    }

    /// Every finding in path order.
    pub fn entries(&self) -> &[FlatEntry] {
        &self.entries
    }

    /// Messages reported at exactly `path`.
    pub fn messages_at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.path == path)
            .map(|entry| entry.message.as_str())
    }

    /// Number of findings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True for a valid model.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            if entry.path.is_empty() {
                f.write_str(&entry.message)?;
            } else {
                write!(f, "{}: {}", entry.path, entry.message)?;
            }
        }
        Ok(())
    }
}
