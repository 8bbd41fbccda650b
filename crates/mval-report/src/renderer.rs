//! Message rendering with an optional translation.

use mval_core::Error;

use crate::error::ReportError;
use crate::translation::Translation;

/// Turns [`Error`]s into display strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer<'a> {
    translation: Option<Translation<'a>>,
}

impl<'a> Renderer<'a> {
    /// Render messages as written.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look messages up in `translation` before rendering.
    pub fn translated(translation: Translation<'a>) -> Self {
        Self {
            translation: Some(translation),
        }
    }

    /// The active translation, if any.
    pub fn translation(&self) -> Option<Translation<'a>> {
        self.translation
    }

    /// Translate the message template, then substitute the error's
    /// arguments into it.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Template`] if the error carries two arguments
    /// with the same name.
    pub fn render(&self, error: &Error) -> Result<String, ReportError> {
        let template = match &self.translation {
            Some(translation) => translation.localize(error.message()),
            None => error.message(),
        };
        Ok(error.render_as(template)?)
    }
}
