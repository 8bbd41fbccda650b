//! # Translations
//!
//! Named lookup tables from a message template to its localized template.
//! Keys are the unrendered templates (`"Must be at least {min} characters
//! in length"`), so one entry covers every bound a rule is configured with.
//!
//! Tables load from JSON or YAML documents keyed by translation name:
//!
//! ```yaml
//! pl:
//!   Required: Pole wymagane
//!   "Must be at least {min} characters in length": "Minimalna długość: {min}"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::ReportError;

type Table = BTreeMap<String, String>;

/// A set of named translations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations {
    tables: BTreeMap<String, Table>,
}

impl Translations {
    /// No translations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse translations from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Json`] on malformed input.
    pub fn from_json_str(input: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Parse translations from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Yaml`] on malformed input.
    pub fn from_yaml_str(input: &str) -> Result<Self, ReportError> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Add or replace one entry of translation `name`.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        message: impl Into<String>,
        localized: impl Into<String>,
    ) -> &mut Self {
        self.tables
            .entry(name.into())
            .or_default()
            .insert(message.into(), localized.into());
        self
    }

    /// The translation called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::UnknownTranslation`] if no table has that name.
    pub fn get(&self, name: &str) -> Result<Translation<'_>, ReportError> {
        self.tables
            .get_key_value(name)
            .map(|(name, table)| Translation { name, table })
            .ok_or_else(|| ReportError::UnknownTranslation(name.to_string()))
    }

    /// Names of the loaded translations, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// True if no translation is loaded.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// A borrowed view of one translation table.
#[derive(Debug, Clone, Copy)]
pub struct Translation<'a> {
    name: &'a str,
    table: &'a Table,
}

impl<'a> Translation<'a> {
    /// The translation name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The localized template for `message`, or `message` itself when the
    /// table has no entry.
    pub fn localize<'b>(&self, message: &'b str) -> &'b str
    where
        'a: 'b,
    {
        match self.table.get(message) {
            Some(localized) => localized,
            None => {
                trace!(translation = self.name, message, "no translation entry");
                message
            }
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
