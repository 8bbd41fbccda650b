//! # Specification Repository
//!
//! Specifications registered by model type, optionally under an explicit
//! key. Members declared with `as_registered_model` or `as_named_model`
//! resolve their nested specification here on first execution.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use mval_core::CompileError;

use crate::builder::Specification;

type Entry = Arc<dyn Any + Send + Sync>;

/// Type-indexed store of specifications.
#[derive(Default, Clone)]
pub struct SpecificationRepository {
    entries: HashMap<(TypeId, Option<String>), Entry>,
}

impl SpecificationRepository {
    /// An empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the default specification for `M`. A later registration
    /// for the same type replaces the earlier one.
    pub fn register<M: 'static>(&mut self, specification: Specification<M>) -> &mut Self {
        self.entries
            .insert((TypeId::of::<M>(), None), Arc::new(specification));
        self
    }

    /// Register a specification for `M` under `key`.
    pub fn register_named<M: 'static>(
        &mut self,
        key: impl Into<String>,
        specification: Specification<M>,
    ) -> &mut Self {
        self.entries
            .insert((TypeId::of::<M>(), Some(key.into())), Arc::new(specification));
        self
    }

    /// Look up the specification for `M`, optionally under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::SpecificationNotFound`] if nothing is
    /// registered.
    pub fn get<M: 'static>(&self, key: Option<&str>) -> Result<Specification<M>, CompileError> {
        self.entries
            .get(&(TypeId::of::<M>(), key.map(str::to_owned)))
            .and_then(|entry| entry.downcast_ref::<Specification<M>>())
            .cloned()
            .ok_or_else(|| CompileError::SpecificationNotFound {
                type_name: std::any::type_name::<M>(),
                key: key.map(str::to_owned),
            })
    }

    /// Whether a specification for `M` is registered under `key`.
    pub fn contains<M: 'static>(&self, key: Option<&str>) -> bool {
        self.entries
            .contains_key(&(TypeId::of::<M>(), key.map(str::to_owned)))
    }

    /// Number of registered specifications.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for SpecificationRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecificationRepository")
            .field("entries_count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{specification, ModelSpec};

    struct Address {
        city: String,
    }

    fn address_spec() -> Specification<Address> {
        specification(|s: &mut ModelSpec<Address>| {
            s.member("city", |a| &a.city, |m| {
                m.rule(|c| !c.is_empty());
            });
        })
    }

    #[test]
    fn test_register_and_get() {
        let mut repo = SpecificationRepository::new();
        repo.register(address_spec());
        assert!(repo.contains::<Address>(None));
        assert!(repo.get::<Address>(None).is_ok());
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_named_entries_are_separate() {
        let mut repo = SpecificationRepository::new();
        repo.register_named("billing", address_spec());
        assert!(repo.get::<Address>(Some("billing")).is_ok());
        match repo.get::<Address>(None) {
            Err(CompileError::SpecificationNotFound { key, type_name }) => {
                assert!(key.is_none());
                assert!(type_name.ends_with("Address"));
            }
            other => panic!("Expected SpecificationNotFound, got: {:?}", other.is_ok()),
        }
    }

    #[test]
    fn test_unregistered_type_not_found() {
        let repo = SpecificationRepository::new();
        assert!(repo.is_empty());
        let err = repo.get::<u32>(Some("x")).err().unwrap();
        assert_eq!(
            err,
            CompileError::SpecificationNotFound {
                type_name: "u32",
                key: Some("x".into()),
            }
        );
    }
}
