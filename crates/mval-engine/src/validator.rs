//! # Compiled Validators
//!
//! The executable form of a specification. A [`Validator`] owns an ordered
//! list of scopes; a member scope owns a `MemberValidator` whose rules may in
//! turn reach nested validators (`AsModel`) or nested member validators
//! (`AsCollection`, `AsNullable`).
//!
//! Compiled validators are immutable. The only interior mutability is the
//! compute-once cache of single-error collections and of inline nested
//! validators, both held in [`OnceLock`]s, so a validator can be shared
//! across threads and executed concurrently through `&self`.

use std::fmt;
use std::sync::{Arc, OnceLock};

use mval_core::{Error, ErrorsCollection, ExecutionError, ExecutionOptions};

use crate::cache::ValidatorCache;
use crate::command::Predicate;
use crate::executor::{self, ExecutionContext};
use crate::nested::NestedModel;
use crate::presence::Presence;
use crate::repository::SpecificationRepository;

// ─── Single Errors ───────────────────────────────────────────────────

/// An override error together with its lazily built one-error collection.
pub(crate) struct SingleError {
    error: Error,
    collection: OnceLock<ErrorsCollection>,
}

impl SingleError {
    pub(crate) fn new(error: Error) -> Self {
        Self {
            error,
            collection: OnceLock::new(),
        }
    }

    pub(crate) fn error(&self) -> &Error {
        &self.error
    }

    /// The one-error collection, built on first use.
    pub(crate) fn collection(&self) -> &ErrorsCollection {
        self.collection
            .get_or_init(|| ErrorsCollection::with_single(self.error.clone()))
    }

    /// Collapse a non-empty result into this error. A result that is exactly
    /// one flat error keeps its arguments and only takes the new message.
    pub(crate) fn collapse(&self, found: ErrorsCollection) -> ErrorsCollection {
        if found.is_empty() {
            return found;
        }
        if let [only] = found.errors() {
            if found.members().is_empty() {
                return ErrorsCollection::with_single(only.with_message(self.error.message()));
            }
        }
        self.collection().clone()
    }
}

// ─── Rules ───────────────────────────────────────────────────────────

/// The closed set of rule kinds a member validator executes.
pub(crate) enum RuleKind<M, V> {
    Valid(Predicate<V>),
    AsRelative(Predicate<M>),
    AsModel(NestedModel<V>),
    AsCollection(Box<dyn NestedRule<M, V>>),
    AsNullable(Box<dyn NestedRule<M, V>>),
}

/// A compiled rule and its message / single-error override.
pub(crate) struct Rule<M, V> {
    pub(crate) kind: RuleKind<M, V>,
    pub(crate) error: Option<SingleError>,
}

impl<M, V> Rule<M, V> {
    /// Apply a `WithMessage` override. Existing arguments are kept.
    pub(crate) fn override_message(&mut self, message: &str) {
        let error = match self.error.take() {
            Some(existing) => existing.error().with_message(message),
            None => Error::new(message),
        };
        self.error = Some(SingleError::new(error));
    }

    /// Errors emitted when a leaf rule fails.
    pub(crate) fn failure(&self, options: &ExecutionOptions) -> ErrorsCollection {
        match &self.error {
            Some(single) => single.collection().clone(),
            None => ErrorsCollection::with_single(options.default_error.clone()),
        }
    }

    /// Collapse a nested result when an override is set.
    pub(crate) fn collapse(&self, found: ErrorsCollection) -> ErrorsCollection {
        match &self.error {
            Some(single) => single.collapse(found),
            None => found,
        }
    }
}

/// A nested container rule (`AsCollection`, `AsNullable`) with its inner
/// value type erased.
pub(crate) trait NestedRule<M, V>: Send + Sync {
    fn execute(
        &self,
        model: Option<&M>,
        value: Option<&V>,
        ctx: &ExecutionContext<'_>,
        depth: usize,
    ) -> Result<ErrorsCollection, ExecutionError>;
}

// ─── Member Validators ───────────────────────────────────────────────

/// Compiled rules of one member, plus its optionality and overrides.
pub(crate) struct MemberValidator<M, V> {
    pub(crate) rules: Vec<Rule<M, V>>,
    pub(crate) optional: bool,
    pub(crate) required: Option<Error>,
    pub(crate) single: Option<SingleError>,
    pub(crate) summary: Option<Error>,
}

impl<M, V> MemberValidator<M, V> {
    pub(crate) fn new() -> Self {
        Self {
            rules: Vec::new(),
            optional: false,
            required: None,
            single: None,
            summary: None,
        }
    }
}

/// How a member scope reads its value from the model.
pub(crate) enum Accessor<M, V> {
    /// The member always has a value; presence decides whether it exists.
    Value(Arc<dyn Fn(&M) -> &V + Send + Sync>),
    /// The member may be missing.
    Nullable(Arc<dyn Fn(&M) -> Option<&V> + Send + Sync>),
}

impl<M, V> Accessor<M, V> {
    pub(crate) fn value<G>(get: G) -> Self
    where
        G: Fn(&M) -> &V + Send + Sync + 'static,
    {
        Self::Value(Arc::new(get))
    }

    pub(crate) fn nullable<G>(get: G) -> Self
    where
        G: Fn(&M) -> Option<&V> + Send + Sync + 'static,
    {
        Self::Nullable(Arc::new(get))
    }

    pub(crate) fn read<'a>(&self, model: &'a M) -> Option<&'a V> {
        match self {
            Self::Value(get) => Some(get(model)),
            Self::Nullable(get) => get(model),
        }
    }
}

/// A named member scope with its value type erased.
pub(crate) trait MemberScope<M>: Send + Sync {
    fn name(&self) -> &str;

    fn rule_count(&self) -> usize;

    fn execute(
        &self,
        model: Option<&M>,
        ctx: &ExecutionContext<'_>,
        depth: usize,
    ) -> Result<ErrorsCollection, ExecutionError>;
}

pub(crate) struct MemberEntry<M, V> {
    pub(crate) name: String,
    pub(crate) accessor: Accessor<M, V>,
    pub(crate) validator: MemberValidator<M, V>,
}

impl<M: 'static, V: Presence + 'static> MemberScope<M> for MemberEntry<M, V> {
    fn name(&self) -> &str {
        &self.name
    }

    fn rule_count(&self) -> usize {
        self.validator.rules.len()
    }

    fn execute(
        &self,
        model: Option<&M>,
        ctx: &ExecutionContext<'_>,
        depth: usize,
    ) -> Result<ErrorsCollection, ExecutionError> {
        tracing::trace!(member = %self.name, depth, "executing member scope");
        let value = model
            .and_then(|m| self.accessor.read(m))
            .filter(|v| v.is_present());
        executor::execute_member(&self.validator, model, value, ctx, depth)
    }
}

// ─── Model Validators ────────────────────────────────────────────────

/// An unnamed model-level predicate. Its errors land on the model's node.
pub(crate) struct ModelRule<M> {
    pub(crate) predicate: Predicate<M>,
    pub(crate) error: Option<SingleError>,
}

impl<M> ModelRule<M> {
    pub(crate) fn override_message(&mut self, message: &str) {
        let error = match self.error.take() {
            Some(existing) => existing.error().with_message(message),
            None => Error::new(message),
        };
        self.error = Some(SingleError::new(error));
    }
}

pub(crate) enum Scope<M> {
    Member(Box<dyn MemberScope<M>>),
    Model(ModelRule<M>),
}

/// A compiled specification for model type `M`.
///
/// Obtain one from [`compile`](crate::compile) or, with caching and a
/// repository, from a [`ValidationEngine`](crate::ValidationEngine).
pub struct Validator<M> {
    pub(crate) scopes: Vec<Scope<M>>,
    pub(crate) summary: Option<SingleError>,
}

impl<M: 'static> Validator<M> {
    /// Validate a model with no repository behind it. Members declared with
    /// `as_registered_model` fail with a not-found error; use an engine
    /// for those.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::MaxDepthExceeded`] when nested models
    /// recurse past `options.max_depth`.
    pub fn validate(
        &self,
        model: &M,
        options: &ExecutionOptions,
    ) -> Result<ErrorsCollection, ExecutionError> {
        let repository = SpecificationRepository::new();
        let cache = ValidatorCache::new();
        let ctx = ExecutionContext {
            options,
            repository: &repository,
            cache: &cache,
        };
        executor::execute_model(self, Some(model), &ctx, 0)
    }

    /// Number of scopes (members and model-level rules).
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Member names in declaration order.
    pub fn member_names(&self) -> Vec<&str> {
        self.scopes
            .iter()
            .filter_map(|scope| match scope {
                Scope::Member(member) => Some(member.name()),
                Scope::Model(_) => None,
            })
            .collect()
    }

    /// Total number of rules across all scopes. A model-level rule counts
    /// as one.
    pub fn rule_count(&self) -> usize {
        self.scopes
            .iter()
            .map(|scope| match scope {
                Scope::Member(member) => member.rule_count(),
                Scope::Model(_) => 1,
            })
            .sum()
    }

    /// The model-level summary error, if one is declared.
    pub fn summary_error(&self) -> Option<&Error> {
        self.summary.as_ref().map(SingleError::error)
    }
}

impl<M> fmt::Debug for Validator<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<&str> = self
            .scopes
            .iter()
            .filter_map(|scope| match scope {
                Scope::Member(member) => Some(member.name()),
                Scope::Model(_) => None,
            })
            .collect();
        f.debug_struct("Validator")
            .field("model", &std::any::type_name::<M>())
            .field("scopes", &self.scopes.len())
            .field("members", &members)
            .field("summary", &self.summary.as_ref().map(|s| s.error().message()))
            .finish()
    }
}
