//! # Specification Builders
//!
//! A specification is a closure over a mutable builder. The closure records
//! commands; nothing is checked until the specification is compiled.
//!
//! ```
//! use mval_engine::{compile, specification, ModelSpec};
//!
//! struct User {
//!     email: String,
//!     nickname: Option<String>,
//! }
//!
//! let spec = specification(|s: &mut ModelSpec<User>| {
//!     s.member("email", |u| &u.email, |m| {
//!         m.rule(|e| e.contains('@')).with_message("Must be an email");
//!     });
//!     s.nullable_member("nickname", |u| u.nickname.as_ref(), |m| {
//!         m.set_optional().rule(|n| n.len() <= 16);
//!     });
//! });
//! assert!(compile(&spec).is_ok());
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use mval_core::{CompileError, Error};

use crate::command::{
    MemberCommand, MemberScopeCommand, ModelCommand, ModelSource, RuleCommand,
};
use crate::compiler;
use crate::nested::{CollectionCommand, NullableCommand};
use crate::presence::{Collection, Presence};
use crate::validator::{Accessor, MemberEntry, MemberScope};

/// A reusable specification for model type `M`.
pub type Specification<M> = Arc<dyn Fn(&mut ModelSpec<M>) + Send + Sync>;

/// Wrap a closure as a [`Specification`].
pub fn specification<M, F>(build: F) -> Specification<M>
where
    F: Fn(&mut ModelSpec<M>) + Send + Sync + 'static,
{
    Arc::new(build)
}

// ─── Model Builder ───────────────────────────────────────────────────

/// Records the scopes of a model: named members and model-level rules.
pub struct ModelSpec<M> {
    commands: Vec<ModelCommand<M>>,
}

impl<M: 'static> ModelSpec<M> {
    pub(crate) fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub(crate) fn into_commands(self) -> Vec<ModelCommand<M>> {
        self.commands
    }

    /// Declare a member read by `get`. The member exists when its value is
    /// [`Presence::is_present`], so an `Option` member is absent when `None`.
    pub fn member<V, G, S>(&mut self, name: impl Into<String>, get: G, spec: S) -> &mut Self
    where
        V: Presence + 'static,
        G: Fn(&M) -> &V + Send + Sync + 'static,
        S: FnOnce(&mut MemberSpec<M, V>),
    {
        self.push_member(name.into(), Accessor::value(get), spec)
    }

    /// Declare a member that may be missing, e.g. `|m| m.nickname.as_ref()`.
    /// Rules see the unwrapped value.
    pub fn nullable_member<V, G, S>(&mut self, name: impl Into<String>, get: G, spec: S) -> &mut Self
    where
        V: Presence + 'static,
        G: Fn(&M) -> Option<&V> + Send + Sync + 'static,
        S: FnOnce(&mut MemberSpec<M, V>),
    {
        self.push_member(name.into(), Accessor::nullable(get), spec)
    }

    fn push_member<V, S>(&mut self, name: String, accessor: Accessor<M, V>, spec: S) -> &mut Self
    where
        V: Presence + 'static,
        S: FnOnce(&mut MemberSpec<M, V>),
    {
        let mut member = MemberSpec::new();
        spec(&mut member);
        self.commands
            .push(ModelCommand::Member(Box::new(MemberScopeBuilder {
                name,
                accessor,
                spec: member,
            })));
        self
    }

    /// A model-level rule. Failures are reported on the model's own node.
    pub fn rule<P>(&mut self, predicate: P) -> &mut Self
    where
        P: Fn(&M) -> bool + Send + Sync + 'static,
    {
        self.commands.push(ModelCommand::Rule {
            predicate: Arc::new(predicate),
            error: None,
        });
        self
    }

    /// A model-level rule with its own error.
    pub fn rule_with_error<P>(&mut self, predicate: P, error: Error) -> &mut Self
    where
        P: Fn(&M) -> bool + Send + Sync + 'static,
    {
        self.commands.push(ModelCommand::Rule {
            predicate: Arc::new(predicate),
            error: Some(error),
        });
        self
    }

    /// Replace the message of the preceding model-level rule.
    ///
    /// Member scopes are not targets: `with_message` right after `member`
    /// is a [`CompileError::MisplacedWithMessage`]. Use `set_single_error`
    /// inside the member to replace its findings.
    ///
    /// [`CompileError::MisplacedWithMessage`]: mval_core::CompileError::MisplacedWithMessage
    pub fn with_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.commands.push(ModelCommand::WithMessage(message.into()));
        self
    }

    /// Replace every finding of this model with one error.
    pub fn set_summary_error(&mut self, message: impl Into<String>) -> &mut Self {
        self.commands
            .push(ModelCommand::SetSummaryError(message.into()));
        self
    }
}

struct MemberScopeBuilder<M, V> {
    name: String,
    accessor: Accessor<M, V>,
    spec: MemberSpec<M, V>,
}

impl<M: 'static, V: Presence + 'static> MemberScopeCommand<M> for MemberScopeBuilder<M, V> {
    fn name(&self) -> &str {
        &self.name
    }

    fn compile(self: Box<Self>, scope: &str) -> Result<Box<dyn MemberScope<M>>, CompileError> {
        let Self {
            name,
            accessor,
            spec,
        } = *self;
        let validator = compiler::compile_member(spec.into_commands(), scope)?;
        Ok(Box::new(MemberEntry {
            name,
            accessor,
            validator,
        }))
    }
}

// ─── Member Builder ──────────────────────────────────────────────────

/// Records the rules of one member of `M` with value type `V`.
pub struct MemberSpec<M, V> {
    commands: Vec<MemberCommand<M, V>>,
}

impl<M: 'static, V: 'static> MemberSpec<M, V> {
    pub(crate) fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub(crate) fn into_commands(self) -> Vec<MemberCommand<M, V>> {
        self.commands
    }

    fn push(&mut self, command: MemberCommand<M, V>) -> &mut Self {
        self.commands.push(command);
        self
    }

    fn push_rule(&mut self, rule: RuleCommand<M, V>, error: Option<Error>) -> &mut Self {
        self.push(MemberCommand::Rule { rule, error })
    }

    /// A leaf predicate over the member value.
    pub fn rule<P>(&mut self, predicate: P) -> &mut Self
    where
        P: Fn(&V) -> bool + Send + Sync + 'static,
    {
        self.push_rule(RuleCommand::Valid(Arc::new(predicate)), None)
    }

    /// A leaf predicate with its own error. Predefined rules use this to
    /// attach templated messages with arguments.
    pub fn rule_with_error<P>(&mut self, predicate: P, error: Error) -> &mut Self
    where
        P: Fn(&V) -> bool + Send + Sync + 'static,
    {
        self.push_rule(RuleCommand::Valid(Arc::new(predicate)), Some(error))
    }

    /// A predicate over the parent model whose failure is reported on this
    /// member.
    pub fn as_relative<P>(&mut self, predicate: P) -> &mut Self
    where
        P: Fn(&M) -> bool + Send + Sync + 'static,
    {
        self.push_rule(RuleCommand::AsRelative(Arc::new(predicate)), None)
    }

    /// Validate the member as a nested model with an inline specification.
    pub fn as_model(&mut self, specification: Specification<V>) -> &mut Self {
        self.push_rule(RuleCommand::AsModel(ModelSource::Inline(specification)), None)
    }

    /// Validate the member as a nested model with the specification
    /// registered for `V`.
    pub fn as_registered_model(&mut self) -> &mut Self {
        self.push_rule(RuleCommand::AsModel(ModelSource::Registered(None)), None)
    }

    /// Validate the member with the specification registered for `V` under
    /// `key`.
    pub fn as_named_model(&mut self, key: impl Into<String>) -> &mut Self {
        self.push_rule(
            RuleCommand::AsModel(ModelSource::Registered(Some(key.into()))),
            None,
        )
    }

    /// Absence of this member is not an error.
    pub fn set_optional(&mut self) -> &mut Self {
        self.push(MemberCommand::SetOptional)
    }

    /// Message emitted when this member is absent.
    pub fn set_required(&mut self, message: impl Into<String>) -> &mut Self {
        self.push(MemberCommand::SetRequired(message.into()))
    }

    /// Collapse all rule findings of this member into one error.
    pub fn set_single_error(&mut self, message: impl Into<String>) -> &mut Self {
        self.push(MemberCommand::SetSingleError(message.into()))
    }

    /// Replace every finding of this member with one error (after the
    /// required error, if it fired).
    pub fn set_summary_error(&mut self, message: impl Into<String>) -> &mut Self {
        self.push(MemberCommand::SetSummaryError(message.into()))
    }

    /// Replace the message of the preceding rule.
    pub fn with_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.push(MemberCommand::WithMessage(message.into()))
    }
}

impl<M, V> MemberSpec<M, V>
where
    M: 'static,
    V: Collection + 'static,
    V::Item: Presence + 'static,
{
    /// Validate each item. Errors are keyed by item index.
    pub fn as_collection<S>(&mut self, spec: S) -> &mut Self
    where
        S: FnOnce(&mut MemberSpec<M, V::Item>),
    {
        let mut item = MemberSpec::new();
        spec(&mut item);
        let nested = CollectionCommand::<M, V> {
            item,
            _collection: PhantomData,
        };
        self.push_rule(RuleCommand::AsCollection(Box::new(nested)), None)
    }
}

impl<M: 'static, T: 'static> MemberSpec<M, Option<T>> {
    /// Validate the value inside the `Option`. Only `rule`, `as_relative`,
    /// `set_single_error` and `with_message` may be used inside.
    pub fn as_nullable<S>(&mut self, spec: S) -> &mut Self
    where
        S: FnOnce(&mut MemberSpec<M, T>),
    {
        let mut inner = MemberSpec::new();
        spec(&mut inner);
        self.push_rule(
            RuleCommand::AsNullable(Box::new(NullableCommand { inner })),
            None,
        )
    }
}
