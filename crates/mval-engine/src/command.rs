//! # Command IR
//!
//! Builders record what a specification declares as an ordered list of
//! commands. Order is significant: `WithMessage` attaches to the nearest
//! preceding rule, and single-use commands are checked for duplication in
//! declaration order. The compiler walks these lists once, left to right.
//!
//! Model-level builders emit [`ModelCommand`]s, member-level builders emit
//! [`MemberCommand`]s. Nested containers (`AsCollection`, `AsNullable`) and
//! member scopes carry their own already-recorded builder, erased behind a
//! trait object so the enclosing list stays homogeneous.

use std::sync::Arc;

use mval_core::{CompileError, Error};

use crate::builder::Specification;
use crate::validator::{MemberScope, NestedRule};

/// A boolean predicate over a model or member value.
pub(crate) type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Where an `AsModel` rule finds the nested specification.
pub(crate) enum ModelSource<V> {
    /// Given inline by the caller.
    Inline(Specification<V>),
    /// Looked up in the repository by type, optionally under an explicit key.
    Registered(Option<String>),
}

/// The five rule kinds a member scope can hold.
pub(crate) enum RuleCommand<M, V> {
    /// Leaf predicate over the member value.
    Valid(Predicate<V>),
    /// Predicate over the parent model; errors land on the member.
    AsRelative(Predicate<M>),
    /// Validate the member as a nested model.
    AsModel(ModelSource<V>),
    /// Validate each item of the member.
    AsCollection(Box<dyn NestedCommand<M, V>>),
    /// Validate the unwrapped value of an `Option` member.
    AsNullable(Box<dyn NestedCommand<M, V>>),
}

impl<M, V> RuleCommand<M, V> {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Valid(_) => "Valid",
            Self::AsRelative(_) => "AsRelative",
            Self::AsModel(_) => "AsModel",
            Self::AsCollection(_) => "AsCollection",
            Self::AsNullable(_) => "AsNullable",
        }
    }
}

/// One instruction recorded by a [`MemberSpec`](crate::MemberSpec).
pub(crate) enum MemberCommand<M, V> {
    /// A rule with its optional message / single-error slot.
    Rule {
        rule: RuleCommand<M, V>,
        error: Option<Error>,
    },
    SetOptional,
    SetRequired(String),
    SetSingleError(String),
    SetSummaryError(String),
    WithMessage(String),
}

impl<M, V> MemberCommand<M, V> {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Rule { rule, .. } => rule.name(),
            Self::SetOptional => "SetOptional",
            Self::SetRequired(_) => "SetRequired",
            Self::SetSingleError(_) => "SetSingleError",
            Self::SetSummaryError(_) => "SetSummaryError",
            Self::WithMessage(_) => "WithMessage",
        }
    }

    pub(crate) fn kind(&self) -> CommandKind {
        match self {
            Self::Rule { .. } => CommandKind::Rule,
            Self::WithMessage(_) => CommandKind::WithMessage,
            other => CommandKind::Other(other.name()),
        }
    }

    /// Commands accepted inside an `AsNullable` inner specification.
    pub(crate) fn allowed_in_nullable(&self) -> bool {
        matches!(
            self,
            Self::Rule {
                rule: RuleCommand::Valid(_) | RuleCommand::AsRelative(_),
                ..
            } | Self::SetSingleError(_)
                | Self::WithMessage(_)
        )
    }
}

/// One instruction recorded by a [`ModelSpec`](crate::ModelSpec).
pub(crate) enum ModelCommand<M> {
    /// A named member scope.
    Member(Box<dyn MemberScopeCommand<M>>),
    /// An unnamed model-level predicate ("Valid" scope).
    Rule {
        predicate: Predicate<M>,
        error: Option<Error>,
    },
    WithMessage(String),
    SetSummaryError(String),
}

impl<M> ModelCommand<M> {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Member(_) => "Member",
            Self::Rule { .. } => "Valid",
            Self::WithMessage(_) => "WithMessage",
            Self::SetSummaryError(_) => "SetSummaryError",
        }
    }

    pub(crate) fn kind(&self) -> CommandKind {
        match self {
            Self::Rule { .. } => CommandKind::Rule,
            Self::WithMessage(_) => CommandKind::WithMessage,
            other => CommandKind::Other(other.name()),
        }
    }
}

/// Coarse classification used by the `WithMessage` backward scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommandKind {
    Rule,
    WithMessage,
    Other(&'static str),
}

/// A recorded member scope whose value type is erased.
pub(crate) trait MemberScopeCommand<M> {
    fn name(&self) -> &str;

    fn compile(self: Box<Self>, scope: &str) -> Result<Box<dyn MemberScope<M>>, CompileError>;
}

/// A recorded nested container (`AsCollection` / `AsNullable`) whose inner
/// value type is erased.
pub(crate) trait NestedCommand<M, V> {
    fn compile(self: Box<Self>, scope: &str) -> Result<Box<dyn NestedRule<M, V>>, CompileError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> MemberCommand<(), u8> {
        MemberCommand::Rule {
            rule: RuleCommand::Valid(Arc::new(|_: &u8| true)),
            error: None,
        }
    }

    #[test]
    fn test_command_names() {
        assert_eq!(valid().name(), "Valid");
        assert_eq!(MemberCommand::<(), u8>::SetOptional.name(), "SetOptional");
        assert_eq!(
            MemberCommand::<(), u8>::WithMessage("m".into()).name(),
            "WithMessage"
        );
    }

    #[test]
    fn test_command_kinds() {
        assert_eq!(valid().kind(), CommandKind::Rule);
        assert_eq!(
            MemberCommand::<(), u8>::SetRequired("r".into()).kind(),
            CommandKind::Other("SetRequired")
        );
        assert_eq!(
            ModelCommand::<()>::WithMessage("m".into()).kind(),
            CommandKind::WithMessage
        );
    }

    #[test]
    fn test_nullable_allow_list() {
        assert!(valid().allowed_in_nullable());
        assert!(MemberCommand::<(), u8>::SetSingleError("s".into()).allowed_in_nullable());
        assert!(MemberCommand::<(), u8>::WithMessage("m".into()).allowed_in_nullable());
        assert!(!MemberCommand::<(), u8>::SetOptional.allowed_in_nullable());
        assert!(!MemberCommand::<(), u8>::SetRequired("r".into()).allowed_in_nullable());
        assert!(!MemberCommand::<(), u8>::SetSummaryError("s".into()).allowed_in_nullable());
        let as_model = MemberCommand::<(), u8>::Rule {
            rule: RuleCommand::AsModel(ModelSource::Registered(None)),
            error: None,
        };
        assert!(!as_model.allowed_in_nullable());
    }
}
