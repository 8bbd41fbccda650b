//! # Compiler
//!
//! Turns recorded command lists into compiled validators in a single left to
//! right pass per scope.
//!
//! ## Ordering Rules
//!
//! - `SetOptional`, `SetRequired`, `SetSingleError` and `SetSummaryError`
//!   appear at most once per scope.
//! - `WithMessage` attaches to the nearest preceding rule. Scanning backward
//!   it may skip other `WithMessage` commands and nothing else.
//! - Inside `AsNullable` only `Valid`, `AsRelative`, `SetSingleError` and
//!   `WithMessage` are accepted.
//!
//! Scope paths in errors are dotted member names; `[]` marks a collection
//! item and `?` the inside of a nullable.

use mval_core::{CompileError, Error};
use tracing::debug;

use crate::builder::{ModelSpec, Specification};
use crate::command::{CommandKind, MemberCommand, ModelCommand, RuleCommand};
use crate::nested::NestedModel;
use crate::validator::{MemberValidator, ModelRule, Rule, RuleKind, Scope, SingleError, Validator};

/// Compile a specification.
///
/// Nested `as_model` specifications are not compiled here. They compile on
/// first execution, which lets a specification refer to itself.
///
/// # Errors
///
/// Returns a [`CompileError`] describing the first misplaced, duplicated or
/// restricted command.
pub fn compile<M: 'static>(specification: &Specification<M>) -> Result<Validator<M>, CompileError> {
    let mut builder = ModelSpec::new();
    specification(&mut builder);
    let validator = compile_model(builder.into_commands(), "")?;
    debug!(
        model = std::any::type_name::<M>(),
        scopes = validator.scope_count(),
        rules = validator.rule_count(),
        "compiled specification"
    );
    Ok(validator)
}

pub(crate) fn compile_model<M: 'static>(
    commands: Vec<ModelCommand<M>>,
    scope: &str,
) -> Result<Validator<M>, CompileError> {
    let kinds: Vec<CommandKind> = commands.iter().map(ModelCommand::kind).collect();
    let mut scopes: Vec<Scope<M>> = Vec::new();
    let mut summary: Option<SingleError> = None;
    // Command index -> position of the model rule it produced.
    let mut slots: Vec<Option<usize>> = Vec::with_capacity(commands.len());

    for (index, command) in commands.into_iter().enumerate() {
        let mut slot = None;
        match command {
            ModelCommand::Member(member) => {
                let path = join(scope, member.name());
                scopes.push(Scope::Member(member.compile(&path)?));
            }
            ModelCommand::Rule { predicate, error } => {
                slot = Some(scopes.len());
                scopes.push(Scope::Model(ModelRule {
                    predicate,
                    error: error.map(SingleError::new),
                }));
            }
            ModelCommand::WithMessage(message) => {
                let target = find_message_target(&kinds, index, scope)?;
                let rule_at = slots.get(target).copied().flatten();
                if let Some(Scope::Model(rule)) = rule_at.and_then(|at| scopes.get_mut(at)) {
                    rule.override_message(&message);
                }
            }
            ModelCommand::SetSummaryError(message) => {
                if summary.is_some() {
                    return Err(duplicate("SetSummaryError", index, scope));
                }
                summary = Some(SingleError::new(Error::new(message)));
            }
        }
        slots.push(slot);
    }

    Ok(Validator { scopes, summary })
}

pub(crate) fn compile_member<M: 'static, V: 'static>(
    commands: Vec<MemberCommand<M, V>>,
    scope: &str,
) -> Result<MemberValidator<M, V>, CompileError> {
    let kinds: Vec<CommandKind> = commands.iter().map(MemberCommand::kind).collect();
    let mut validator = MemberValidator::new();
    let mut slots: Vec<Option<usize>> = Vec::with_capacity(commands.len());

    for (index, command) in commands.into_iter().enumerate() {
        let mut slot = None;
        match command {
            MemberCommand::Rule { rule, error } => {
                slot = Some(validator.rules.len());
                validator.rules.push(compile_rule(rule, error, scope)?);
            }
            MemberCommand::SetOptional => {
                if validator.optional {
                    return Err(duplicate("SetOptional", index, scope));
                }
                validator.optional = true;
            }
            MemberCommand::SetRequired(message) => {
                if validator.required.is_some() {
                    return Err(duplicate("SetRequired", index, scope));
                }
                validator.required = Some(Error::new(message));
            }
            MemberCommand::SetSingleError(message) => {
                if validator.single.is_some() {
                    return Err(duplicate("SetSingleError", index, scope));
                }
                validator.single = Some(SingleError::new(Error::new(message)));
            }
            MemberCommand::SetSummaryError(message) => {
                if validator.summary.is_some() {
                    return Err(duplicate("SetSummaryError", index, scope));
                }
                validator.summary = Some(Error::new(message));
            }
            MemberCommand::WithMessage(message) => {
                let target = find_message_target(&kinds, index, scope)?;
                let rule_at = slots.get(target).copied().flatten();
                if let Some(rule) = rule_at.and_then(|at| validator.rules.get_mut(at)) {
                    rule.override_message(&message);
                }
            }
        }
        slots.push(slot);
    }

    Ok(validator)
}

/// Compile the inner specification of `AsNullable`. The inner value is
/// never required: absence is the outer member's concern.
pub(crate) fn compile_nullable<M: 'static, T: 'static>(
    commands: Vec<MemberCommand<M, T>>,
    scope: &str,
) -> Result<MemberValidator<M, T>, CompileError> {
    if let Some((index, command)) = commands
        .iter()
        .enumerate()
        .find(|(_, command)| !command.allowed_in_nullable())
    {
        return Err(CompileError::RestrictedCommand {
            command: command.name(),
            index,
            container: "AsNullable",
            scope: scope.to_string(),
        });
    }
    let mut validator = compile_member(commands, scope)?;
    validator.optional = true;
    Ok(validator)
}

fn compile_rule<M: 'static, V: 'static>(
    rule: RuleCommand<M, V>,
    error: Option<Error>,
    scope: &str,
) -> Result<Rule<M, V>, CompileError> {
    let kind = match rule {
        RuleCommand::Valid(predicate) => RuleKind::Valid(predicate),
        RuleCommand::AsRelative(predicate) => RuleKind::AsRelative(predicate),
        RuleCommand::AsModel(source) => RuleKind::AsModel(NestedModel::new(source)),
        RuleCommand::AsCollection(nested) => RuleKind::AsCollection(nested.compile(scope)?),
        RuleCommand::AsNullable(nested) => RuleKind::AsNullable(nested.compile(scope)?),
    };
    Ok(Rule {
        kind,
        error: error.map(SingleError::new),
    })
}

/// Index of the rule a `WithMessage` at `index` attaches to.
pub(crate) fn find_message_target(
    kinds: &[CommandKind],
    index: usize,
    scope: &str,
) -> Result<usize, CompileError> {
    let misplaced = |reason: String| CompileError::MisplacedWithMessage {
        index,
        scope: scope.to_string(),
        reason,
    };
    if index == 0 {
        return Err(misplaced("it is the first command of the scope".into()));
    }
    for (target, kind) in kinds.iter().enumerate().take(index).rev() {
        match kind {
            CommandKind::Rule => return Ok(target),
            CommandKind::WithMessage => continue,
            CommandKind::Other(name) => {
                return Err(misplaced(format!("it follows '{name}' at index {target}")));
            }
        }
    }
    Err(misplaced("no rule precedes it".into()))
}

fn duplicate(command: &'static str, index: usize, scope: &str) -> CompileError {
    CompileError::DuplicateCommand {
        command,
        index,
        scope: scope.to_string(),
    }
}

fn join(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}.{name}")
    }
}
