//! # Executor
//!
//! One recursive algorithm walks a compiled validator over a model:
//! [`execute_model`] for model nodes and [`execute_member`] for members,
//! collection items and nullable values alike.
//!
//! ## Strategies
//!
//! - `Complete` runs every rule and scope.
//! - `FailFast` stops a node after its first failing child. A node that
//!   declares a summary error behaves this way under `Complete` too, for its
//!   own children only.
//! - `Force` treats every member as absent and every rule as failing.
//!   Predicates are never called, so no model instance is needed.
//!
//! ## Depth
//!
//! The root model runs at depth 0 and every nested model adds one. A model
//! node deeper than `max_depth` aborts the call. This is the only guard
//! against cyclic graphs; a cycle and a very deep acyclic graph look the
//! same to it.

use std::sync::Arc;

use mval_core::{CompileError, ErrorsCollection, ExecutionError, ExecutionOptions};
use tracing::warn;

use crate::cache::ValidatorCache;
use crate::compiler;
use crate::repository::SpecificationRepository;
use crate::validator::{MemberValidator, Rule, RuleKind, Scope, Validator};

/// Everything a validation call reads besides the model.
pub(crate) struct ExecutionContext<'a> {
    pub(crate) options: &'a ExecutionOptions,
    pub(crate) repository: &'a SpecificationRepository,
    pub(crate) cache: &'a ValidatorCache,
}

impl ExecutionContext<'_> {
    /// The cached validator for the specification registered for `M`.
    pub(crate) fn registered<M: 'static>(
        &self,
        key: Option<&str>,
    ) -> Result<Arc<Validator<M>>, CompileError> {
        self.cache.get_or_compile::<M, _>(key, || {
            let specification = self.repository.get::<M>(key)?;
            compiler::compile(&specification)
        })
    }
}

/// Validate a model node. `model` is `None` under `Force` without an
/// instance.
pub(crate) fn execute_model<M>(
    validator: &Validator<M>,
    model: Option<&M>,
    ctx: &ExecutionContext<'_>,
    depth: usize,
) -> Result<ErrorsCollection, ExecutionError> {
    let max_depth = ctx.options.max_depth;
    if depth > max_depth {
        warn!(
            model = std::any::type_name::<M>(),
            depth, max_depth, "maximum validation depth exceeded"
        );
        return Err(ExecutionError::MaxDepthExceeded { max_depth });
    }

    let strategy = ctx.options.strategy;
    let stop_early = strategy.stops_early(validator.summary.is_some());
    let mut found = ErrorsCollection::new();

    for scope in &validator.scopes {
        let failed = match scope {
            Scope::Member(member) => {
                let result = member.execute(model, ctx, depth)?;
                let failed = !result.is_empty();
                found.add_member(member.name(), result);
                failed
            }
            Scope::Model(rule) => {
                let invalid = strategy.is_force() || model.is_some_and(|m| !(rule.predicate)(m));
                if invalid {
                    match &rule.error {
                        Some(single) => found.include(single.collection().clone()),
                        None => found.add_error(ctx.options.default_error.clone()),
                    }
                }
                invalid
            }
        };
        if failed && stop_early {
            break;
        }
    }

    if let Some(summary) = &validator.summary {
        if !found.is_empty() {
            return Ok(summary.collection().clone());
        }
    }
    Ok(found)
}

/// Validate one member value (or collection item, or unwrapped nullable).
/// `value` is `None` when the member does not exist.
pub(crate) fn execute_member<M: 'static, V: 'static>(
    validator: &MemberValidator<M, V>,
    model: Option<&M>,
    value: Option<&V>,
    ctx: &ExecutionContext<'_>,
    depth: usize,
) -> Result<ErrorsCollection, ExecutionError> {
    let strategy = ctx.options.strategy;
    let force = strategy.is_force();
    let value = if force { None } else { value };
    let stop_early = strategy.stops_early(validator.summary.is_some());

    let required = (!validator.optional && (value.is_none() || force)).then(|| {
        validator
            .required
            .clone()
            .unwrap_or_else(|| ctx.options.required_error.clone())
    });

    let mut found = ErrorsCollection::new();
    let skip_rules = stop_early && required.is_some();
    if !skip_rules && (value.is_some() || force) {
        for rule in &validator.rules {
            let result = execute_rule(rule, model, value, ctx, depth)?;
            let failed = !result.is_empty();
            found.include(result);
            if failed && stop_early {
                break;
            }
        }
    }

    if let Some(summary) = &validator.summary {
        if required.is_none() && found.is_empty() {
            return Ok(ErrorsCollection::new());
        }
        let mut collapsed = ErrorsCollection::with_single_or_none(required).unwrap_or_default();
        collapsed.add_error(summary.clone());
        return Ok(collapsed);
    }

    if let Some(single) = &validator.single {
        found = single.collapse(found);
    }
    let mut result = ErrorsCollection::with_single_or_none(required).unwrap_or_default();
    result.include(found);
    Ok(result)
}

fn execute_rule<M: 'static, V: 'static>(
    rule: &Rule<M, V>,
    model: Option<&M>,
    value: Option<&V>,
    ctx: &ExecutionContext<'_>,
    depth: usize,
) -> Result<ErrorsCollection, ExecutionError> {
    let force = ctx.options.strategy.is_force();
    match &rule.kind {
        RuleKind::Valid(predicate) => {
            let invalid = force || value.is_some_and(|v| !predicate(v));
            Ok(if invalid {
                rule.failure(ctx.options)
            } else {
                ErrorsCollection::new()
            })
        }
        RuleKind::AsRelative(predicate) => {
            let invalid = force || model.is_some_and(|m| !predicate(m));
            Ok(if invalid {
                rule.failure(ctx.options)
            } else {
                ErrorsCollection::new()
            })
        }
        RuleKind::AsModel(nested) => {
            let validator = nested.resolve(ctx)?;
            let result = execute_model(&validator, value, ctx, depth + 1)?;
            Ok(rule.collapse(result))
        }
        RuleKind::AsCollection(nested) | RuleKind::AsNullable(nested) => {
            let result = nested.execute(model, value, ctx, depth)?;
            Ok(rule.collapse(result))
        }
    }
}
