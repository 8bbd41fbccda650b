//! # Nested Containers
//!
//! `AsModel`, `AsCollection` and `AsNullable` all re-enter validation one
//! level down. Collections and nullables re-run the member algorithm over
//! their items; nested models re-run the model algorithm at `depth + 1`.
//!
//! Nested models are resolved lazily, on first execution, so that
//! self-referential specifications compile in finite time. Only the depth
//! counter bounds how far they recurse.

use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

use mval_core::{CompileError, ErrorsCollection, ExecutionError};

use crate::builder::MemberSpec;
use crate::command::{ModelSource, NestedCommand};
use crate::compiler;
use crate::executor::{self, ExecutionContext};
use crate::presence::{Collection, Presence};
use crate::validator::{MemberValidator, NestedRule, Validator};

// ─── AsModel ─────────────────────────────────────────────────────────

/// A nested model rule, resolved on first use.
pub(crate) struct NestedModel<V> {
    source: ModelSource<V>,
    resolved: OnceLock<Arc<Validator<V>>>,
}

impl<V: 'static> NestedModel<V> {
    pub(crate) fn new(source: ModelSource<V>) -> Self {
        Self {
            source,
            resolved: OnceLock::new(),
        }
    }

    /// The nested validator. Inline specifications are compiled once and
    /// kept here; registered ones go through the engine cache.
    pub(crate) fn resolve(
        &self,
        ctx: &ExecutionContext<'_>,
    ) -> Result<Arc<Validator<V>>, ExecutionError> {
        match &self.source {
            ModelSource::Inline(specification) => {
                if let Some(validator) = self.resolved.get() {
                    return Ok(Arc::clone(validator));
                }
                let compiled = Arc::new(compiler::compile(specification)?);
                Ok(Arc::clone(self.resolved.get_or_init(|| compiled)))
            }
            ModelSource::Registered(key) => Ok(ctx.registered::<V>(key.as_deref())?),
        }
    }
}

// ─── AsCollection ────────────────────────────────────────────────────

pub(crate) struct CollectionCommand<M, V: Collection> {
    pub(crate) item: MemberSpec<M, V::Item>,
    pub(crate) _collection: PhantomData<fn() -> V>,
}

impl<M, V> NestedCommand<M, V> for CollectionCommand<M, V>
where
    M: 'static,
    V: Collection + 'static,
    V::Item: Presence + 'static,
{
    fn compile(self: Box<Self>, scope: &str) -> Result<Box<dyn NestedRule<M, V>>, CompileError> {
        let item = compiler::compile_member(self.item.into_commands(), &format!("{scope}[]"))?;
        Ok(Box::new(CollectionRule::<M, V> {
            item,
            _collection: PhantomData,
        }))
    }
}

/// Validates every item of a collection with one member validator.
pub(crate) struct CollectionRule<M, V: Collection> {
    item: MemberValidator<M, V::Item>,
    _collection: PhantomData<fn() -> V>,
}

impl<M, V> NestedRule<M, V> for CollectionRule<M, V>
where
    M: 'static,
    V: Collection + 'static,
    V::Item: Presence + 'static,
{
    fn execute(
        &self,
        model: Option<&M>,
        value: Option<&V>,
        ctx: &ExecutionContext<'_>,
        depth: usize,
    ) -> Result<ErrorsCollection, ExecutionError> {
        let mut found = ErrorsCollection::new();

        // Under force there is no instance: one synthetic item stands for all.
        if ctx.options.strategy.is_force() {
            let item = executor::execute_member(&self.item, model, None, ctx, depth)?;
            found.add_member(ctx.options.collection_force_key.as_str(), item);
            return Ok(found);
        }

        let Some(items) = value else {
            return Ok(found);
        };
        let stop_early = ctx.options.strategy.stops_early(false);
        for (index, item) in items.items().enumerate() {
            let present = Some(item).filter(|i| i.is_present());
            let result = executor::execute_member(&self.item, model, present, ctx, depth)?;
            let failed = !result.is_empty();
            found.add_member(index.to_string(), result);
            if failed && stop_early {
                break;
            }
        }
        Ok(found)
    }
}

// ─── AsNullable ──────────────────────────────────────────────────────

pub(crate) struct NullableCommand<M, T> {
    pub(crate) inner: MemberSpec<M, T>,
}

impl<M: 'static, T: 'static> NestedCommand<M, Option<T>> for NullableCommand<M, T> {
    fn compile(
        self: Box<Self>,
        scope: &str,
    ) -> Result<Box<dyn NestedRule<M, Option<T>>>, CompileError> {
        let inner = compiler::compile_nullable(self.inner.into_commands(), &format!("{scope}?"))?;
        Ok(Box::new(NullableRule { inner }))
    }
}

/// Runs a restricted member validator over the unwrapped value.
pub(crate) struct NullableRule<M, T> {
    inner: MemberValidator<M, T>,
}

impl<M: 'static, T: 'static> NestedRule<M, Option<T>> for NullableRule<M, T> {
    fn execute(
        &self,
        model: Option<&M>,
        value: Option<&Option<T>>,
        ctx: &ExecutionContext<'_>,
        depth: usize,
    ) -> Result<ErrorsCollection, ExecutionError> {
        let unwrapped = value.and_then(Option::as_ref);
        executor::execute_member(&self.inner, model, unwrapped, ctx, depth)
    }
}
