//! # Validation Engine
//!
//! Assembles the inputs the executor needs (a specification repository, a
//! validator cache, default execution options) and hands out
//! [`CompiledValidator`]s bound to them.
//!
//! The engine is cheap to clone and safe to share across threads; clones
//! share one repository and one cache.

use std::fmt;
use std::sync::Arc;

use mval_core::{
    CompileError, ErrorsCollection, ExecutionError, ExecutionOptions, MvalError, SettingsError,
    ValidationSettings, ValidationStrategy,
};

use crate::builder::Specification;
use crate::cache::ValidatorCache;
use crate::compiler;
use crate::executor::{self, ExecutionContext};
use crate::repository::SpecificationRepository;
use crate::validator::Validator;

struct EngineInner {
    repository: SpecificationRepository,
    cache: ValidatorCache,
    options: ExecutionOptions,
}

/// Entry point for compiling and running validators.
#[derive(Clone)]
pub struct ValidationEngine {
    inner: Arc<EngineInner>,
}

impl ValidationEngine {
    /// An engine with an empty repository and default options.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring an engine.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Default options for calls that do not pass their own.
    pub fn options(&self) -> &ExecutionOptions {
        &self.inner.options
    }

    /// The repository nested models are resolved from.
    pub fn repository(&self) -> &SpecificationRepository {
        &self.inner.repository
    }

    /// The compiled-validator cache.
    pub fn cache(&self) -> &ValidatorCache {
        &self.inner.cache
    }

    /// Compile a specification without caching it.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] for a malformed specification.
    pub fn compile<M: 'static>(
        &self,
        specification: &Specification<M>,
    ) -> Result<CompiledValidator<M>, CompileError> {
        let validator = compiler::compile(specification)?;
        Ok(self.bind(Arc::new(validator)))
    }

    /// Compile a specification once and cache it under `key`. Later calls
    /// with the same model type and key return the cached validator and
    /// ignore `specification`.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] for a malformed specification.
    pub fn compile_keyed<M: 'static>(
        &self,
        key: &str,
        specification: &Specification<M>,
    ) -> Result<CompiledValidator<M>, CompileError> {
        let validator = self
            .inner
            .cache
            .get_or_compile::<M, _>(Some(key), || compiler::compile(specification))?;
        Ok(self.bind(validator))
    }

    /// The cached validator for the specification registered for `M`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::SpecificationNotFound`] if `M` is not
    /// registered, or the error of a malformed specification.
    pub fn validator<M: 'static>(&self) -> Result<CompiledValidator<M>, CompileError> {
        self.resolve(None)
    }

    /// The cached validator for the specification registered for `M` under
    /// `key`.
    ///
    /// # Errors
    ///
    /// Same as [`ValidationEngine::validator`].
    pub fn named_validator<M: 'static>(
        &self,
        key: &str,
    ) -> Result<CompiledValidator<M>, CompileError> {
        self.resolve(Some(key))
    }

    /// Validate a model with its registered specification and the engine's
    /// default options.
    ///
    /// # Errors
    ///
    /// Returns [`MvalError::Compile`] if no usable specification is
    /// registered and [`MvalError::Execution`] if the run aborts.
    pub fn validate<M: 'static>(&self, model: &M) -> Result<ErrorsCollection, MvalError> {
        Ok(self.validator::<M>()?.validate(model)?)
    }

    fn resolve<M: 'static>(&self, key: Option<&str>) -> Result<CompiledValidator<M>, CompileError> {
        let validator = self.context(&self.inner.options).registered::<M>(key)?;
        Ok(self.bind(validator))
    }

    fn bind<M>(&self, validator: Arc<Validator<M>>) -> CompiledValidator<M> {
        CompiledValidator {
            validator,
            engine: self.clone(),
        }
    }

    fn context<'a>(&'a self, options: &'a ExecutionOptions) -> ExecutionContext<'a> {
        ExecutionContext {
            options,
            repository: &self.inner.repository,
            cache: &self.inner.cache,
        }
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("repository", &self.inner.repository)
            .field("cache", &self.inner.cache)
            .field("options", &self.inner.options)
            .finish()
    }
}

// ─── Builder ─────────────────────────────────────────────────────────

/// Configures a [`ValidationEngine`].
#[derive(Debug, Default)]
pub struct EngineBuilder {
    repository: SpecificationRepository,
    options: ExecutionOptions,
}

impl EngineBuilder {
    /// Replace the repository.
    pub fn repository(mut self, repository: SpecificationRepository) -> Self {
        self.repository = repository;
        self
    }

    /// Register the default specification for `M`.
    pub fn register<M: 'static>(mut self, specification: Specification<M>) -> Self {
        self.repository.register(specification);
        self
    }

    /// Register a specification for `M` under `key`.
    pub fn register_named<M: 'static>(
        mut self,
        key: impl Into<String>,
        specification: Specification<M>,
    ) -> Self {
        self.repository.register_named(key, specification);
        self
    }

    /// Replace the default execution options.
    pub fn options(mut self, options: ExecutionOptions) -> Self {
        self.options = options;
        self
    }

    /// Use options loaded from settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidValue`] if the settings are unusable.
    pub fn settings(mut self, settings: ValidationSettings) -> Result<Self, SettingsError> {
        self.options = settings.into_options()?;
        Ok(self)
    }

    /// Finish configuration.
    pub fn build(self) -> ValidationEngine {
        ValidationEngine {
            inner: Arc::new(EngineInner {
                repository: self.repository,
                cache: ValidatorCache::new(),
                options: self.options,
            }),
        }
    }
}

// ─── Compiled Validator ──────────────────────────────────────────────

/// A compiled validator bound to the engine that produced it.
pub struct CompiledValidator<M> {
    validator: Arc<Validator<M>>,
    engine: ValidationEngine,
}

impl<M: 'static> CompiledValidator<M> {
    /// Validate with the engine's default options.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::MaxDepthExceeded`] when nested models
    /// recurse too deep, or [`ExecutionError::Compile`] when a nested
    /// specification cannot be resolved.
    pub fn validate(&self, model: &M) -> Result<ErrorsCollection, ExecutionError> {
        self.run(Some(model), self.engine.options())
    }

    /// Validate under another strategy, keeping the other default options.
    ///
    /// # Errors
    ///
    /// Same as [`CompiledValidator::validate`].
    pub fn validate_with(
        &self,
        model: &M,
        strategy: ValidationStrategy,
    ) -> Result<ErrorsCollection, ExecutionError> {
        let options = self.engine.options().with_strategy(strategy);
        self.run(Some(model), &options)
    }

    /// Validate with explicit options.
    ///
    /// # Errors
    ///
    /// Same as [`CompiledValidator::validate`].
    pub fn validate_with_options(
        &self,
        model: &M,
        options: &ExecutionOptions,
    ) -> Result<ErrorsCollection, ExecutionError> {
        self.run(Some(model), options)
    }

    /// Whether the model has no findings. Runs fail-fast.
    ///
    /// # Errors
    ///
    /// Same as [`CompiledValidator::validate`].
    pub fn is_valid(&self, model: &M) -> Result<bool, ExecutionError> {
        Ok(self
            .validate_with(model, ValidationStrategy::FailFast)?
            .is_empty())
    }

    /// Every error this validator can produce, materialized under the force
    /// strategy without a model instance.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::MaxDepthExceeded`] for specifications that
    /// nest themselves, since force recursion never meets an absent member.
    pub fn template(&self) -> Result<ErrorsCollection, ExecutionError> {
        let options = self.engine.options().with_strategy(ValidationStrategy::Force);
        self.run(None, &options)
    }

    /// The underlying compiled validator.
    pub fn validator(&self) -> &Validator<M> {
        &self.validator
    }

    fn run(
        &self,
        model: Option<&M>,
        options: &ExecutionOptions,
    ) -> Result<ErrorsCollection, ExecutionError> {
        let ctx = self.engine.context(options);
        executor::execute_model(&self.validator, model, &ctx, 0)
    }
}

impl<M> Clone for CompiledValidator<M> {
    fn clone(&self) -> Self {
        Self {
            validator: Arc::clone(&self.validator),
            engine: self.engine.clone(),
        }
    }
}

impl<M> fmt::Debug for CompiledValidator<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledValidator")
            .field("validator", &self.validator)
            .finish()
    }
}
