//! Entry point of the derivation pass.
//!
//! A [`SchemaCatalog`] owns a metadata provider and loads its model definitions
//! at most once. Concurrent callers of [`SchemaCatalog::ensure_loaded`] block until
//! the single initializer finishes; a failed load leaves the catalog unloaded so a
//! later call retries.

use log::{error, info};
use once_cell::sync::OnceCell;
use rayon::prelude::*;

use crate::builder::build_model;
use crate::config::SchemaConfig;
use crate::display_column::{DisplayColumnResolver, NameHeuristic};
use crate::enumerator;
use crate::errors::SchemaError;
use crate::provider::MetadataProvider;
use crate::registry::{ModelHandle, ModelRegistry};
use crate::schema::ModelSchema;

pub struct SchemaCatalog<P> {
    provider: P,
    config: SchemaConfig,
    display_column: Box<dyn DisplayColumnResolver>,
    registry: OnceCell<ModelRegistry>,
}

impl<P: MetadataProvider> SchemaCatalog<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, SchemaConfig::default())
    }

    pub fn with_config(provider: P, config: SchemaConfig) -> Self {
        Self {
            provider,
            config,
            display_column: Box::new(NameHeuristic),
            registry: OnceCell::new(),
        }
    }

    /// Replaces the default display-column heuristic.
    pub fn with_display_column(mut self, resolver: impl DisplayColumnResolver + 'static) -> Self {
        self.display_column = Box::new(resolver);
        self
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn is_loaded(&self) -> bool {
        self.registry.get().is_some()
    }

    /// Loads and indexes the provider's models on first use.
    pub fn ensure_loaded(&self) -> Result<&ModelRegistry, SchemaError> {
        self.registry.get_or_try_init(|| {
            let definitions = self.provider.load_models()?;
            let registry = ModelRegistry::build(definitions, &self.config)
                .map_err(|err| SchemaError::load(self.provider.describe(), err))?;
            info!("loaded {} models from {}", registry.len(), self.provider.describe());
            Ok(registry)
        })
    }

    /// Models eligible for the schema, in registry order.
    pub fn enumerate(&self) -> Result<Vec<&ModelHandle>, SchemaError> {
        let registry = self.ensure_loaded()?;
        Ok(enumerator::enumerate(registry, &self.config))
    }

    /// Runs the full derivation pass.
    ///
    /// Models whose introspection fails are dropped from the result; only a load
    /// failure is returned as an error.
    pub fn derive(&self) -> Result<Vec<ModelSchema>, SchemaError> {
        let models = self.enumerate()?;
        let build = |model: &&ModelHandle| self.build_or_skip(model);

        let schemas: Vec<Option<ModelSchema>> = if self.config.derive.parallel {
            models.par_iter().map(build).collect()
        } else {
            models.iter().map(build).collect()
        };

        Ok(schemas.into_iter().flatten().collect())
    }

    /// Schema of a single eligible model, looked up by class name.
    pub fn derive_model(&self, class_name: &str) -> Result<Option<ModelSchema>, SchemaError> {
        let models = self.enumerate()?;
        match models.into_iter().find(|model| model.class_name() == class_name) {
            Some(model) => build_model(model, &self.config, self.display_column.as_ref()).map(Some),
            None => Ok(None),
        }
    }

    fn build_or_skip(&self, model: &ModelHandle) -> Option<ModelSchema> {
        match build_model(model, &self.config, self.display_column.as_ref()) {
            Ok(schema) => Some(schema),
            Err(err) => {
                if model.class_name() != self.config.models.audit_model {
                    error!("skipping model {}: {}", model.class_name(), error_chain(&err));
                }
                None
            }
        }
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
