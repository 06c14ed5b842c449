//! Model registry initialization and management

use crate::loader::PluginLoader;
use crate::model::LoadedModel;
use modelhost_core::{Error, ModelDescriptor, PluginReference, Result};
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Registry of loaded models, keyed by qualified name
///
/// The registry is written exactly once by [`ModelRegistry::initialize`].
/// Until then it reads as empty; afterwards it never changes, so lookups take
/// no locks.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    contents: OnceLock<Contents>,
}

#[derive(Debug)]
struct Contents {
    /// Models in load order
    models: Vec<Arc<LoadedModel>>,

    /// Qualified name to position in `models`
    index: HashMap<String, usize>,
}

impl ModelRegistry {
    /// Create an empty, uninitialized registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the registry
    ///
    /// Fails if two models share a qualified name or if the registry has
    /// already been initialized; in both cases the registry is left as it was.
    pub fn initialize(&self, models: Vec<LoadedModel>) -> Result<()> {
        if self.is_initialized() {
            return Err(Error::config("model registry is already initialized"));
        }

        let mut index = HashMap::with_capacity(models.len());
        for (position, model) in models.iter().enumerate() {
            if index.insert(model.qualified_name().to_string(), position).is_some() {
                return Err(Error::config(format!(
                    "duplicate qualified name '{}'",
                    model.qualified_name()
                )));
            }
        }

        let contents = Contents {
            models: models.into_iter().map(Arc::new).collect(),
            index,
        };
        let count = contents.models.len();

        self.contents
            .set(contents)
            .map_err(|_| Error::config("model registry is already initialized"))?;

        info!("Model registry initialized with {} models", count);
        Ok(())
    }

    /// Whether `initialize` has completed
    pub fn is_initialized(&self) -> bool {
        self.contents.get().is_some()
    }

    /// Number of loaded models
    pub fn len(&self) -> usize {
        self.contents.get().map_or(0, |c| c.models.len())
    }

    /// Whether no models are loaded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Descriptors of all loaded models, in load order
    pub fn list(&self) -> Vec<ModelDescriptor> {
        self.contents
            .get()
            .map(|c| c.models.iter().map(|m| m.descriptor().clone()).collect())
            .unwrap_or_default()
    }

    /// Look up a model by qualified name
    pub fn get(&self, qualified_name: &str) -> Option<Arc<LoadedModel>> {
        let contents = self.contents.get()?;
        contents
            .index
            .get(qualified_name)
            .map(|&position| Arc::clone(&contents.models[position]))
    }

    /// Look up a model's descriptor by qualified name
    pub fn metadata(&self, qualified_name: &str) -> Option<ModelDescriptor> {
        self.get(qualified_name).map(|m| m.descriptor().clone())
    }
}

/// Shared model registry for application-wide use
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    registry: Arc<ModelRegistry>,
}

impl SharedRegistry {
    /// Create a new shared registry
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Run the load phase: resolve every reference and initialize the registry
    ///
    /// Nothing is visible to readers unless every reference loads.
    pub fn load(loader: &PluginLoader, references: &[PluginReference]) -> Result<Self> {
        let models = loader.load_all(references)?;
        let registry = ModelRegistry::new();
        registry.initialize(models)?;
        Ok(Self::new(registry))
    }

    /// Get reference to the registry
    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// Clone the Arc for sharing across threads
    pub fn clone_arc(&self) -> Arc<ModelRegistry> {
        Arc::clone(&self.registry)
    }
}

impl Deref for SharedRegistry {
    type Target = ModelRegistry;

    fn deref(&self) -> &Self::Target {
        &self.registry
    }
}
