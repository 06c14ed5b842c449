//! Plugin loader resolving configuration entries into loaded models
//!
//! This is the only place where configuration data selects code to run. A
//! [`PluginReference`] names a registered [`ModelPlugin`] module and a class
//! within it; the loader constructs the class, probes it against the model
//! contract and wraps it as a [`LoadedModel`].

use crate::iris;
use crate::model::LoadedModel;
use crate::plugin::ModelPlugin;
use modelhost_core::{Error, JsonSchema, PluginReference, Result, SchemaType};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Registration table of model plugin modules
#[derive(Default)]
pub struct PluginLoader {
    modules: HashMap<String, Box<dyn ModelPlugin>>,
}

impl std::fmt::Debug for PluginLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginLoader")
            .field("modules", &self.module_names())
            .finish()
    }
}

impl PluginLoader {
    /// Create a loader with no registered modules
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with the models that ship with the host
    pub fn with_builtin_models() -> Self {
        let mut loader = Self::new();
        loader.modules.insert(
            iris::IRIS_MODULE.to_string(),
            Box::new(iris::module()),
        );
        loader
    }

    /// Register a plugin module
    pub fn register(&mut self, plugin: impl ModelPlugin + 'static) -> Result<&mut Self> {
        let name = plugin.module_name().to_string();
        if self.modules.contains_key(&name) {
            return Err(Error::config(format!(
                "module '{}' is already registered",
                name
            )));
        }

        debug!(module = %name, classes = ?plugin.class_names(), "Registered model module");
        self.modules.insert(name, Box::new(plugin));
        Ok(self)
    }

    /// Names of all registered modules
    pub fn module_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.keys().cloned().collect();
        names.sort();
        names
    }

    /// Resolve a single reference into a loaded model
    pub fn load(&self, reference: &PluginReference) -> Result<LoadedModel> {
        let module = self.modules.get(&reference.module_name).ok_or_else(|| {
            Error::config(format!("module '{}' could not be found", reference.module_name))
        })?;

        let model = module
            .construct(&reference.class_name)
            .ok_or_else(|| {
                Error::config(format!(
                    "class '{}' does not exist in module '{}'",
                    reference.class_name, reference.module_name
                ))
            })?
            .map_err(|e| {
                Error::config(format!("failed to construct '{}': {}", reference, e))
            })?;

        let loaded = LoadedModel::new(Arc::from(model));
        verify_contract(&loaded).map_err(|reason| {
            Error::config(format!(
                "'{}' does not satisfy the model contract: {}",
                reference, reason
            ))
        })?;

        info!(
            module = %reference.module_name,
            class = %reference.class_name,
            qualified_name = %loaded.qualified_name(),
            "Loaded model"
        );

        Ok(loaded)
    }

    /// Resolve every reference in order, failing the whole batch on the first error
    pub fn load_all(&self, references: &[PluginReference]) -> Result<Vec<LoadedModel>> {
        info!("Loading {} models", references.len());

        let mut seen = HashSet::new();
        let mut loaded = Vec::with_capacity(references.len());

        for reference in references {
            let model = self.load(reference)?;
            if !seen.insert(model.qualified_name().to_string()) {
                return Err(Error::config(format!(
                    "duplicate qualified name '{}' (from '{}')",
                    model.qualified_name(),
                    reference
                )));
            }
            loaded.push(model);
        }

        Ok(loaded)
    }
}

/// Capability probe run on every freshly constructed model
fn verify_contract(model: &LoadedModel) -> std::result::Result<(), String> {
    let descriptor = model.descriptor();

    if descriptor.qualified_name.trim().is_empty() {
        return Err("qualified name is empty".to_string());
    }
    if descriptor.display_name.trim().is_empty() {
        return Err("display name is empty".to_string());
    }

    verify_schema("input", &descriptor.input_schema)?;
    verify_schema("output", &descriptor.output_schema)
}

fn verify_schema(which: &str, schema: &JsonSchema) -> std::result::Result<(), String> {
    if schema.schema_type != SchemaType::Object {
        return Err(format!(
            "{} schema must describe an object, not {}",
            which, schema.schema_type
        ));
    }

    if let Some(missing) = schema
        .required
        .iter()
        .find(|name| !schema.properties.contains_key(*name))
    {
        return Err(format!(
            "{} schema requires undeclared property '{}'",
            which, missing
        ));
    }

    Ok(())
}
