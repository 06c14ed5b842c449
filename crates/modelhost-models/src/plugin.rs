//! Extension points for model implementations.

use crate::model::Model;
use modelhost_core::Result;
use std::collections::BTreeMap;

/// Zero-argument constructor for a model implementation
pub type ModelFactory = Box<dyn Fn() -> Result<Box<dyn Model>> + Send + Sync>;

/// A named unit of model implementations that configuration can refer to.
///
/// Implement this trait in external crates to ship several models behind one
/// module name; `PluginReference::module_name` selects the plugin and
/// `PluginReference::class_name` selects the implementation within it.
pub trait ModelPlugin: Send + Sync {
    /// Name configuration uses to refer to this module
    fn module_name(&self) -> &str;

    /// Implementation identifiers this module can construct
    fn class_names(&self) -> Vec<String>;

    /// Construct an implementation, or `None` if the module has no such class
    fn construct(&self, class_name: &str) -> Option<Result<Box<dyn Model>>>;
}

/// Table-backed module mapping class names to constructors
pub struct ModelModule {
    name: String,
    classes: BTreeMap<String, ModelFactory>,
}

impl ModelModule {
    /// Create an empty module
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            classes: BTreeMap::new(),
        }
    }

    /// Register a class with a custom constructor
    pub fn with_class<F>(mut self, class_name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Model>> + Send + Sync + 'static,
    {
        self.classes.insert(class_name.into(), Box::new(factory));
        self
    }

    /// Register a class constructed through `Default`
    pub fn with_default<M>(self, class_name: impl Into<String>) -> Self
    where
        M: Model + Default + 'static,
    {
        self.with_class(class_name, || Ok(Box::new(M::default()) as Box<dyn Model>))
    }
}

impl ModelPlugin for ModelModule {
    fn module_name(&self) -> &str {
        &self.name
    }

    fn class_names(&self) -> Vec<String> {
        self.classes.keys().cloned().collect()
    }

    fn construct(&self, class_name: &str) -> Option<Result<Box<dyn Model>>> {
        self.classes.get(class_name).map(|factory| factory())
    }
}
