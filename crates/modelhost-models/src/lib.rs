//! Model Host Models
//!
//! Registry and prediction dispatch for pluggable predictive models.
//!
//! The flow is:
//! - A [`PluginLoader`] resolves configured [`PluginReference`]s into models
//! - The models populate a [`ModelRegistry`] once, before any request is served
//! - A [`Dispatcher`] looks models up, validates payloads with the
//!   [`RequestValidator`] and invokes predictions
//!
//! [`PluginReference`]: modelhost_core::PluginReference

pub mod dispatcher;
pub mod iris;
pub mod loader;
pub mod model;
pub mod plugin;
pub mod registry;
pub mod validator;

pub use dispatcher::{Dispatcher, Stage, PREDICTION_FAILED};
pub use iris::IrisModel;
pub use loader::PluginLoader;
pub use model::{LoadedModel, Model};
pub use plugin::{ModelFactory, ModelModule, ModelPlugin};
pub use registry::{ModelRegistry, SharedRegistry};
pub use validator::RequestValidator;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::dispatcher::Dispatcher;
    pub use crate::loader::PluginLoader;
    pub use crate::model::{LoadedModel, Model};
    pub use crate::plugin::{ModelModule, ModelPlugin};
    pub use crate::registry::{ModelRegistry, SharedRegistry};
    pub use modelhost_core::prelude::*;
}
