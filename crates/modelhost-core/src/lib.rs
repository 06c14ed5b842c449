//! Model Host Core
//!
//! Core types and error handling shared across model host components.
//!
//! This crate provides:
//! - The error taxonomy surfaced by the prediction core
//! - Model descriptors and catalog summaries
//! - JSON-Schema-like documents describing model inputs and outputs
//! - Plugin references consumed by the loader

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    ErrorBody, JsonSchema, ModelCollection, ModelDescriptor, ModelSummary, PluginReference,
    SchemaProperty, SchemaType, INPUT_SCHEMA_ID, JSON_SCHEMA_DRAFT, OUTPUT_SCHEMA_ID,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{JsonSchema, ModelDescriptor, PluginReference, SchemaProperty, SchemaType};
}
