//! Model trait and loaded model wrapper

use async_trait::async_trait;
use modelhost_core::{
    JsonSchema, ModelDescriptor, Result, INPUT_SCHEMA_ID, JSON_SCHEMA_DRAFT, OUTPUT_SCHEMA_ID,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Trait every pluggable model must implement
///
/// `predict` is only ever invoked by the dispatcher with a value that already
/// satisfies `input_schema`. Implementations may still return
/// `Error::Validation` for semantic checks the schema cannot express; any other
/// error is reported to callers as a prediction failure.
#[async_trait]
pub trait Model: Send + Sync {
    /// Human readable name
    fn display_name(&self) -> &str;

    /// Unique registry key
    fn qualified_name(&self) -> &str;

    /// What the model does
    fn description(&self) -> &str;

    /// Major version of the model package
    fn major_version(&self) -> u32;

    /// Minor version of the model package
    fn minor_version(&self) -> u32;

    /// Schema of accepted prediction payloads
    fn input_schema(&self) -> JsonSchema;

    /// Schema of produced results
    fn output_schema(&self) -> JsonSchema;

    /// Make a prediction
    async fn predict(&self, input: Value) -> Result<Value>;
}

/// A model instance together with the descriptor captured when it was loaded
pub struct LoadedModel {
    descriptor: ModelDescriptor,
    model: Arc<dyn Model>,
}

impl LoadedModel {
    /// Wrap a model, capturing its descriptor
    pub fn new(model: Arc<dyn Model>) -> Self {
        let descriptor = describe(model.as_ref());
        Self { descriptor, model }
    }

    /// Registry key of the model
    pub fn qualified_name(&self) -> &str {
        &self.descriptor.qualified_name
    }

    /// Identity, version and schema projection
    pub fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    /// Schema the dispatcher validates payloads against
    pub fn input_schema(&self) -> &JsonSchema {
        &self.descriptor.input_schema
    }

    /// Schema the dispatcher validates results against
    pub fn output_schema(&self) -> &JsonSchema {
        &self.descriptor.output_schema
    }

    /// Invoke the wrapped model
    pub async fn predict(&self, input: Value) -> Result<Value> {
        self.model.predict(input).await
    }
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("qualified_name", &self.descriptor.qualified_name)
            .field("major_version", &self.descriptor.major_version)
            .field("minor_version", &self.descriptor.minor_version)
            .finish()
    }
}

/// Build the descriptor of a model, stamping the schema document ids
fn describe(model: &dyn Model) -> ModelDescriptor {
    ModelDescriptor {
        display_name: model.display_name().to_string(),
        qualified_name: model.qualified_name().to_string(),
        description: model.description().to_string(),
        major_version: model.major_version(),
        minor_version: model.minor_version(),
        input_schema: stamp(model.input_schema(), INPUT_SCHEMA_ID),
        output_schema: stamp(model.output_schema(), OUTPUT_SCHEMA_ID),
    }
}

fn stamp(mut schema: JsonSchema, id: &str) -> JsonSchema {
    schema.id = id.to_string();
    schema.schema = JSON_SCHEMA_DRAFT.to_string();
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelhost_core::SchemaProperty;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl Model for Echo {
        fn display_name(&self) -> &str {
            "Echo"
        }

        fn qualified_name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Returns its input"
        }

        fn major_version(&self) -> u32 {
            1
        }

        fn minor_version(&self) -> u32 {
            4
        }

        fn input_schema(&self) -> JsonSchema {
            JsonSchema::object()
                .with_id("whatever")
                .required_property("x", SchemaProperty::number())
        }

        fn output_schema(&self) -> JsonSchema {
            JsonSchema::object().required_property("x", SchemaProperty::number())
        }

        async fn predict(&self, input: Value) -> Result<Value> {
            Ok(input)
        }
    }

    #[test]
    fn test_descriptor_captures_identity() {
        let loaded = LoadedModel::new(Arc::new(Echo));
        let descriptor = loaded.descriptor();

        assert_eq!(loaded.qualified_name(), "echo");
        assert_eq!(descriptor.display_name, "Echo");
        assert_eq!(descriptor.major_version, 1);
        assert_eq!(descriptor.minor_version, 4);
        assert_eq!(descriptor.input_schema.id, INPUT_SCHEMA_ID);
        assert_eq!(descriptor.output_schema.id, OUTPUT_SCHEMA_ID);
        assert_eq!(descriptor.input_schema.required, vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn test_predict_delegates() {
        let loaded = LoadedModel::new(Arc::new(Echo));
        let output = loaded.predict(json!({"x": 1.5})).await.unwrap();
        assert_eq!(output, json!({"x": 1.5}));
    }
}
