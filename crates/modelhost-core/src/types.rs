//! Core types for the model host

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// `$schema` value stamped on every schema document
pub const JSON_SCHEMA_DRAFT: &str = "http://json-schema.org/draft-07/schema#";

/// Document id given to a model's input schema in its descriptor
pub const INPUT_SCHEMA_ID: &str = "https://example.com/input_schema.json";

/// Document id given to a model's output schema in its descriptor
pub const OUTPUT_SCHEMA_ID: &str = "https://example.com/output_schema.json";

/// Primitive JSON types a schema can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

impl SchemaType {
    /// Check whether a JSON value has this type
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        use serde_json::Value;

        match (self, value) {
            (Self::String, Value::String(_)) => true,
            (Self::Number, Value::Number(_)) => true,
            (Self::Integer, Value::Number(n)) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            (Self::Boolean, Value::Bool(_)) => true,
            (Self::Object, Value::Object(_)) => true,
            (Self::Array, Value::Array(_)) => true,
            (Self::Null, Value::Null) => true,
            _ => false,
        }
    }

    /// Name of the JSON type a value actually has
    pub fn name_of(value: &serde_json::Value) -> &'static str {
        use serde_json::Value;

        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
        };
        f.write_str(name)
    }
}

/// A single property declared in a schema document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaProperty {
    /// Expected JSON type
    #[serde(rename = "type")]
    pub property_type: SchemaType,

    /// Human readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Inclusive lower bound for numeric values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    /// Inclusive upper bound for numeric values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    /// Closed set of allowed values
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<serde_json::Value>>,
}

impl SchemaProperty {
    /// Create a property of the given type with no constraints
    pub fn new(property_type: SchemaType) -> Self {
        Self {
            property_type,
            description: None,
            minimum: None,
            maximum: None,
            allowed: None,
        }
    }

    /// Shorthand for a `number` property
    pub fn number() -> Self {
        Self::new(SchemaType::Number)
    }

    /// Shorthand for a `string` property
    pub fn string() -> Self {
        Self::new(SchemaType::String)
    }

    /// Shorthand for an `integer` property
    pub fn integer() -> Self {
        Self::new(SchemaType::Integer)
    }

    /// Shorthand for a `boolean` property
    pub fn boolean() -> Self {
        Self::new(SchemaType::Boolean)
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set an inclusive numeric range
    pub fn with_range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    /// Set an inclusive lower bound
    pub fn with_minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Restrict the property to a closed set of values
    pub fn with_allowed<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<serde_json::Value>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

/// Top level of a JSON-Schema-like document describing a model's input or output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSchema {
    /// Document id
    #[serde(default)]
    pub id: String,

    /// Schema dialect
    #[serde(rename = "$schema", default = "default_draft")]
    pub schema: String,

    /// Optional document title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Type of the document root
    #[serde(rename = "type")]
    pub schema_type: SchemaType,

    /// Declared properties by name
    #[serde(default)]
    pub properties: BTreeMap<String, SchemaProperty>,

    /// Names of properties that must be present
    #[serde(default)]
    pub required: Vec<String>,

    /// Whether properties outside `properties` are accepted
    #[serde(rename = "additionalProperties", default)]
    pub additional_properties: bool,
}

fn default_draft() -> String {
    JSON_SCHEMA_DRAFT.to_string()
}

impl JsonSchema {
    /// Create an empty object schema that rejects undeclared properties
    pub fn object() -> Self {
        Self {
            id: String::new(),
            schema: default_draft(),
            title: None,
            schema_type: SchemaType::Object,
            properties: BTreeMap::new(),
            required: Vec::new(),
            additional_properties: false,
        }
    }

    /// Set the document id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the document title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Declare an optional property
    pub fn property(mut self, name: impl Into<String>, property: SchemaProperty) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    /// Declare a property and mark it required
    pub fn required_property(mut self, name: impl Into<String>, property: SchemaProperty) -> Self {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.insert(name, property);
        self
    }

    /// Accept or reject properties outside `properties`
    pub fn allow_additional_properties(mut self, allow: bool) -> Self {
        self.additional_properties = allow;
        self
    }
}

/// Short description of a loaded model, as listed in the model catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub display_name: String,
    pub qualified_name: String,
    pub description: String,
    pub major_version: u32,
    pub minor_version: u32,
}

/// Catalog of loaded models, in load order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCollection {
    pub models: Vec<ModelSummary>,
}

/// Read-only identity, version and schema projection of a loaded model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Display name of the model
    pub display_name: String,

    /// Globally unique key of the model
    pub qualified_name: String,

    /// Description of the model
    pub description: String,

    /// Major version of the model package
    pub major_version: u32,

    /// Minor version of the model package
    pub minor_version: u32,

    /// Schema of accepted prediction payloads
    pub input_schema: JsonSchema,

    /// Schema of produced results
    pub output_schema: JsonSchema,
}

impl ModelDescriptor {
    /// Project the descriptor onto its catalog fields
    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            display_name: self.display_name.clone(),
            qualified_name: self.qualified_name.clone(),
            description: self.description.clone(),
            major_version: self.major_version,
            minor_version: self.minor_version,
        }
    }
}

impl FromIterator<ModelDescriptor> for ModelCollection {
    fn from_iter<I: IntoIterator<Item = ModelDescriptor>>(iter: I) -> Self {
        Self {
            models: iter.into_iter().map(|d| d.summary()).collect(),
        }
    }
}

/// Configuration entry naming a model implementation to load
///
/// `module_name` identifies a registered plugin module and `class_name` an
/// implementation within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginReference {
    pub module_name: String,
    pub class_name: String,
}

impl PluginReference {
    /// Create a new plugin reference
    pub fn new(module_name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            class_name: class_name.into(),
        }
    }
}

impl fmt::Display for PluginReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module_name, self.class_name)
    }
}

/// Error document returned through the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// The type of error
    #[serde(rename = "type")]
    pub error_type: String,

    /// The error message
    pub message: String,
}

impl ErrorBody {
    /// Create a new error body
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            message: message.into(),
        }
    }
}
