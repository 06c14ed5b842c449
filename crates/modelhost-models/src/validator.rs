//! Request validation against a model's declared schema

use modelhost_core::{Error, JsonSchema, Result, SchemaProperty, SchemaType};
use serde_json::{Map, Value};

/// Checks payloads against schema documents before they reach a model
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestValidator;

impl RequestValidator {
    pub fn new() -> Self {
        Self
    }

    /// Parse a raw payload and check it against `schema`
    pub fn validate(&self, payload: &[u8], schema: &JsonSchema) -> Result<Value> {
        let value: Value = serde_json::from_slice(payload)
            .map_err(|e| Error::deserialization(format!("payload is not valid JSON: {}", e)))?;

        self.validate_value(&value, schema)?;
        Ok(value)
    }

    /// Check an already parsed value against `schema`
    ///
    /// Every violation is reported, joined into a single message.
    pub fn validate_value(&self, value: &Value, schema: &JsonSchema) -> Result<()> {
        let violations = violations(value, schema);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Error::validation(violations.join("; ")))
        }
    }
}

fn violations(value: &Value, schema: &JsonSchema) -> Vec<String> {
    if !schema.schema_type.matches(value) {
        return vec![format!(
            "expected {} but got {}",
            schema.schema_type,
            SchemaType::name_of(value)
        )];
    }

    match value {
        Value::Object(fields) => object_violations(fields, schema),
        _ => Vec::new(),
    }
}

fn object_violations(fields: &Map<String, Value>, schema: &JsonSchema) -> Vec<String> {
    let mut found = Vec::new();

    for name in &schema.required {
        if !fields.contains_key(name) {
            found.push(format!("missing required field '{}'", name));
        }
    }

    for (name, property) in &schema.properties {
        if let Some(field) = fields.get(name) {
            if let Some(problem) = property_violation(field, property) {
                found.push(format!("field '{}' {}", name, problem));
            }
        }
    }

    if !schema.additional_properties {
        let mut unknown: Vec<&String> = fields
            .keys()
            .filter(|name| !schema.properties.contains_key(*name))
            .collect();
        unknown.sort();
        found.extend(unknown.into_iter().map(|name| format!("unexpected field '{}'", name)));
    }

    found
}

fn property_violation(value: &Value, property: &SchemaProperty) -> Option<String> {
    if !property.property_type.matches(value) {
        return Some(format!(
            "must be of type {} but got {}",
            property.property_type,
            SchemaType::name_of(value)
        ));
    }

    if let Some(number) = value.as_f64() {
        if let Some(minimum) = property.minimum {
            if number < minimum {
                return Some(format!("must be at least {} but got {}", minimum, number));
            }
        }
        if let Some(maximum) = property.maximum {
            if number > maximum {
                return Some(format!("must be at most {} but got {}", maximum, number));
            }
        }
    }

    match &property.allowed {
        Some(allowed) if !allowed.contains(value) => Some(format!(
            "must be one of {} but got {}",
            Value::Array(allowed.clone()),
            value
        )),
        _ => None,
    }
}
