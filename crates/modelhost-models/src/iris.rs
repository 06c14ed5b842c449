//! Built-in Iris species model
//!
//! A small decision tree over the four classic Iris measurements. It ships with
//! the host as a reference implementation of the model contract.

use crate::model::Model;
use crate::plugin::ModelModule;
use async_trait::async_trait;
use modelhost_core::{Error, JsonSchema, Result, SchemaProperty};
use serde_json::{json, Value};

/// Module name the Iris model is registered under
pub const IRIS_MODULE: &str = "iris_model.iris_predict";

/// Class name of the Iris model within its module
pub const IRIS_CLASS: &str = "IrisModel";

const FEATURES: [(&str, &str); 4] = [
    ("sepal_length", "The length of the sepal of the flower in centimeters."),
    ("sepal_width", "The width of the sepal of the flower in centimeters."),
    ("petal_length", "The length of the petal of the flower in centimeters."),
    ("petal_width", "The width of the petal of the flower in centimeters."),
];

const SPECIES: [&str; 3] = ["setosa", "versicolor", "virginica"];

/// Predicts the species of an Iris flower from its measurements
#[derive(Debug, Clone, Default)]
pub struct IrisModel;

impl IrisModel {
    pub fn new() -> Self {
        Self
    }

    fn feature(input: &Value, name: &str) -> Result<f64> {
        input
            .get(name)
            .and_then(Value::as_f64)
            .ok_or_else(|| Error::validation(format!("missing numeric feature '{}'", name)))
    }

    fn classify(petal_length: f64, petal_width: f64) -> &'static str {
        if petal_length < 2.45 {
            SPECIES[0]
        } else if petal_width < 1.75 {
            SPECIES[1]
        } else {
            SPECIES[2]
        }
    }
}

#[async_trait]
impl Model for IrisModel {
    fn display_name(&self) -> &str {
        "Iris Model"
    }

    fn qualified_name(&self) -> &str {
        "iris_model"
    }

    fn description(&self) -> &str {
        "A machine learning model for predicting the species of a flower based on its measurements."
    }

    fn major_version(&self) -> u32 {
        0
    }

    fn minor_version(&self) -> u32 {
        1
    }

    fn input_schema(&self) -> JsonSchema {
        FEATURES.iter().fold(
            JsonSchema::object().with_title("IrisModelInput"),
            |schema, (name, description)| {
                schema.required_property(
                    *name,
                    SchemaProperty::number()
                        .with_description(*description)
                        .with_range(0.0, 10.0),
                )
            },
        )
    }

    fn output_schema(&self) -> JsonSchema {
        JsonSchema::object()
            .with_title("IrisModelOutput")
            .required_property(
                "species",
                SchemaProperty::string()
                    .with_description("The predicted species of the flower.")
                    .with_allowed(SPECIES),
            )
    }

    async fn predict(&self, input: Value) -> Result<Value> {
        // Sepal measurements are part of the contract but carry no weight in the tree.
        for (name, _) in &FEATURES[..2] {
            Self::feature(&input, name)?;
        }
        let petal_length = Self::feature(&input, "petal_length")?;
        let petal_width = Self::feature(&input, "petal_width")?;

        Ok(json!({ "species": Self::classify(petal_length, petal_width) }))
    }
}

/// Module containing the built-in Iris model
pub fn module() -> ModelModule {
    ModelModule::new(IRIS_MODULE).with_default::<IrisModel>(IRIS_CLASS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurements(petal_length: f64, petal_width: f64) -> Value {
        json!({
            "sepal_length": 5.0,
            "sepal_width": 3.2,
            "petal_length": petal_length,
            "petal_width": petal_width,
        })
    }

    #[tokio::test]
    async fn test_predicts_each_species() {
        let model = IrisModel::new();

        let setosa = model.predict(measurements(1.4, 0.2)).await.unwrap();
        assert_eq!(setosa, json!({"species": "setosa"}));

        let versicolor = model.predict(measurements(4.5, 1.5)).await.unwrap();
        assert_eq!(versicolor, json!({"species": "versicolor"}));

        let virginica = model.predict(measurements(5.8, 2.2)).await.unwrap();
        assert_eq!(virginica, json!({"species": "virginica"}));
    }

    #[tokio::test]
    async fn test_missing_feature_is_validation_error() {
        let model = IrisModel::new();
        let result = model.predict(json!({"petal_length": 1.0})).await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_input_schema_requires_all_features() {
        let schema = IrisModel::new().input_schema();
        assert_eq!(schema.required.len(), 4);
        assert!(!schema.additional_properties);
        assert_eq!(schema.properties["petal_width"].maximum, Some(10.0));
    }
}
