//! Prediction dispatch
//!
//! A request moves through the stages of [`Stage`] in order. Any stage may end
//! the request with an error; whatever the model does, the caller only ever
//! sees one of the taxonomy errors of [`modelhost_core::Error`].

use crate::registry::SharedRegistry;
use crate::validator::RequestValidator;
use futures::FutureExt;
use modelhost_core::{Error, ModelDescriptor, Result};
use serde_json::Value;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{debug, error, warn, Instrument};

/// Message returned to callers when a model fails internally
pub const PREDICTION_FAILED: &str = "Could not make a prediction.";

/// Per-request processing stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Resolved,
    Validated,
    Executed,
    Responded,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Resolved => "resolved",
            Self::Validated => "validated",
            Self::Executed => "executed",
            Self::Responded => "responded",
        };
        f.write_str(name)
    }
}

/// Looks up models, validates payloads and invokes predictions
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: SharedRegistry,
    validator: RequestValidator,
}

impl Dispatcher {
    /// Create a dispatcher over a shared registry
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            validator: RequestValidator::new(),
        }
    }

    /// The registry this dispatcher reads from
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Descriptors of every loaded model, in load order
    pub fn describe_all(&self) -> Vec<ModelDescriptor> {
        self.registry.list()
    }

    /// Descriptor of a single model
    pub fn describe_one(&self, qualified_name: &str) -> Result<ModelDescriptor> {
        self.registry
            .metadata(qualified_name)
            .ok_or_else(|| not_found(qualified_name))
    }

    /// Validate a raw payload and run the named model on it
    pub async fn predict(&self, qualified_name: &str, payload: &[u8]) -> Result<Value> {
        let request_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("predict", %request_id, model = %qualified_name);

        let start = Instant::now();
        let result = self.run(qualified_name, payload).instrument(span).await;
        let elapsed_us = start.elapsed().as_micros() as f64;

        let outcome = match &result {
            Ok(_) => "success",
            Err(Error::NotFound(_)) => "not_found",
            Err(Error::Deserialization(_)) => "deserialization_error",
            Err(Error::Validation(_)) => "schema_error",
            Err(_) => "prediction_error",
        };
        // Unknown names are caller supplied, keep them out of metric labels
        let model = match &result {
            Err(Error::NotFound(_)) => "unknown".to_string(),
            _ => qualified_name.to_string(),
        };
        metrics::counter!(
            "modelhost_predictions_total",
            "model" => model.clone(),
            "outcome" => outcome
        )
        .increment(1);
        metrics::histogram!(
            "modelhost_prediction_latency_us",
            "model" => model
        )
        .record(elapsed_us);

        result
    }

    async fn run(&self, qualified_name: &str, payload: &[u8]) -> Result<Value> {
        debug!(stage = %Stage::Received, bytes = payload.len());

        let Some(model) = self.registry.get(qualified_name) else {
            debug!(stage = %Stage::Received, "Model is not loaded");
            return Err(not_found(qualified_name));
        };
        debug!(stage = %Stage::Resolved);

        let input = match self.validator.validate(payload, model.input_schema()) {
            Ok(input) => input,
            Err(e) => {
                debug!(stage = %Stage::Resolved, "Payload rejected: {}", e);
                return Err(e);
            }
        };
        debug!(stage = %Stage::Validated);

        let output = match AssertUnwindSafe(model.predict(input)).catch_unwind().await {
            Ok(Ok(output)) => output,
            Ok(Err(Error::Validation(msg))) => {
                debug!(stage = %Stage::Validated, "Model rejected input: {}", msg);
                return Err(Error::Validation(msg));
            }
            Ok(Err(e)) => {
                error!(stage = %Stage::Validated, "Model failed to predict: {}", e);
                return Err(Error::prediction(PREDICTION_FAILED));
            }
            Err(_) => {
                error!(stage = %Stage::Validated, "Model panicked while predicting");
                return Err(Error::prediction(PREDICTION_FAILED));
            }
        };
        debug!(stage = %Stage::Executed);

        if let Err(e) = self.validator.validate_value(&output, model.output_schema()) {
            warn!(stage = %Stage::Executed, "Model output violates its output schema: {}", e);
            return Err(Error::prediction(PREDICTION_FAILED));
        }
        debug!(stage = %Stage::Responded);

        Ok(output)
    }
}

fn not_found(qualified_name: &str) -> Error {
    Error::not_found(format!("model '{}' is not loaded", qualified_name))
}
