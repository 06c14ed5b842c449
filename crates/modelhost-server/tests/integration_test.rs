//! Integration tests for the model host HTTP API

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use modelhost_core::{Error, JsonSchema, PluginReference, Result, SchemaProperty};
use modelhost_models::{Model, ModelModule, PluginLoader};
use modelhost_server::{create_router, AppState, ServerConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

fn iris_app() -> Router {
    let state = AppState::new(ServerConfig::default(), None).unwrap();
    create_router(state)
}

async fn send(app: Router, method: Method, uri: &str, body: Body) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, Body::empty()).await
}

async fn post(app: Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    send(app, Method::POST, uri, body.into()).await
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = iris_app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_list_models() {
    let (status, body) = get(iris_app(), "/api/models").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "models": [{
                "display_name": "Iris Model",
                "qualified_name": "iris_model",
                "description": "A machine learning model for predicting the species of a flower based on its measurements.",
                "major_version": 0,
                "minor_version": 1
            }]
        })
    );
}

#[tokio::test]
async fn test_model_metadata() {
    let (status, body) = get(iris_app(), "/api/models/iris_model/metadata").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["qualified_name"], "iris_model");
    assert_eq!(body["input_schema"]["id"], "https://example.com/input_schema.json");
    assert_eq!(body["input_schema"]["$schema"], "http://json-schema.org/draft-07/schema#");
    assert_eq!(body["input_schema"]["type"], "object");
    assert_eq!(body["input_schema"]["additionalProperties"], false);
    assert_eq!(body["input_schema"]["required"].as_array().unwrap().len(), 4);
    assert_eq!(body["output_schema"]["properties"]["species"]["type"], "string");
}

#[tokio::test]
async fn test_unknown_model_metadata() {
    let (status, body) = get(iris_app(), "/api/models/unicorn/metadata").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"type": "ERROR", "message": "Model not found."}));
}

#[tokio::test]
async fn test_predict_success_conforms_to_output_schema() {
    let payload = json!({
        "sepal_length": 5.1,
        "sepal_width": 3.5,
        "petal_length": 1.4,
        "petal_width": 0.2
    });

    let (status, body) = post(iris_app(), "/api/models/iris_model/predict", payload.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"species": "setosa"}));
}

#[tokio::test]
async fn test_predict_missing_feature_is_schema_error() {
    let payload = json!({
        "sepal_length": 5.1,
        "sepal_width": 3.5,
        "petal_length": 1.4
    });

    let (status, body) = post(iris_app(), "/api/models/iris_model/predict", payload.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "SCHEMA_ERROR");
    assert_eq!(body["message"], "missing required field 'petal_width'");
}

#[tokio::test]
async fn test_predict_malformed_body_is_deserialization_error() {
    let (status, body) = post(iris_app(), "/api/models/iris_model/predict", "{\"sepal_length\":").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "DESERIALIZATION_ERROR");
}

#[tokio::test]
async fn test_predict_unknown_model() {
    let (status, body) = post(iris_app(), "/api/models/unicorn/predict", "{}").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"type": "ERROR", "message": "Model not found."}));
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, body) = get(iris_app(), "/api/nothing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["type"], "ERROR");
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let config = ServerConfig {
        max_body_bytes: 16,
        ..ServerConfig::default()
    };
    let app = create_router(AppState::new(config, None).unwrap());

    let payload = json!({
        "sepal_length": 5.1,
        "sepal_width": 3.5,
        "petal_length": 1.4,
        "petal_width": 0.2
    });
    let (status, _) = post(app, "/api/models/iris_model/predict", payload.to_string()).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

/// A model whose prediction always fails internally
struct BrokenModel;

#[async_trait]
impl Model for BrokenModel {
    fn display_name(&self) -> &str {
        "Broken"
    }

    fn qualified_name(&self) -> &str {
        "broken"
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    fn major_version(&self) -> u32 {
        0
    }

    fn minor_version(&self) -> u32 {
        0
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object().property("x", SchemaProperty::number())
    }

    fn output_schema(&self) -> JsonSchema {
        JsonSchema::object()
    }

    async fn predict(&self, _input: Value) -> Result<Value> {
        Err(Error::internal("division by zero in layer 3"))
    }
}

#[tokio::test]
async fn test_internal_model_failure_is_generic_500() {
    let mut loader = PluginLoader::with_builtin_models();
    loader
        .register(ModelModule::new("broken").with_class("BrokenModel", || {
            Ok(Box::new(BrokenModel) as Box<dyn Model>)
        }))
        .unwrap();

    let config = ServerConfig {
        models: vec![
            PluginReference::new("iris_model.iris_predict", "IrisModel"),
            PluginReference::new("broken", "BrokenModel"),
        ],
        ..ServerConfig::default()
    };
    let app = create_router(AppState::with_loader(config, &loader, None).unwrap());

    let (status, body) = get(app.clone(), "/api/models").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["models"][0]["qualified_name"], "iris_model");
    assert_eq!(body["models"][1]["qualified_name"], "broken");

    let (status, body) = post(app, "/api/models/broken/predict", "{}").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"type": "ERROR", "message": "Could not make a prediction."}));
}

#[test]
fn test_bad_configuration_aborts_startup() {
    let config = ServerConfig {
        models: vec![PluginReference::new("model_manager_test", "SomeClass")],
        ..ServerConfig::default()
    };

    let result = AppState::new(config, None);
    assert!(result.is_err());
}
