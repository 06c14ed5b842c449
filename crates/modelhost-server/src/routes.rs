//! HTTP routes and handlers

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use modelhost_core::{Error, ErrorBody, ModelCollection, ModelDescriptor};
use modelhost_models::PREDICTION_FAILED;
use serde_json::Value;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/api/models", get(list_models))
        .route("/api/models/:qualified_name/metadata", get(model_metadata))
        .route("/api/models/:qualified_name/predict", post(predict))
        .fallback(fallback)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// List every loaded model, in load order
async fn list_models(State(state): State<AppState>) -> Json<ModelCollection> {
    metrics::counter!("modelhost_requests_total", "endpoint" => "models").increment(1);

    let collection: ModelCollection = state.dispatcher.describe_all().into_iter().collect();
    debug!("Listing {} models", collection.models.len());
    Json(collection)
}

/// Full descriptor of a single model
async fn model_metadata(
    State(state): State<AppState>,
    Path(qualified_name): Path<String>,
) -> Result<Json<ModelDescriptor>, AppError> {
    metrics::counter!("modelhost_requests_total", "endpoint" => "metadata").increment(1);

    let descriptor = state.dispatcher.describe_one(&qualified_name)?;
    Ok(Json(descriptor))
}

/// Run a prediction with the request body as input
async fn predict(
    State(state): State<AppState>,
    Path(qualified_name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    metrics::counter!("modelhost_requests_total", "endpoint" => "predict").increment(1);
    info!("Received prediction request for model: {}", qualified_name);

    let output = state.dispatcher.predict(&qualified_name, &body).await?;
    Ok(Json(output))
}

async fn fallback() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("ERROR", "Not found.")),
    )
}

/// Error handling
#[derive(Debug)]
pub struct AppError(Error);

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_type = self.0.error_type();
        let (status, message) = match self.0 {
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "Model not found.".to_string()),
            Error::Deserialization(msg) | Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Prediction(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                PREDICTION_FAILED.to_string(),
            ),
            other => {
                error!("Unhandled error: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.".to_string(),
                )
            }
        };

        if status.is_server_error() {
            metrics::counter!("modelhost_errors_total", "type" => "server").increment(1);
        } else {
            metrics::counter!("modelhost_errors_total", "type" => "client").increment(1);
        }

        (status, Json(ErrorBody::new(error_type, message))).into_response()
    }
}
