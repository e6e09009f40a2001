use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::model::{PredictError, Predictor};
use crate::models::{PredictionInput, PredictionOutput};

pub enum ApiError {
    Rejected(JsonRejection),
    Invalid(PredictError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Rejected(rejection) => (rejection.status(), rejection.body_text()),
            ApiError::Invalid(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        };
        tracing::warn!(%status, "rejected prediction request: {message}");
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub fn router(predictor: Arc<Predictor>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(predictor)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

async fn predict(
    State(predictor): State<Arc<Predictor>>,
    payload: Result<Json<PredictionInput>, JsonRejection>,
) -> Result<Json<PredictionOutput>, ApiError> {
    let Json(input) = payload.map_err(ApiError::Rejected)?;
    let output = predictor.predict(&input).map_err(ApiError::Invalid)?;
    Ok(Json(output))
}

pub async fn serve(addr: SocketAddr, predictor: Arc<Predictor>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router(predictor))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
}
