use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api_errors::AppError;
use crate::evaluator::{EvaluationRequest, Evaluator};
use crate::verdict::ScoredResult;

/// Build the HTTP surface: liveness, health, model ping and evaluation
pub fn build_router(evaluator: Arc<Evaluator>, cors_permissive: bool) -> Router {
    let router = Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/test-gemini", get(test_gemini))
        .route("/evaluate", post(evaluate))
        .layer(Extension(evaluator))
        .layer(TraceLayer::new_for_http());

    if cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "GEN-SCORE AI backend running" }))
}

async fn healthz(Extension(evaluator): Extension<Arc<Evaluator>>) -> Json<Value> {
    Json(json!({ "status": "ok", "model": evaluator.model() }))
}

async fn test_gemini(
    Extension(evaluator): Extension<Arc<Evaluator>>,
) -> Result<Json<Value>, AppError> {
    let text = evaluator.ping().await.map_err(|e| {
        tracing::warn!(error = %e, "model ping failed");
        AppError::from(e)
    })?;
    Ok(Json(json!({ "gemini_response": text })))
}

// Model failures come back as a 200 BLOCK verdict; only a malformed body is rejected.
async fn evaluate(
    Extension(evaluator): Extension<Arc<Evaluator>>,
    payload: Result<Json<EvaluationRequest>, JsonRejection>,
) -> Result<Json<ScoredResult>, AppError> {
    let Json(req) = payload?;
    Ok(Json(evaluator.evaluate(&req).await))
}
