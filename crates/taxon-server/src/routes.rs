use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use taxon_core::models::ClassificationRequest;

use crate::dto::{ClassifyRequest, HealthResponse};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/classify", post(classify))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Classify
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/v1/classify",
    request_body = ClassifyRequest,
    responses(
        (status = 200, description = "Per-key classification outcomes, in input order"),
        (status = 400, description = "Request violates an input invariant", body = crate::dto::ErrorResponse),
        (status = 502, description = "Classifier backend failed", body = crate::dto::ErrorResponse),
    ),
    tag = "classify"
)]
pub async fn classify(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<ClassifyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request: ClassificationRequest = body.into();
    let results = state.pipeline.classify(&request).await?;
    Ok(axum::Json(results))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health() -> impl IntoResponse {
    axum::Json(HealthResponse { status: "healthy" })
}
