mod citations;
mod competitors;
mod costs;
mod overview;
mod prompts;
mod responses;
mod runs;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

/// Upper bound for every `?limit=` query parameter.
const MAX_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// Competitors returned when the request carries no `limit`.
    pub competitor_limit: i64,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

/// `?run_id=` on its own; shared by the run-scoped routes without other parameters.
#[derive(Debug, Default, Deserialize)]
pub(super) struct RunQuery {
    pub run_id: Option<String>,
}

/// `?run_id=&limit=` for the ranked routes.
#[derive(Debug, Default, Deserialize)]
pub(super) struct RankedQuery {
    pub run_id: Option<String>,
    pub limit: Option<i64>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, req_id: RequestId) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(req_id.0),
        })
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<i64>, default: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, MAX_LIMIT)
}

pub(super) fn map_db_error(request_id: String, error: &geotrack_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

/// The requested run, or the latest completed one when none (or a blank id) was given.
///
/// An explicit id is passed through unchecked: an unknown run yields empty
/// aggregates, not an error.
pub(super) async fn resolve_run_id(
    state: &AppState,
    req_id: &RequestId,
    run_id: Option<String>,
) -> Result<String, ApiError> {
    if let Some(id) = run_id.filter(|id| !id.trim().is_empty()) {
        return Ok(id);
    }

    geotrack_db::latest_run_id(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "No runs found"))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/runs", get(runs::list_runs))
        .route("/api/v1/runs/{run_id}", get(runs::get_run))
        .route("/api/v1/overview", get(overview::get_overview))
        .route("/api/v1/overview/radar", get(overview::get_radar))
        .route("/api/v1/overview/sentiment", get(overview::get_sentiment))
        .route("/api/v1/prompts", get(prompts::list_prompts))
        .route("/api/v1/prompts/weakest", get(prompts::list_weakest))
        .route("/api/v1/competitors", get(competitors::list_competitors))
        .route("/api/v1/citations", get(citations::get_citations))
        .route("/api/v1/costs", get(costs::get_costs))
        .route("/api/v1/responses", get(responses::list_responses))
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .merge(api_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match geotrack_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}
