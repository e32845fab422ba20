use axum::{
    extract::{Query, State},
    Extension, Json,
};
use geotrack_db::{CitationSummary, DEFAULT_CITATION_DOMAIN_LIMIT};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, resolve_run_id, ApiError, ApiResponse, AppState, RunQuery};

#[derive(Debug, Serialize)]
pub(super) struct CitationsData {
    run_id: String,
    #[serde(flatten)]
    summary: CitationSummary,
}

pub(super) async fn get_citations(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RunQuery>,
) -> Result<Json<ApiResponse<CitationsData>>, ApiError> {
    let run_id = resolve_run_id(&state, &req_id, query.run_id).await?;
    let summary = geotrack_db::get_citations(&state.pool, &run_id, DEFAULT_CITATION_DOMAIN_LIMIT)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(CitationsData { run_id, summary }, req_id))
}
