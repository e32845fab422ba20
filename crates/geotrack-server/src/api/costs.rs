use axum::{
    extract::{Query, State},
    Extension, Json,
};
use geotrack_db::CostSummary;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, resolve_run_id, ApiError, ApiResponse, AppState, RunQuery};

#[derive(Debug, Serialize)]
pub(super) struct CostsData {
    run_id: String,
    #[serde(flatten)]
    summary: CostSummary,
}

pub(super) async fn get_costs(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RunQuery>,
) -> Result<Json<ApiResponse<CostsData>>, ApiError> {
    let run_id = resolve_run_id(&state, &req_id, query.run_id).await?;
    let summary = geotrack_db::get_costs(&state.pool, &run_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(CostsData { run_id, summary }, req_id))
}
