use axum::{
    extract::{Query, State},
    Extension, Json,
};
use geotrack_db::Competitor;
use serde::Serialize;

use crate::{charts::competitor_color, middleware::RequestId};

use super::{
    map_db_error, normalize_limit, resolve_run_id, ApiError, ApiResponse, AppState, RankedQuery,
};

#[derive(Debug, Serialize)]
pub(super) struct CompetitorItem {
    #[serde(flatten)]
    competitor: Competitor,
    color: &'static str,
}

#[derive(Debug, Serialize)]
pub(super) struct CompetitorsData {
    run_id: String,
    competitors: Vec<CompetitorItem>,
}

pub(super) async fn list_competitors(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RankedQuery>,
) -> Result<Json<ApiResponse<CompetitorsData>>, ApiError> {
    let run_id = resolve_run_id(&state, &req_id, query.run_id).await?;
    let limit = normalize_limit(query.limit, state.competitor_limit);
    let rows = geotrack_db::get_competitors(&state.pool, &run_id, limit)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let competitors = rows
        .into_iter()
        .enumerate()
        .map(|(i, competitor)| CompetitorItem {
            competitor,
            color: competitor_color(i),
        })
        .collect();

    Ok(ApiResponse::new(
        CompetitorsData {
            run_id,
            competitors,
        },
        req_id,
    ))
}
