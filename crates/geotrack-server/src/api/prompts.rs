use axum::{
    extract::{Query, State},
    Extension, Json,
};
use geotrack_db::{PromptData, WeakPrompt, DEFAULT_WEAK_PROMPT_LIMIT};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{
    map_db_error, normalize_limit, resolve_run_id, ApiError, ApiResponse, AppState, RankedQuery,
    RunQuery,
};

#[derive(Debug, Serialize)]
pub(super) struct PromptsData<T: Serialize> {
    run_id: String,
    prompts: Vec<T>,
}

pub(super) async fn list_prompts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RunQuery>,
) -> Result<Json<ApiResponse<PromptsData<PromptData>>>, ApiError> {
    let run_id = resolve_run_id(&state, &req_id, query.run_id).await?;
    let prompts = geotrack_db::get_prompt_data(&state.pool, &run_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(PromptsData { run_id, prompts }, req_id))
}

pub(super) async fn list_weakest(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RankedQuery>,
) -> Result<Json<ApiResponse<PromptsData<WeakPrompt>>>, ApiError> {
    let run_id = resolve_run_id(&state, &req_id, query.run_id).await?;
    let limit = normalize_limit(query.limit, DEFAULT_WEAK_PROMPT_LIMIT);
    let prompts = geotrack_db::list_weakest_prompts(&state.pool, &run_id, limit)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(PromptsData { run_id, prompts }, req_id))
}
