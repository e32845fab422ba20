use axum::{
    extract::{Query, State},
    Extension, Json,
};
use geotrack_db::ResponseDetail;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, resolve_run_id, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ResponsesQuery {
    pub run_id: Option<String>,
    pub prompt_id: Option<String>,
    pub provider: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ResponsesData {
    run_id: String,
    responses: Vec<ResponseDetail>,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub(super) async fn list_responses(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ResponsesQuery>,
) -> Result<Json<ApiResponse<ResponsesData>>, ApiError> {
    let (Some(prompt_id), Some(provider)) = (required(query.prompt_id), required(query.provider))
    else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "prompt_id and provider are required",
        ));
    };

    let run_id = resolve_run_id(&state, &req_id, query.run_id).await?;
    let responses = geotrack_db::get_responses(&state.pool, &run_id, &prompt_id, &provider)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(ResponsesData { run_id, responses }, req_id))
}
