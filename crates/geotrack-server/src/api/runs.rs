use axum::{
    extract::{Path, State},
    Extension, Json,
};
use geotrack_db::RunRow;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

pub(super) async fn list_runs(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<RunRow>>>, ApiError> {
    let runs = geotrack_db::list_completed_runs(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(runs, req_id))
}

pub(super) async fn get_run(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(run_id): Path<String>,
) -> Result<Json<ApiResponse<RunRow>>, ApiError> {
    let run = geotrack_db::get_run(&state.pool, &run_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(req_id.0.clone(), "not_found", format!("run {run_id} not found"))
        })?;

    Ok(ApiResponse::new(run, req_id))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::super::test_support::{empty_app, get_json, seeded_app};

    #[tokio::test]
    async fn runs_are_listed_newest_first() {
        let (status, json) = get_json(seeded_app().await, "/api/v1/runs").await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = json["data"]
            .as_array()
            .expect("data array")
            .iter()
            .filter_map(|r| r["run_id"].as_str())
            .collect();
        assert_eq!(ids, vec!["r1", "r0"]);
    }

    #[tokio::test]
    async fn runs_list_is_empty_without_data() {
        let (status, json) = get_json(empty_app().await, "/api/v1/runs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn single_run_is_found_or_404() {
        let (status, json) = get_json(seeded_app().await, "/api/v1/runs/r0").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "completed");

        let (status, json) = get_json(seeded_app().await, "/api/v1/runs/zzz").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");
    }
}
