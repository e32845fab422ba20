use axum::{
    extract::{Query, State},
    Extension, Json,
};
use geotrack_db::EngineOverview;
use serde::Serialize;

use crate::{
    charts::{
        engine_series, kpi_summary, radar_rows, sentiment_bars, sentiment_categories,
        EngineSeries, KpiSummary, RadarRow, SentimentBar, SentimentCategory,
    },
    middleware::RequestId,
};

use super::{map_db_error, resolve_run_id, ApiError, ApiResponse, AppState, RunQuery};

#[derive(Debug, Serialize)]
pub(super) struct OverviewData {
    run_id: String,
    engines: Vec<EngineOverview>,
    kpis: KpiSummary,
}

#[derive(Debug, Serialize)]
pub(super) struct RadarData {
    run_id: String,
    series: Vec<EngineSeries>,
    rows: Vec<RadarRow>,
}

#[derive(Debug, Serialize)]
pub(super) struct SentimentData {
    run_id: String,
    categories: Vec<SentimentCategory>,
    engines: Vec<SentimentBar>,
}

async fn load_engines(
    state: &AppState,
    req_id: &RequestId,
    run_id: Option<String>,
) -> Result<(String, Vec<EngineOverview>), ApiError> {
    let run_id = resolve_run_id(state, req_id, run_id).await?;
    let engines = geotrack_db::get_engine_overview(&state.pool, &run_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    Ok((run_id, engines))
}

pub(super) async fn get_overview(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RunQuery>,
) -> Result<Json<ApiResponse<OverviewData>>, ApiError> {
    let (run_id, engines) = load_engines(&state, &req_id, query.run_id).await?;
    let kpis = kpi_summary(&engines);

    Ok(ApiResponse::new(
        OverviewData {
            run_id,
            engines,
            kpis,
        },
        req_id,
    ))
}

pub(super) async fn get_radar(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RunQuery>,
) -> Result<Json<ApiResponse<RadarData>>, ApiError> {
    let (run_id, engines) = load_engines(&state, &req_id, query.run_id).await?;

    Ok(ApiResponse::new(
        RadarData {
            run_id,
            series: engine_series(&engines),
            rows: radar_rows(&engines),
        },
        req_id,
    ))
}

pub(super) async fn get_sentiment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RunQuery>,
) -> Result<Json<ApiResponse<SentimentData>>, ApiError> {
    let (run_id, engines) = load_engines(&state, &req_id, query.run_id).await?;

    Ok(ApiResponse::new(
        SentimentData {
            run_id,
            categories: sentiment_categories(),
            engines: sentiment_bars(&engines),
        },
        req_id,
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::super::test_support::{get_json, seeded_app};

    #[tokio::test]
    async fn overview_defaults_to_latest_run() {
        let (status, json) = get_json(seeded_app().await, "/api/v1/overview").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["run_id"], "r1");

        let engine = &json["data"]["engines"][0];
        assert_eq!(engine["provider"], "openai");
        assert_eq!(engine["total_responses"], 4);
        assert_eq!(engine["visibility"], 50.0);
        assert_eq!(engine["rec_rate"], 25.0);
        assert_eq!(engine["citation_rate"], 50.0);
        assert_eq!(engine["avg_position"], 1.5);
        assert_eq!(engine["sentiment_dist"]["positive"], 1);
        assert_eq!(engine["sentiment_dist"]["mixed"], 1);
        assert!(engine["sentiment_dist"].get("neutral").is_none());

        assert_eq!(json["data"]["kpis"]["visibility"], 50.0);
        assert_eq!(json["data"]["kpis"]["sov"], 50.0);
    }

    #[tokio::test]
    async fn blank_run_id_means_latest() {
        let (status, json) = get_json(seeded_app().await, "/api/v1/overview?run_id=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["run_id"], "r1");
    }

    #[tokio::test]
    async fn explicit_run_without_data_is_empty() {
        let (status, json) = get_json(seeded_app().await, "/api/v1/overview?run_id=r0").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["engines"].as_array().map(Vec::len), Some(0));
        assert_eq!(json["data"]["kpis"]["visibility"], 0.0);
    }

    #[tokio::test]
    async fn radar_rows_carry_each_provider() {
        let (status, json) = get_json(seeded_app().await, "/api/v1/overview/radar").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["series"][0]["color"], "#10A37F");

        let rows = json["data"]["rows"].as_array().expect("rows");
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0]["metric"], "Visibility");
        assert_eq!(rows[0]["values"]["openai"], 50);
        // avg position 1.5 scores 94.5
        assert_eq!(rows[4]["metric"], "Position Score");
        assert_eq!(rows[4]["values"]["openai"], 95);
    }

    #[tokio::test]
    async fn sentiment_breakdown_is_zero_filled() {
        let (status, json) = get_json(seeded_app().await, "/api/v1/overview/sentiment").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["categories"].as_array().map(Vec::len), Some(4));
        let counts = &json["data"]["engines"][0]["counts"];
        assert_eq!(counts["positive"], 1);
        assert_eq!(counts["negative"], 0);
        assert_eq!(counts["mixed"], 1);
    }
}
