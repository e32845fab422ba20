//! Chart-ready shapes derived from the engine overview.

use std::collections::BTreeMap;

use geotrack_core::{
    average, engine_color, round_to, sentiment_color, Sentiment, BRAND_PALETTE,
};
use geotrack_db::EngineOverview;
use serde::Serialize;

/// Axes of the engine comparison radar, each normalized to 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadarMetric {
    Visibility,
    ShareOfVoice,
    RecommendationRate,
    CitationRate,
    PositionScore,
}

impl RadarMetric {
    pub const ALL: [RadarMetric; 5] = [
        RadarMetric::Visibility,
        RadarMetric::ShareOfVoice,
        RadarMetric::RecommendationRate,
        RadarMetric::CitationRate,
        RadarMetric::PositionScore,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RadarMetric::Visibility => "Visibility",
            RadarMetric::ShareOfVoice => "SOV",
            RadarMetric::RecommendationRate => "Rec. Rate",
            RadarMetric::CitationRate => "Citation Rate",
            RadarMetric::PositionScore => "Position Score",
        }
    }

    /// Unrounded value of this axis for one engine.
    pub fn extract(self, engine: &EngineOverview) -> f64 {
        match self {
            RadarMetric::Visibility => engine.visibility,
            RadarMetric::ShareOfVoice => engine.sov,
            RadarMetric::RecommendationRate => engine.rec_rate,
            RadarMetric::CitationRate => engine.citation_rate,
            // Position 1 scores 100; every step down costs 11 points.
            RadarMetric::PositionScore => engine
                .avg_position
                .filter(|p| *p > 0.0)
                .map_or(0.0, |p| (100.0 - (p - 1.0) * 11.0).max(0.0)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarRow {
    pub metric: &'static str,
    /// Provider id to rounded axis value.
    pub values: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSeries {
    pub provider: String,
    pub display_name: String,
    pub color: &'static str,
}

#[allow(clippy::cast_possible_truncation)]
pub fn radar_rows(engines: &[EngineOverview]) -> Vec<RadarRow> {
    RadarMetric::ALL
        .into_iter()
        .map(|metric| RadarRow {
            metric: metric.label(),
            values: engines
                .iter()
                .map(|e| (e.provider.clone(), metric.extract(e).round() as i64))
                .collect(),
        })
        .collect()
}

pub fn engine_series(engines: &[EngineOverview]) -> Vec<EngineSeries> {
    engines
        .iter()
        .map(|e| EngineSeries {
            provider: e.provider.clone(),
            display_name: e.display_name.clone(),
            color: engine_color(&e.provider),
        })
        .collect()
}

/// Headline numbers: the unweighted mean over engines, 0 when there are none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiSummary {
    pub visibility: f64,
    pub rec_rate: f64,
    pub sov: f64,
}

pub fn kpi_summary(engines: &[EngineOverview]) -> KpiSummary {
    let mean = |f: fn(&EngineOverview) -> f64| {
        let values: Vec<f64> = engines.iter().map(f).collect();
        average(&values).map_or(0.0, |v| round_to(v, 1))
    };

    KpiSummary {
        visibility: mean(|e| e.visibility),
        rec_rate: mean(|e| e.rec_rate),
        sov: mean(|e| e.sov),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentCategory {
    pub sentiment: Sentiment,
    pub color: &'static str,
}

/// Per-engine sentiment counts with every category present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentBar {
    pub provider: String,
    pub display_name: String,
    pub counts: BTreeMap<Sentiment, i64>,
}

pub fn sentiment_categories() -> Vec<SentimentCategory> {
    Sentiment::ALL
        .into_iter()
        .map(|sentiment| SentimentCategory {
            sentiment,
            color: sentiment_color(sentiment),
        })
        .collect()
}

/// Zero-fills the four known categories; labels outside them are dropped.
pub fn sentiment_bars(engines: &[EngineOverview]) -> Vec<SentimentBar> {
    engines
        .iter()
        .map(|e| {
            let mut counts: BTreeMap<Sentiment, i64> =
                Sentiment::ALL.into_iter().map(|s| (s, 0)).collect();
            for (label, count) in &e.sentiment_dist {
                if let Some(sentiment) = Sentiment::parse(label) {
                    *counts.entry(sentiment).or_insert(0) += count;
                }
            }
            SentimentBar {
                provider: e.provider.clone(),
                display_name: e.display_name.clone(),
                counts,
            }
        })
        .collect()
}

/// Color for the `index`-th ranked competitor; the palette repeats.
pub fn competitor_color(index: usize) -> &'static str {
    BRAND_PALETTE[index % BRAND_PALETTE.len()]
}
