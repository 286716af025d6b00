//! REST handlers

use alertgraph_core::{HealthStatus, ReadinessStatus};
use alertgraph_telemetry::Histogram;
use async_graphql::http::GraphiQLSource;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde_json::{json, Value};

use super::ApiState;

pub async fn playground() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/query").finish())
}

pub async fn health_check(State(state): State<ApiState>) -> Json<HealthStatus> {
    Json(state.service.health().await)
}

pub async fn ready_check(State(state): State<ApiState>) -> (StatusCode, Json<ReadinessStatus>) {
    let status = state.service.ready().await;
    let code = if status.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

fn latency(histogram: &Histogram) -> Value {
    json!({
        "count": histogram.count(),
        "mean_ms": histogram.mean(),
        "p50_ms": histogram.percentile(50.0),
        "p99_ms": histogram.percentile(99.0),
    })
}

pub async fn stats(State(state): State<ApiState>) -> Json<Value> {
    let metrics = &state.metrics;
    let pool = state.stores.pg.stats();

    Json(json!({
        "weather_alerts": {
            "joins": metrics.join.joins.get(),
            "omitted": metrics.join.omitted.get(),
            "latency": latency(&metrics.join.latency),
        },
        "metadata_store": latency(&metrics.metadata_latency),
        "detail_store": latency(&metrics.detail_latency),
        "pool": {
            "size": pool.size,
            "available": pool.available,
            "waiting": pool.waiting,
        },
        "uptime_seconds": state.started.elapsed().as_secs(),
    }))
}
