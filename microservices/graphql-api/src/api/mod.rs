//! API module - GraphQL, playground, health endpoints

pub mod rest;

use alertgraph_core::{AlertGraphService, DependencyStatus, ReadinessStatus};
use alertgraph_docstore::DocStoreClient;
use alertgraph_pg::PgPool;
use alertgraph_telemetry::Histogram;
use async_graphql_axum::GraphQL;
use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Instant;

use crate::alerts::JoinStats;
use crate::schema::ApiSchema;

/// Shared application state
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<dyn AlertGraphService>,
    pub stores: Arc<BackingStores>,
    pub metrics: ApiMetrics,
    pub started: Instant,
}

/// Store call metrics exposed on `/stats`
#[derive(Clone)]
pub struct ApiMetrics {
    pub join: JoinStats,
    pub metadata_latency: Histogram,
    pub detail_latency: Histogram,
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self {
            join: JoinStats::default(),
            metadata_latency: Histogram::new("metadata_store_ms"),
            detail_latency: Histogram::new("detail_store_ms"),
        }
    }
}

/// Connectivity checks against both backing stores
pub struct BackingStores {
    pub pg: PgPool,
    pub docstore: DocStoreClient,
}

impl BackingStores {
    pub async fn check(&self) -> ReadinessStatus {
        let started = Instant::now();
        let pg_ok = self.pg.is_healthy().await;
        let pg_ms = started.elapsed().as_millis() as u64;

        let started = Instant::now();
        let docstore_ok = self.docstore.is_healthy().await;
        let docstore_ms = started.elapsed().as_millis() as u64;

        ReadinessStatus::from_dependencies(vec![
            DependencyStatus {
                name: "postgres".to_string(),
                available: pg_ok,
                latency_ms: Some(pg_ms),
            },
            DependencyStatus {
                name: "firestore".to_string(),
                available: docstore_ok,
                latency_ms: Some(docstore_ms),
            },
        ])
    }
}

pub fn create_router(schema: ApiSchema, state: ApiState) -> Router {
    Router::new()
        // Playground and GraphQL endpoint
        .route("/", get(rest::playground))
        .route_service("/query", GraphQL::new(schema))
        // Health and stats
        .route("/health", get(rest::health_check))
        .route("/ready", get(rest::ready_check))
        .route("/stats", get(rest::stats))
        .with_state(state)
}
