//! GraphQL API Microservice
//!
//! Serves users, messages and weather alerts over GraphQL:
//! - Users and alert metadata from PostgreSQL
//! - Messages and alert details from Firestore
//! - Weather alerts joined across both stores

use alertgraph_core::{
    AlertGraphError, AlertGraphService, HealthStatus, ReadinessStatus, Result, ServiceRuntime,
};
use alertgraph_docstore::DocStoreClient;
use alertgraph_pg::PgPool;
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

mod alerts;
mod api;
mod config;
mod repository;
mod schema;


pub use config::ApiConfig;

use alerts::WeatherAlertService;
use api::{ApiMetrics, ApiState, BackingStores};
use repository::{
    DocAlertDetailRepository, DocMessageRepository, PgAlertMetadataRepository, PgUserRepository,
};
use schema::{build_schema, AppContext, ApiSchema, SchemaLimits};

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = alertgraph_telemetry::init("graphql-api")
        .map_err(|e| AlertGraphError::Config(e.to_string()))?;

    info!("Starting GraphQL API microservice");

    let service = Arc::new(GraphqlApiService::new().await?);
    ServiceRuntime::run(service).await
}

pub struct GraphqlApiService {
    config: ApiConfig,
    schema: ApiSchema,
    stores: Arc<BackingStores>,
    metrics: ApiMetrics,
    start_time: Instant,
}

impl GraphqlApiService {
    pub async fn new() -> Result<Self> {
        let config = ApiConfig::from_env()?;

        let pool = PgPool::new(config.pool.clone())
            .await
            .map_err(|e| AlertGraphError::Config(e.to_string()))?;
        let docstore = DocStoreClient::new(&config.docstore)
            .map_err(|e| AlertGraphError::Config(e.to_string()))?;

        let metrics = ApiMetrics::default();
        let weather_alerts = WeatherAlertService::new(
            Arc::new(PgAlertMetadataRepository::new(
                pool.clone(),
                metrics.metadata_latency.clone(),
            )),
            Arc::new(DocAlertDetailRepository::new(
                docstore.clone(),
                metrics.detail_latency.clone(),
            )),
            metrics.join.clone(),
        );

        let ctx = AppContext {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            messages: Arc::new(DocMessageRepository::new(docstore.clone())),
            weather_alerts: Arc::new(weather_alerts),
        };

        let schema = build_schema(
            ctx,
            SchemaLimits {
                persisted_query_cache: config.persisted_query_cache,
                max_depth: config.max_query_depth,
                max_complexity: config.max_query_complexity,
            },
        );

        let stores = BackingStores { pg: pool, docstore };
        Ok(Self::assemble(config, schema, stores, metrics))
    }

    fn assemble(
        config: ApiConfig,
        schema: ApiSchema,
        stores: BackingStores,
        metrics: ApiMetrics,
    ) -> Self {
        Self {
            config,
            schema,
            stores: Arc::new(stores),
            metrics,
            start_time: Instant::now(),
        }
    }

    /// HTTP surface. `/health` and `/ready` answer through this service.
    fn router(self: &Arc<Self>) -> Router {
        let state = ApiState {
            service: self.clone(),
            stores: self.stores.clone(),
            metrics: self.metrics.clone(),
            started: self.start_time,
        };
        api::create_router(self.schema.clone(), state)
    }
}

#[async_trait::async_trait]
impl AlertGraphService for GraphqlApiService {
    fn service_id(&self) -> &'static str {
        "graphql-api"
    }

    async fn health(&self) -> HealthStatus {
        HealthStatus {
            healthy: true,
            service_id: self.service_id().to_string(),
            version: self.version().to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    async fn ready(&self) -> ReadinessStatus {
        self.stores.check().await
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down GraphQL API");
        Ok(())
    }

    async fn start(self: Arc<Self>) -> Result<()> {
        info!(
            http = %self.config.http_bind(),
            "Starting GraphQL API server (playground at /)"
        );

        let app = self.router();

        let listener = tokio::net::TcpListener::bind(&self.config.http_bind()).await?;
        axum::serve(listener, app)
            .await
            .map_err(|e| AlertGraphError::Internal(format!("server error: {}", e)))?;

        Ok(())
    }
}
