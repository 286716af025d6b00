//! GraphQL API Configuration

use alertgraph_core::{Result, ServiceConfig};
use alertgraph_docstore::DocStoreConfig;
use alertgraph_pg::PoolConfig;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub service: ServiceConfig,
    pub pool: PoolConfig,
    pub docstore: DocStoreConfig,
    pub persisted_query_cache: usize,
    pub max_query_depth: usize,
    pub max_query_complexity: usize,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            service: ServiceConfig::from_env()?,
            pool: PoolConfig::from_env(),
            docstore: DocStoreConfig::from_env(),
            persisted_query_cache: env_or("APQ_CACHE_SIZE", 100),
            max_query_depth: env_or("GRAPHQL_MAX_DEPTH", 10),
            max_query_complexity: env_or("GRAPHQL_MAX_COMPLEXITY", 200),
        })
    }

    pub fn http_bind(&self) -> String {
        self.service.http_bind()
    }
}

fn env_or(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
