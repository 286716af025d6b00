//! GraphQL schema
//!
//! Store accessors are injected as schema data through [`AppContext`].

pub mod query;
pub mod types;

use alertgraph_core::AlertGraphError;
use async_graphql::extensions::apollo_persisted_queries::{
    ApolloPersistedQueries, LruCacheStorage,
};
use async_graphql::extensions::Tracing;
use async_graphql::{EmptyMutation, EmptySubscription, ErrorExtensions, Schema};
use std::sync::Arc;
use tracing::warn;

use crate::alerts::WeatherAlertService;
use crate::repository::{MessageRepository, UserRepository};

pub use query::QueryRoot;

pub type ApiSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// Resolver dependencies
#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UserRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub weather_alerts: Arc<WeatherAlertService>,
}

/// Query limits applied to every request
#[derive(Debug, Clone, Copy)]
pub struct SchemaLimits {
    pub persisted_query_cache: usize,
    pub max_depth: usize,
    pub max_complexity: usize,
}

impl Default for SchemaLimits {
    fn default() -> Self {
        Self {
            persisted_query_cache: 100,
            max_depth: 10,
            max_complexity: 200,
        }
    }
}

pub fn build_schema(ctx: AppContext, limits: SchemaLimits) -> ApiSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(ctx)
        .extension(Tracing)
        .extension(ApolloPersistedQueries::new(LruCacheStorage::new(
            limits.persisted_query_cache.max(1),
        )))
        .limit_depth(limits.max_depth)
        .limit_complexity(limits.max_complexity)
        .finish()
}

/// Maps a domain error onto a GraphQL error with `extensions.code`
pub(crate) fn gql_error(err: AlertGraphError) -> async_graphql::Error {
    if matches!(err, AlertGraphError::Store(_) | AlertGraphError::Internal(_)) {
        warn!(error = %err, "Query failed");
    }
    let code = err.error_code();
    async_graphql::Error::new(err.to_string()).extend_with(|_, e| e.set("code", code))
}
