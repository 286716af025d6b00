//! AlertGraph PostgreSQL access
//!
//! Connection pooling over tokio-postgres for the relational store that holds
//! users and weather alert metadata.

mod error;
mod pool;

pub use error::{PgError, Result};
pub use pool::{PgPool, PoolConfig, PoolStats};

/// Re-export tokio-postgres types for convenience
pub use tokio_postgres::{types::ToSql, Row};
