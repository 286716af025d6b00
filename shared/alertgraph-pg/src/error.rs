//! PostgreSQL Error Types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PgError>;

#[derive(Debug, Error)]
pub enum PgError {
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
