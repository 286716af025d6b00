//! Error types for AlertGraph services

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AlertGraphError>;

#[derive(Error, Debug)]
pub enum AlertGraphError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed caller input. Raised before any store is touched.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Connectivity, query or decode failure in either backing store.
    #[error("Store error: {0}")]
    Store(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AlertGraphError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Store(_) => "STORE_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<std::io::Error> for AlertGraphError {
    fn from(err: std::io::Error) -> Self {
        AlertGraphError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(AlertGraphError::validation("bad").error_code(), "VALIDATION_ERROR");
        assert_eq!(AlertGraphError::store("down").error_code(), "STORE_ERROR");
        assert_eq!(AlertGraphError::not_found("x").error_code(), "NOT_FOUND");
        assert_eq!(AlertGraphError::Config("port".into()).error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_display() {
        let err = AlertGraphError::store("connection refused");
        assert_eq!(err.to_string(), "Store error: connection refused");
        assert!(AlertGraphError::not_found("alert1").is_not_found());
    }
}
