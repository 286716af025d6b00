//! Base configuration shared by AlertGraph binaries

use crate::error::{AlertGraphError, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    pub http_port: u16,
    pub log_level: String,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "alertgraph".to_string()),
            http_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|e| AlertGraphError::Config(format!("Invalid PORT: {}", e)))?,
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Listen address for the HTTP server
    pub fn http_bind(&self) -> String {
        format!("0.0.0.0:{}", self.http_port)
    }
}
