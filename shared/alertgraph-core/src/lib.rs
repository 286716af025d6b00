//! AlertGraph Core - Shared domain types and service infrastructure
//!
//! This crate provides:
//! - Domain records read from the relational and document stores
//! - The error taxonomy surfaced at the API boundary
//! - Service lifecycle trait and runtime bootstrap
//! - Base configuration read from the environment

pub mod config;
pub mod domain;
pub mod error;
pub mod service;

pub use config::ServiceConfig;
pub use domain::*;
pub use error::{AlertGraphError, Result};
pub use service::{AlertGraphService, DependencyStatus, HealthStatus, ReadinessStatus, ServiceRuntime};
