//! Store accessors
//!
//! One capability trait per store responsibility. Concrete implementations
//! are constructed in `main` and handed to the schema as trait objects.

pub mod doc_alert_detail;
pub mod doc_message;
pub mod pg_alert_metadata;
pub mod pg_user;

#[cfg(test)]
pub mod memory;

use alertgraph_core::{AlertDetail, AlertGraphError, AlertMetadata, Message, Result, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Display;

pub use doc_alert_detail::DocAlertDetailRepository;
pub use doc_message::DocMessageRepository;
pub use pg_alert_metadata::PgAlertMetadataRepository;
pub use pg_user::PgUserRepository;

/// Narrowing filter over alert metadata. `None` leaves a dimension open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataFilter {
    pub region: Option<String>,
    /// Inclusive lower bound on `issued_at`
    pub issued_after: Option<DateTime<Utc>>,
}

impl MetadataFilter {
    pub fn matches(&self, metadata: &AlertMetadata) -> bool {
        let region_ok = self
            .region
            .as_deref()
            .map_or(true, |region| metadata.region == region);
        let issued_ok = self
            .issued_after
            .map_or(true, |bound| metadata.issued_at >= bound);
        region_ok && issued_ok
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, newest first
    async fn list(&self) -> Result<Vec<User>>;

    async fn get_by_id(&self, id: &str) -> Result<User>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// All messages, newest first
    async fn list(&self) -> Result<Vec<Message>>;

    async fn get_by_id(&self, id: &str) -> Result<Message>;
}

/// Metadata search over the relational store
#[async_trait]
pub trait AlertMetadataRepository: Send + Sync {
    /// Matching metadata ordered by `issued_at` descending. No match is an
    /// empty vec, not an error.
    async fn search(&self, filter: &MetadataFilter) -> Result<Vec<AlertMetadata>>;

    /// Same filtering and ordering as [`search`](Self::search), ids only.
    async fn search_ids(&self, filter: &MetadataFilter) -> Result<Vec<String>>;
}

/// Full alert records from the document store
#[async_trait]
pub trait AlertDetailRepository: Send + Sync {
    async fn get_by_id(&self, id: &str) -> Result<AlertDetail>;

    /// Best-effort batch fetch. Ids that are missing or fail to decode are
    /// skipped; only a failure of the whole fetch is an error. The result is
    /// at most `ids.len()` long, holds no duplicates, and its order is
    /// unspecified.
    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<AlertDetail>>;
}

pub(crate) fn store_err(context: &str, err: impl Display) -> AlertGraphError {
    AlertGraphError::store(format!("{}: {}", context, err))
}
