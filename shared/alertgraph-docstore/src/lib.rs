//! AlertGraph Document Store
//!
//! Client for the Firestore REST API (or the Firestore emulator), used for
//! the `messages` and `weatherAlerts` collections. Documents travel in
//! Firestore's typed value encoding; [`value`] converts them to and from plain
//! JSON so callers can decode straight into serde types.

mod client;
mod config;
mod document;
mod error;
pub mod value;

pub use client::{is_valid_document_id, BatchItem, DocStoreClient};
pub use config::DocStoreConfig;
pub use document::Document;
pub use error::{DocStoreError, Result};
