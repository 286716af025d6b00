//! In-memory accessors for tests

use alertgraph_core::{AlertDetail, AlertGraphError, AlertMetadata, Message, Result, User};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{
    AlertDetailRepository, AlertMetadataRepository, MessageRepository, MetadataFilter,
    UserRepository,
};

#[derive(Default)]
pub struct MemoryMetadataRepository {
    pub records: Vec<AlertMetadata>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl MemoryMetadataRepository {
    pub fn with(records: Vec<AlertMetadata>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AlertMetadataRepository for MemoryMetadataRepository {
    async fn search(&self, filter: &MetadataFilter) -> Result<Vec<AlertMetadata>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AlertGraphError::store("meta DB error"));
        }

        let mut found: Vec<AlertMetadata> = self
            .records
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(found)
    }

    async fn search_ids(&self, filter: &MetadataFilter) -> Result<Vec<String>> {
        Ok(self.search(filter).await?.into_iter().map(|m| m.id).collect())
    }
}

/// Returns batch results in reverse request order so callers must
/// re-correlate by id.
#[derive(Default)]
pub struct MemoryDetailRepository {
    pub alerts: HashMap<String, AlertDetail>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl MemoryDetailRepository {
    pub fn with(alerts: Vec<AlertDetail>) -> Self {
        Self {
            alerts: alerts.into_iter().map(|a| (a.id.clone(), a)).collect(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AlertDetailRepository for MemoryDetailRepository {
    async fn get_by_id(&self, id: &str) -> Result<AlertDetail> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AlertGraphError::store("alert DB error"));
        }
        self.alerts
            .get(id)
            .cloned()
            .ok_or_else(|| AlertGraphError::not_found(format!("weather alert not found: {}", id)))
    }

    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<AlertDetail>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AlertGraphError::store("alert DB error"));
        }

        let mut found: Vec<AlertDetail> = Vec::new();
        for id in ids {
            if found.iter().any(|a| &a.id == id) {
                continue;
            }
            if let Some(alert) = self.alerts.get(id) {
                found.push(alert.clone());
            }
        }
        found.reverse();
        Ok(found)
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    pub users: Vec<User>,
    pub fail: bool,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>> {
        if self.fail {
            return Err(AlertGraphError::store("db error"));
        }
        let mut users = self.users.clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn get_by_id(&self, id: &str) -> Result<User> {
        if self.fail {
            return Err(AlertGraphError::store("db error"));
        }
        self.users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| AlertGraphError::not_found(format!("user not found: {}", id)))
    }
}

#[derive(Default)]
pub struct MemoryMessageRepository {
    pub messages: Vec<Message>,
    pub fail: bool,
}

#[async_trait]
impl MessageRepository for MemoryMessageRepository {
    async fn list(&self) -> Result<Vec<Message>> {
        if self.fail {
            return Err(AlertGraphError::store("db error"));
        }
        let mut messages = self.messages.clone();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages)
    }

    async fn get_by_id(&self, id: &str) -> Result<Message> {
        if self.fail {
            return Err(AlertGraphError::store("db error"));
        }
        self.messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| AlertGraphError::not_found(format!("message not found: {}", id)))
    }
}
