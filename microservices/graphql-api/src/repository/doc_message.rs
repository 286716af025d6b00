//! Messages in the document store

use alertgraph_core::{AlertGraphError, Message, Result};
use alertgraph_docstore::DocStoreClient;
use async_trait::async_trait;
use tracing::{info, instrument};

use super::{store_err, MessageRepository};

pub const MESSAGES_COLLECTION: &str = "messages";

pub struct DocMessageRepository {
    client: DocStoreClient,
}

impl DocMessageRepository {
    pub fn new(client: DocStoreClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessageRepository for DocMessageRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Message>> {
        let documents = self
            .client
            .list(MESSAGES_COLLECTION, Some("createdAt desc"))
            .await
            .map_err(|e| store_err("failed to list messages", e))?;

        let messages = documents
            .iter()
            .map(|doc| doc.decode::<Message>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| store_err("failed to decode message", e))?;

        info!(count = messages.len(), "Fetched messages");
        Ok(messages)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> Result<Message> {
        let document = self
            .client
            .get(MESSAGES_COLLECTION, id)
            .await
            .map_err(|e| store_err("failed to fetch message", e))?
            .ok_or_else(|| AlertGraphError::not_found(format!("message not found: {}", id)))?;

        document
            .decode::<Message>()
            .map_err(|e| store_err("failed to decode message", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alertgraph_docstore::DocStoreConfig;

    #[tokio::test]
    async fn test_malformed_id_is_not_found_without_a_request() {
        // Unroutable endpoint: a request would surface as a store error.
        let client = DocStoreClient::new(&DocStoreConfig {
            emulator_host: Some("127.0.0.1:1".to_string()),
            ..Default::default()
        })
        .unwrap();
        let repo = DocMessageRepository::new(client);

        for id in ["", "msg1/../msg2", ".."] {
            let err = repo.get_by_id(id).await.unwrap_err();
            assert!(err.is_not_found(), "{:?}: {:?}", id, err);
        }
    }
}
