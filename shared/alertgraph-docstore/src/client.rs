//! Firestore REST client

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, instrument, warn};

use crate::{DocStoreConfig, DocStoreError, Document, Result};

const LIST_PAGE_SIZE: u32 = 300;

/// One entry of a `batchGet` response
#[derive(Debug, Clone)]
pub enum BatchItem {
    Found(Document),
    /// Resource name of a document that does not exist
    Missing(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchGetResponse {
    found: Option<Document>,
    missing: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

/// Document store client.
///
/// Wraps a pooled `reqwest::Client`; clones share connections and are safe to
/// use from concurrent requests.
#[derive(Clone)]
pub struct DocStoreClient {
    http: Client,
    base_url: String,
    documents_root: String,
    access_token: Option<String>,
}

impl DocStoreClient {
    pub fn new(config: &DocStoreConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DocStoreError::Configuration(format!("HTTP client: {}", e)))?;

        debug!(
            project_id = %config.project_id,
            emulator = config.emulator_host.is_some(),
            "Document store client initialized"
        );

        Ok(Self {
            http,
            base_url: config.base_url(),
            documents_root: config.documents_root(),
            access_token: config.access_token.clone(),
        })
    }

    /// Full resource name of a document
    pub fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.documents_root, collection, id)
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    /// URL of a single document. The id is percent-encoded as one path
    /// segment, so `#`, `?` and `%` never leave it.
    fn document_url(&self, collection: &str, id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| DocStoreError::Configuration(format!("base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                DocStoreError::Configuration(format!("base URL has no path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(self.documents_root.split('/'))
            .push(collection)
            .push(id);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetch one document. `Ok(None)` when it does not exist.
    #[instrument(skip(self))]
    pub async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        if !is_valid_document_id(id) {
            debug!("Invalid document id, nothing to fetch");
            return Ok(None);
        }

        let url = self.document_url(collection, id)?;
        let response = self.authorize(self.http.get(url)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Document not found");
            return Ok(None);
        }

        let document = check(response).await?.json::<Document>().await?;
        Ok(Some(document))
    }

    /// Fetch several documents in one round trip. Entries come back in server
    /// order, which need not match `ids`. Ids that cannot name a document are
    /// dropped, since one malformed name fails the whole batch server side.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn batch_get(&self, collection: &str, ids: &[String]) -> Result<Vec<BatchItem>> {
        let names: Vec<String> = ids
            .iter()
            .filter(|id| {
                let valid = is_valid_document_id(id);
                if !valid {
                    warn!(id = %id, "Skipping invalid document id");
                }
                valid
            })
            .map(|id| self.document_name(collection, id))
            .collect();

        if names.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.url(&format!("{}:batchGet", self.documents_root));
        let response = self
            .authorize(self.http.post(&url))
            .json(&json!({ "documents": names }))
            .send()
            .await?;

        let entries: Vec<BatchGetResponse> = check(response).await?.json().await?;

        Ok(entries
            .into_iter()
            .filter_map(|entry| match (entry.found, entry.missing) {
                (Some(document), _) => Some(BatchItem::Found(document)),
                (None, Some(name)) => Some(BatchItem::Missing(name)),
                // transaction/readTime-only frames
                (None, None) => None,
            })
            .collect())
    }

    /// List every document of a collection, following page tokens.
    /// `order_by` uses Firestore syntax, e.g. `"createdAt desc"`.
    #[instrument(skip(self))]
    pub async fn list(&self, collection: &str, order_by: Option<&str>) -> Result<Vec<Document>> {
        let url = self.url(&format!("{}/{}", self.documents_root, collection));
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, String)> = vec![("pageSize", LIST_PAGE_SIZE.to_string())];
            if let Some(order) = order_by {
                query.push(("orderBy", order.to_string()));
            }
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let response = self
                .authorize(self.http.get(&url))
                .query(&query)
                .send()
                .await?;
            let page: ListDocumentsResponse = check(response).await?.json().await?;

            documents.extend(page.documents);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = documents.len(), "Listed documents");
        Ok(documents)
    }

    /// Create or overwrite a document with typed `fields`.
    #[instrument(skip(self, fields))]
    pub async fn set(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Result<()> {
        if !is_valid_document_id(id) {
            return Err(DocStoreError::InvalidId(id.to_string()));
        }

        let url = self.document_url(collection, id)?;
        let response = self
            .authorize(self.http.patch(url))
            .json(&json!({ "fields": fields }))
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    /// Cheap round trip used by readiness checks
    pub async fn is_healthy(&self) -> bool {
        let url = self.url(&format!("{}:listCollectionIds", self.documents_root));
        let result = self
            .authorize(self.http.post(&url))
            .json(&json!({ "pageSize": 1 }))
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!(error = %e, "Document store health check failed");
                false
            }
        }
    }
}

/// Whether `id` names exactly one document: non-empty, no `/`, and not a dot
/// segment.
pub fn is_valid_document_id(id: &str) -> bool {
    !id.is_empty() && !id.contains('/') && id != "." && id != ".."
}

async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(DocStoreError::Api {
        status: status.as_u16(),
        message,
    })
}
