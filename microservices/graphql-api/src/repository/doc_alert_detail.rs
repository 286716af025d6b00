//! Weather alert details in the document store

use alertgraph_core::{AlertDetail, AlertGraphError, Result};
use alertgraph_docstore::{BatchItem, DocStoreClient};
use alertgraph_telemetry::Histogram;
use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::{store_err, AlertDetailRepository};

pub const WEATHER_ALERTS_COLLECTION: &str = "weatherAlerts";

pub struct DocAlertDetailRepository {
    client: DocStoreClient,
    latency: Histogram,
}

impl DocAlertDetailRepository {
    pub fn new(client: DocStoreClient, latency: Histogram) -> Self {
        Self { client, latency }
    }
}

#[async_trait]
impl AlertDetailRepository for DocAlertDetailRepository {
    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> Result<AlertDetail> {
        let document = self
            .client
            .get(WEATHER_ALERTS_COLLECTION, id)
            .await
            .map_err(|e| store_err("failed to fetch weather alert", e))?
            .ok_or_else(|| AlertGraphError::not_found(format!("weather alert not found: {}", id)))?;

        let alert = document
            .decode::<AlertDetail>()
            .map_err(|e| store_err("failed to decode weather alert", e))?;

        debug!("Fetched weather alert");
        Ok(alert)
    }

    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<AlertDetail>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut seen = HashSet::with_capacity(ids.len());
        let unique: Vec<String> = ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();

        let started = Instant::now();
        let items = self
            .client
            .batch_get(WEATHER_ALERTS_COLLECTION, &unique)
            .await
            .map_err(|e| store_err("failed to fetch weather alerts", e))?;
        self.latency.record_since(started);

        let mut emitted = HashSet::with_capacity(unique.len());
        let mut alerts = Vec::with_capacity(unique.len());
        for item in items {
            let document = match item {
                BatchItem::Found(document) => document,
                BatchItem::Missing(name) => {
                    debug!(%name, "Weather alert missing (skipping)");
                    continue;
                }
            };

            match document.decode::<AlertDetail>() {
                Ok(alert) if seen.contains(alert.id.as_str()) && emitted.insert(alert.id.clone()) => {
                    alerts.push(alert)
                }
                Ok(alert) => {
                    warn!(document = %document.name, id = %alert.id, "Unexpected weather alert id (skipping)");
                }
                Err(e) => {
                    warn!(document = %document.name, error = %e, "Failed to decode weather alert (skipping)");
                }
            }
        }

        info!(
            fetched = alerts.len(),
            requested = ids.len(),
            "Fetched weather alerts"
        );
        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alertgraph_docstore::DocStoreConfig;
    use axum::extract::State;
    use axum::http::{Method, StatusCode, Uri};
    use axum::response::{IntoResponse, Response};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    fn unreachable_repo() -> DocAlertDetailRepository {
        let client = DocStoreClient::new(&DocStoreConfig {
            emulator_host: Some("127.0.0.1:1".to_string()),
            ..Default::default()
        })
        .unwrap();
        DocAlertDetailRepository::new(client, Histogram::new("test"))
    }

    fn alert_doc(id: &str, title: &str) -> serde_json::Value {
        json!({
            "name": format!("projects/demo-project/databases/(default)/documents/weatherAlerts/{}", id),
            "fields": {
                "title": {"stringValue": title},
                "description": {"stringValue": "test"},
                "rawData": {"mapValue": {"fields": {"pressure": {"integerValue": "900"}}}},
            }
        })
    }

    /// Serves `alert1` on single gets and a fixed batchGet answer: a
    /// duplicate hit, a miss, an undecodable document and a document nobody
    /// asked for. Batches naming a malformed document are refused outright.
    async fn fake_docstore(
        State(frames): State<Value>,
        method: Method,
        uri: Uri,
        body: String,
    ) -> Response {
        if method == Method::GET {
            return if uri.path().ends_with("/weatherAlerts/alert1") {
                Json(alert_doc("alert1", "Typhoon")).into_response()
            } else {
                StatusCode::NOT_FOUND.into_response()
            };
        }

        let request: Value = serde_json::from_str(&body).unwrap();
        let malformed = request["documents"].as_array().unwrap().iter().any(|name| {
            let id = name.as_str().unwrap().rsplit_once("/weatherAlerts/").map(|(_, id)| id);
            !matches!(id, Some(id) if !id.is_empty() && !id.contains('/'))
        });
        if malformed {
            return (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT").into_response();
        }
        Json(frames).into_response()
    }

    async fn spawn_fake() -> DocAlertDetailRepository {
        let frames = json!([
            {"found": alert_doc("alert1", "Typhoon")},
            {"missing": "projects/demo-project/databases/(default)/documents/weatherAlerts/alert2"},
            {"found": {
                "name": "projects/demo-project/databases/(default)/documents/weatherAlerts/alert3",
                "fields": {"title": {"integerValue": "7"}}
            }},
            {"found": alert_doc("alert9", "Stray")},
            {"found": alert_doc("alert1", "Typhoon")},
            {"readTime": "2024-01-15T10:00:00Z"},
        ]);
        let app = Router::new().fallback(fake_docstore).with_state(frames);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = DocStoreClient::new(&DocStoreConfig {
            emulator_host: Some(addr.to_string()),
            ..Default::default()
        })
        .unwrap();
        DocAlertDetailRepository::new(client, Histogram::new("test"))
    }

    #[tokio::test]
    async fn test_batch_skips_missing_and_undecodable() {
        let repo = spawn_fake().await;
        let ids: Vec<String> = ["alert1", "alert2", "alert3", "alert1"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let alerts = repo.get_by_ids(&ids).await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, "alert1");
        assert_eq!(alerts[0].title, "Typhoon");
        assert_eq!(alerts[0].raw_data["pressure"], 900);
        assert!(alerts[0].affected_areas.is_empty());
        assert_eq!(repo.latency.count(), 1);
    }

    #[tokio::test]
    async fn test_batch_with_malformed_ids_keeps_valid_ones() {
        let repo = spawn_fake().await;
        let ids: Vec<String> = ["alert1", "", "a/b"].iter().map(|s| s.to_string()).collect();

        let alerts = repo.get_by_ids(&ids).await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, "alert1");
    }

    #[tokio::test]
    async fn test_get_by_id_does_not_resolve_lookalike_ids() {
        let repo = spawn_fake().await;
        assert_eq!(repo.get_by_id("alert1").await.unwrap().title, "Typhoon");

        for id in ["alert1#x", "x/../alert1", ""] {
            let err = repo.get_by_id(id).await.unwrap_err();
            assert!(err.is_not_found(), "{:?}: {:?}", id, err);
        }
    }

    #[tokio::test]
    async fn test_empty_ids_never_touch_store() {
        let repo = unreachable_repo();
        assert!(repo.get_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_total_failure_is_store_error() {
        let repo = unreachable_repo();
        let err = repo.get_by_ids(&["alert1".to_string()]).await.unwrap_err();
        assert!(matches!(err, AlertGraphError::Store(_)));

        let err = repo.get_by_id("alert1").await.unwrap_err();
        assert!(matches!(err, AlertGraphError::Store(_)));
    }
}
