//! Document store configuration

use std::time::Duration;

const PRODUCTION_ENDPOINT: &str = "https://firestore.googleapis.com/v1";

#[derive(Debug, Clone)]
pub struct DocStoreConfig {
    pub project_id: String,
    /// `host:port` of a Firestore emulator. Takes precedence over `endpoint`.
    pub emulator_host: Option<String>,
    pub endpoint: String,
    /// OAuth bearer token for production Firestore. The emulator ignores it.
    pub access_token: Option<String>,
    pub request_timeout: Duration,
}

impl Default for DocStoreConfig {
    fn default() -> Self {
        Self {
            project_id: "demo-project".to_string(),
            emulator_host: None,
            endpoint: PRODUCTION_ENDPOINT.to_string(),
            access_token: None,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl DocStoreConfig {
    pub fn from_env() -> Self {
        Self {
            project_id: std::env::var("GCP_PROJECT_ID")
                .unwrap_or_else(|_| "demo-project".to_string()),
            emulator_host: std::env::var("FIRESTORE_EMULATOR_HOST")
                .ok()
                .filter(|h| !h.is_empty()),
            endpoint: PRODUCTION_ENDPOINT.to_string(),
            access_token: std::env::var("FIRESTORE_ACCESS_TOKEN").ok(),
            request_timeout: Duration::from_secs(
                std::env::var("DOCSTORE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
        }
    }

    /// REST root, e.g. `http://localhost:8081/v1`
    pub fn base_url(&self) -> String {
        match &self.emulator_host {
            Some(host) => format!("http://{}/v1", host.trim_end_matches('/')),
            None => self.endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Resource name of the default database's document root
    pub fn documents_root(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emulator_base_url() {
        let config = DocStoreConfig {
            emulator_host: Some("localhost:8081/".to_string()),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://localhost:8081/v1");
    }

    #[test]
    fn test_production_base_url() {
        let config = DocStoreConfig::default();
        assert_eq!(config.base_url(), "https://firestore.googleapis.com/v1");
        assert_eq!(
            config.documents_root(),
            "projects/demo-project/databases/(default)/documents"
        );
    }
}
