//! Weather alert metadata in PostgreSQL

use alertgraph_core::{AlertMetadata, Result, Severity};
use alertgraph_pg::{PgPool, Row, ToSql};
use alertgraph_telemetry::Histogram;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::{debug, info, instrument};

use super::{store_err, AlertMetadataRepository, MetadataFilter};

const METADATA_COLUMNS: &str = "id, region, severity, issued_at, created_at";

pub struct PgAlertMetadataRepository {
    pool: PgPool,
    latency: Histogram,
}

impl PgAlertMetadataRepository {
    pub fn new(pool: PgPool, latency: Histogram) -> Self {
        Self { pool, latency }
    }

    async fn run(&self, columns: &str, filter: &MetadataFilter) -> Result<Vec<Row>> {
        let (sql, params) = build_search_query(columns, filter);
        debug!(%sql, params = params.len(), "Executing metadata search");

        let started = Instant::now();
        let rows = self
            .pool
            .query(&sql, &params)
            .await
            .map_err(|e| store_err("failed to search weather alert metadata", e))?;
        self.latency.record_since(started);
        Ok(rows)
    }
}

/// `SELECT {columns} FROM weather_alert_metadata [WHERE ...] ORDER BY issued_at DESC`
/// with one positional parameter per present filter field.
pub(crate) fn build_search_query<'a>(
    columns: &str,
    filter: &'a MetadataFilter,
) -> (String, Vec<&'a (dyn ToSql + Sync)>) {
    let mut conditions = Vec::new();
    let mut params: Vec<&'a (dyn ToSql + Sync)> = Vec::new();

    if let Some(region) = &filter.region {
        params.push(region);
        conditions.push(format!("region = ${}", params.len()));
    }

    if let Some(issued_after) = &filter.issued_after {
        params.push(issued_after);
        conditions.push(format!("issued_at >= ${}", params.len()));
    }

    let mut sql = format!("SELECT {} FROM weather_alert_metadata", columns);
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(" ORDER BY issued_at DESC");

    (sql, params)
}

fn metadata_from_row(row: &Row) -> Result<AlertMetadata> {
    let severity: String = row
        .try_get("severity")
        .map_err(|e| store_err("failed to scan metadata", e))?;

    Ok(AlertMetadata {
        id: row
            .try_get("id")
            .map_err(|e| store_err("failed to scan metadata", e))?,
        region: row
            .try_get("region")
            .map_err(|e| store_err("failed to scan metadata", e))?,
        severity: severity.parse::<Severity>()?,
        issued_at: row
            .try_get::<_, DateTime<Utc>>("issued_at")
            .map_err(|e| store_err("failed to scan metadata", e))?,
        created_at: row
            .try_get::<_, DateTime<Utc>>("created_at")
            .map_err(|e| store_err("failed to scan metadata", e))?,
    })
}

#[async_trait]
impl AlertMetadataRepository for PgAlertMetadataRepository {
    #[instrument(skip(self))]
    async fn search(&self, filter: &MetadataFilter) -> Result<Vec<AlertMetadata>> {
        let rows = self.run(METADATA_COLUMNS, filter).await?;
        let metadata = rows.iter().map(metadata_from_row).collect::<Result<Vec<_>>>()?;

        info!(count = metadata.len(), "Found weather alert metadata");
        Ok(metadata)
    }

    #[instrument(skip(self))]
    async fn search_ids(&self, filter: &MetadataFilter) -> Result<Vec<String>> {
        let rows = self.run("id", filter).await?;
        let ids = rows
            .iter()
            .map(|row| row.try_get::<_, String>("id"))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| store_err("failed to scan ID", e))?;

        info!(count = ids.len(), "Found weather alert IDs");
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_query_without_filter() {
        let filter = MetadataFilter::default();
        let (sql, params) = build_search_query(METADATA_COLUMNS, &filter);
        assert_eq!(
            sql,
            "SELECT id, region, severity, issued_at, created_at FROM weather_alert_metadata ORDER BY issued_at DESC"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_query_with_region() {
        let filter = MetadataFilter {
            region: Some("Tokyo".to_string()),
            ..Default::default()
        };
        let (sql, params) = build_search_query("id", &filter);
        assert_eq!(
            sql,
            "SELECT id FROM weather_alert_metadata WHERE region = $1 ORDER BY issued_at DESC"
        );
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_query_with_issued_after_only() {
        let filter = MetadataFilter {
            issued_after: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        let (sql, _) = build_search_query("id", &filter);
        assert!(sql.ends_with("WHERE issued_at >= $1 ORDER BY issued_at DESC"));
    }

    #[test]
    fn test_query_with_both_filters() {
        let filter = MetadataFilter {
            region: Some("Tokyo".to_string()),
            issued_after: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        };
        let (sql, params) = build_search_query(METADATA_COLUMNS, &filter);
        assert!(sql.contains("WHERE region = $1 AND issued_at >= $2 ORDER BY issued_at DESC"));
        assert_eq!(params.len(), 2);
    }

    #[tokio::test]
    async fn test_live_search_is_descending() {
        // Requires a seeded PostgreSQL instance
        let Ok(url) = std::env::var("DATABASE_URL") else {
            return;
        };
        let pool = PgPool::new(alertgraph_pg::PoolConfig { url, max_size: 2 })
            .await
            .unwrap();
        let repo = PgAlertMetadataRepository::new(pool, Histogram::new("test"));

        let filter = MetadataFilter {
            region: Some("Tokyo".to_string()),
            ..Default::default()
        };
        let found = repo.search(&filter).await.unwrap();
        assert!(found.iter().all(|m| m.region == "Tokyo"));
        assert!(found.windows(2).all(|w| w[0].issued_at >= w[1].issued_at));

        let ids = repo.search_ids(&filter).await.unwrap();
        let expected: Vec<String> = found.into_iter().map(|m| m.id).collect();
        assert_eq!(ids, expected);
    }
}
