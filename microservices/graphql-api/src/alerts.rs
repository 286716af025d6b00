//! Weather alert join
//!
//! Metadata search against the relational store, then batch hydration from
//! the document store, re-ordered by the metadata order. Metadata entries with
//! no detail document are dropped from the result.

use alertgraph_core::{AlertDetail, AlertGraphError, AlertMetadata, Result};
use alertgraph_telemetry::{Counter, Histogram};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};

use crate::repository::{AlertDetailRepository, AlertMetadataRepository, MetadataFilter};

/// Counters shared by the join and the `/stats` endpoint
#[derive(Clone)]
pub struct JoinStats {
    pub joins: Counter,
    pub omitted: Counter,
    pub latency: Histogram,
}

impl Default for JoinStats {
    fn default() -> Self {
        Self {
            joins: Counter::new("weather_alert_joins_total"),
            omitted: Counter::new("weather_alert_omitted_total"),
            latency: Histogram::new("weather_alert_join_ms"),
        }
    }
}

pub struct WeatherAlertService {
    metadata: Arc<dyn AlertMetadataRepository>,
    details: Arc<dyn AlertDetailRepository>,
    stats: JoinStats,
}

impl WeatherAlertService {
    pub fn new(
        metadata: Arc<dyn AlertMetadataRepository>,
        details: Arc<dyn AlertDetailRepository>,
        stats: JoinStats,
    ) -> Self {
        Self {
            metadata,
            details,
            stats,
        }
    }

    /// Alerts matching the filter, newest issue first.
    #[instrument(skip(self))]
    pub async fn weather_alerts(
        &self,
        region: Option<&str>,
        issued_after: Option<&str>,
    ) -> Result<Vec<AlertDetail>> {
        let filter = build_filter(region, issued_after)?;
        let started = Instant::now();

        let metadata = self.metadata.search(&filter).await?;
        if metadata.is_empty() {
            debug!("No metadata matched");
            return Ok(Vec::new());
        }

        let ids: Vec<String> = metadata.iter().map(|m| m.id.clone()).collect();
        let details = self.details.get_by_ids(&ids).await?;

        let (alerts, omitted) = join(&metadata, details);

        self.stats.joins.inc();
        self.stats.omitted.add(omitted as u64);
        self.stats.latency.record_since(started);

        info!(
            matched = metadata.len(),
            returned = alerts.len(),
            omitted,
            "Joined weather alerts"
        );
        Ok(alerts)
    }

    /// Single alert detail by id
    pub async fn alert(&self, id: &str) -> Result<AlertDetail> {
        self.details.get_by_id(id).await
    }

    /// Raw metadata matching the filter, newest issue first.
    #[instrument(skip(self))]
    pub async fn metadata(
        &self,
        region: Option<&str>,
        issued_after: Option<&str>,
    ) -> Result<Vec<AlertMetadata>> {
        let filter = build_filter(region, issued_after)?;
        self.metadata.search(&filter).await
    }
}

fn build_filter(region: Option<&str>, issued_after: Option<&str>) -> Result<MetadataFilter> {
    Ok(MetadataFilter {
        region: region.map(str::to_string),
        issued_after: parse_issued_after(issued_after)?,
    })
}

/// Parses an RFC 3339 timestamp. Anything else, including an empty string,
/// is a validation error.
pub fn parse_issued_after(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match raw {
        None => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(raw.trim())
            .map(|ts| Some(ts.with_timezone(&Utc)))
            .map_err(|e| {
                AlertGraphError::validation(format!("invalid issuedAfter '{}': {}", raw, e))
            }),
    }
}

/// Emits one detail per metadata entry, in metadata order. Returns the number
/// of entries that had no detail.
fn join(metadata: &[AlertMetadata], details: Vec<AlertDetail>) -> (Vec<AlertDetail>, usize) {
    let by_id: HashMap<String, AlertDetail> =
        details.into_iter().map(|d| (d.id.clone(), d)).collect();

    let mut omitted = 0;
    let mut alerts = Vec::with_capacity(by_id.len());
    for entry in metadata {
        match by_id.get(&entry.id) {
            Some(detail) => alerts.push(detail.clone()),
            None => {
                debug!(id = %entry.id, "No detail for metadata (omitting)");
                omitted += 1;
            }
        }
    }
    (alerts, omitted)
}
