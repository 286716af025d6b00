//! Seeds PostgreSQL and Firestore with sample data
//!
//! Usage: `seed [users|messages|weather-alerts|all]` (default `all`)

use alertgraph_docstore::value::{encode_fields, timestamp_value};
use alertgraph_docstore::{DocStoreClient, DocStoreConfig};
use alertgraph_pg::{PgPool, PoolConfig};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, ValueEnum};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

const SCHEMA: &str = include_str!("../../migrations/001_init.sql");

/// Command-line arguments for the seeder
#[derive(Parser, Debug)]
#[command(name = "seed")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Seed PostgreSQL and Firestore with sample users, messages and weather alerts")]
struct SeedArgs {
    /// Which data set to write
    #[arg(value_enum, default_value_t = Target::All)]
    target: Target,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Users,
    Messages,
    WeatherAlerts,
    All,
}

impl Target {
    fn includes(self, other: Target) -> bool {
        self == Target::All || self == other
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = alertgraph_telemetry::init("seed")?;

    let target = SeedArgs::parse().target;
    let now = Utc::now();

    if target.includes(Target::Users) || target.includes(Target::WeatherAlerts) {
        let pool = PgPool::new(PoolConfig::from_env())
            .await
            .context("failed to create PostgreSQL pool")?;
        pool.batch_execute(SCHEMA)
            .await
            .context("failed to create relational schema")?;

        if target.includes(Target::Users) {
            seed_users(&pool, now).await?;
        }
        if target.includes(Target::WeatherAlerts) {
            seed_alert_metadata(&pool, now).await?;
        }
    }

    if target.includes(Target::Messages) || target.includes(Target::WeatherAlerts) {
        let docstore = DocStoreClient::new(&DocStoreConfig::from_env())
            .context("failed to create Firestore client")?;

        if target.includes(Target::Messages) {
            seed_messages(&docstore, now).await?;
        }
        if target.includes(Target::WeatherAlerts) {
            seed_alert_details(&docstore).await?;
        }
    }

    info!(?target, "Seeding completed");
    Ok(())
}

async fn seed_users(pool: &PgPool, now: DateTime<Utc>) -> Result<()> {
    let users = [
        ("user1", "Alice Smith", "alice@example.com", now - Duration::hours(48)),
        ("user2", "Bob Johnson", "bob@example.com", now - Duration::hours(24)),
        ("user3", "Charlie Brown", "charlie@example.com", now - Duration::hours(12)),
        ("user4", "Diana Prince", "diana@example.com", now - Duration::hours(6)),
        ("user5", "Eve Adams", "eve@example.com", now),
    ];

    for (id, name, email, created_at) in &users {
        pool.execute(
            "INSERT INTO users (id, name, email, created_at) VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE
             SET name = EXCLUDED.name, email = EXCLUDED.email, created_at = EXCLUDED.created_at",
            &[id, name, email, created_at],
        )
        .await
        .with_context(|| format!("failed to insert user {}", id))?;
        info!(%id, %email, "Seeded user");
    }

    info!(count = users.len(), "Seeded users");
    Ok(())
}

async fn seed_messages(docstore: &DocStoreClient, now: DateTime<Utc>) -> Result<()> {
    let messages = [
        ("msg1", "Hello, Firestore! This is the first message.", "Alice", now - Duration::hours(2)),
        ("msg2", "GraphQL and Firestore integration is working!", "Bob", now - Duration::hours(1)),
        ("msg3", "Docker Compose makes local development easy.", "Charlie", now),
    ];

    for (id, content, author, created_at) in &messages {
        let mut fields = encode_fields(
            json!({ "id": id, "content": content, "author": author })
                .as_object()
                .context("message fields")?,
        );
        fields.insert("createdAt".to_string(), timestamp_value(created_at));

        docstore
            .set("messages", id, fields)
            .await
            .with_context(|| format!("failed to create message {}", id))?;
        info!(%id, "Seeded message");
    }

    info!(count = messages.len(), "Seeded messages");
    Ok(())
}

/// (id, region, severity, hours before now)
const ALERT_METADATA: [(&str, &str, &str, i64); 10] = [
    ("alert-tokyo-001", "Tokyo", "warning", 48),
    ("alert-tokyo-002", "Tokyo", "info", 24),
    ("alert-tokyo-003", "Tokyo", "critical", 12),
    ("alert-osaka-001", "Osaka", "warning", 36),
    ("alert-osaka-002", "Osaka", "info", 18),
    ("alert-osaka-003", "Osaka", "critical", 6),
    ("alert-kyoto-001", "Kyoto", "warning", 30),
    ("alert-kyoto-002", "Kyoto", "info", 15),
    ("alert-kyoto-003", "Kyoto", "warning", 3),
    ("alert-kyoto-004", "Kyoto", "critical", 1),
];

async fn seed_alert_metadata(pool: &PgPool, now: DateTime<Utc>) -> Result<()> {
    let mut seeded = 0;
    for (id, region, severity, hours) in ALERT_METADATA {
        let issued_at = now - Duration::hours(hours);
        let result = pool
            .execute(
                "INSERT INTO weather_alert_metadata (id, region, severity, issued_at, created_at)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (id) DO UPDATE
                 SET region = EXCLUDED.region, severity = EXCLUDED.severity,
                     issued_at = EXCLUDED.issued_at, created_at = EXCLUDED.created_at",
                &[&id, &region, &severity, &issued_at, &issued_at],
            )
            .await;

        match result {
            Ok(_) => {
                seeded += 1;
                info!(%id, "Inserted metadata");
            }
            Err(e) => warn!(%id, error = %e, "Failed to insert metadata"),
        }
    }

    if seeded == 0 {
        bail!("no weather alert metadata could be inserted");
    }
    info!(count = seeded, "Seeded weather alert metadata");
    Ok(())
}

fn reading(value: f64, unit: &str) -> Value {
    json!({ "value": value, "unit": unit })
}

/// (temperature °C, wind m/s, precipitation mm, pressure hPa)
fn raw_data(temperature: f64, wind: f64, precipitation: i64, pressure: f64) -> Value {
    json!({
        "temperature": reading(temperature, "celsius"),
        "windSpeed": reading(wind, "m/s"),
        "precipitation": { "value": precipitation, "unit": "mm" },
        "pressure": reading(pressure, "hPa"),
    })
}

fn alert_details() -> Vec<Value> {
    let alert = |id: &str,
                 title: &str,
                 description: &str,
                 raw: Value,
                 areas: &[&str],
                 recommendations: &[&str]| {
        json!({
            "id": id,
            "title": title,
            "description": description,
            "rawData": raw,
            "affectedAreas": areas,
            "recommendations": recommendations,
        })
    };

    vec![
        alert(
            "alert-tokyo-001",
            "Strong Wind Warning",
            "Strong winds expected in Tokyo area",
            raw_data(15.2, 25.5, 0, 1013.2),
            &["Chiyoda", "Minato", "Shibuya"],
            &["Stay indoors", "Secure loose objects"],
        ),
        alert(
            "alert-tokyo-002",
            "Clear Weather Information",
            "Clear weather expected for the next 24 hours",
            raw_data(22.5, 5.2, 0, 1015.8),
            &["All areas"],
            &["Good day for outdoor activities"],
        ),
        alert(
            "alert-tokyo-003",
            "Severe Thunderstorm Critical Alert",
            "Severe thunderstorm with heavy rainfall imminent",
            raw_data(18.0, 35.0, 80, 995.5),
            &["All areas"],
            &["Seek shelter immediately", "Avoid travel"],
        ),
        alert(
            "alert-osaka-001",
            "Heavy Rain Warning",
            "Heavy rainfall expected in Osaka region",
            raw_data(19.5, 15.0, 50, 1008.0),
            &["Kita", "Chuo", "Naniwa"],
            &["Carry umbrella", "Watch for flooding"],
        ),
        alert(
            "alert-osaka-002",
            "Mild Weather Information",
            "Mild weather conditions throughout the day",
            raw_data(20.0, 8.0, 0, 1012.5),
            &["All areas"],
            &["Enjoy your day"],
        ),
        alert(
            "alert-osaka-003",
            "Typhoon Critical Alert",
            "Typhoon approaching Osaka bay area",
            raw_data(16.5, 45.0, 120, 985.0),
            &["All areas"],
            &["Evacuate if instructed", "Stock emergency supplies"],
        ),
        alert(
            "alert-kyoto-001",
            "Fog Warning",
            "Dense fog reducing visibility",
            raw_data(12.0, 3.0, 0, 1016.0),
            &["Northern districts"],
            &["Drive carefully", "Use fog lights"],
        ),
        alert(
            "alert-kyoto-002",
            "Pleasant Weather Information",
            "Pleasant spring weather expected",
            raw_data(18.5, 6.5, 0, 1014.2),
            &["All areas"],
            &["Perfect for sightseeing"],
        ),
        alert(
            "alert-kyoto-003",
            "Thunderstorm Warning",
            "Isolated thunderstorms possible in the evening",
            raw_data(21.0, 12.0, 25, 1010.5),
            &["Eastern districts"],
            &["Postpone outdoor activities", "Stay informed"],
        ),
        alert(
            "alert-kyoto-004",
            "Flash Flood Critical Alert",
            "Flash flood warning due to heavy upstream rainfall",
            raw_data(17.5, 18.0, 95, 1002.0),
            &["Riverside areas"],
            &["Move to higher ground", "Avoid riverbanks"],
        ),
    ]
}

/// Individual failures are logged and skipped; writing none at all is an error.
async fn seed_alert_details(docstore: &DocStoreClient) -> Result<()> {
    let mut seeded = 0;
    for alert in alert_details() {
        let Some(fields) = alert.as_object() else {
            continue;
        };
        let id = fields
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let encoded: Map<String, Value> = encode_fields(fields);
        match docstore.set("weatherAlerts", &id, encoded).await {
            Ok(()) => {
                seeded += 1;
                info!(%id, "Inserted alert detail");
            }
            Err(e) => warn!(%id, error = %e, "Failed to insert alert detail"),
        }
    }

    if seeded == 0 {
        bail!("no weather alert details could be written");
    }
    info!(count = seeded, "Seeded weather alert details");
    Ok(())
}
