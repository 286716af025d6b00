//! GraphQL object types

use alertgraph_core::{AlertDetail, AlertMetadata, Message, Severity, User};
use async_graphql::{Enum, Json, SimpleObject, ID};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

fn rfc3339(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[derive(SimpleObject)]
#[graphql(name = "User")]
pub struct UserGql {
    pub id: ID,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserGql {
    fn from(user: User) -> Self {
        Self {
            id: ID(user.id),
            name: user.name,
            email: user.email,
            created_at: rfc3339(&user.created_at),
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "Message")]
pub struct MessageGql {
    pub id: ID,
    pub content: String,
    pub author: String,
    pub created_at: String,
}

impl From<Message> for MessageGql {
    fn from(message: Message) -> Self {
        Self {
            id: ID(message.id),
            content: message.content,
            author: message.author,
            created_at: rfc3339(&message.created_at),
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "WeatherAlert")]
pub struct WeatherAlertGql {
    pub id: ID,
    pub title: String,
    pub description: String,
    pub raw_data: Json<Map<String, Value>>,
    pub affected_areas: Vec<String>,
    pub recommendations: Vec<String>,
}

impl From<AlertDetail> for WeatherAlertGql {
    fn from(alert: AlertDetail) -> Self {
        Self {
            id: ID(alert.id),
            title: alert.title,
            description: alert.description,
            raw_data: Json(alert.raw_data),
            affected_areas: alert.affected_areas,
            recommendations: alert.recommendations,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, PartialEq, Eq)]
#[graphql(name = "Severity")]
pub enum SeverityGql {
    Info,
    Warning,
    Critical,
}

impl From<Severity> for SeverityGql {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Info => Self::Info,
            Severity::Warning => Self::Warning,
            Severity::Critical => Self::Critical,
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "WeatherAlertMetadata")]
pub struct WeatherAlertMetadataGql {
    pub id: ID,
    pub region: String,
    pub severity: SeverityGql,
    pub issued_at: String,
    pub created_at: String,
}

impl From<AlertMetadata> for WeatherAlertMetadataGql {
    fn from(metadata: AlertMetadata) -> Self {
        Self {
            id: ID(metadata.id),
            region: metadata.region,
            severity: metadata.severity.into(),
            issued_at: rfc3339(&metadata.issued_at),
            created_at: rfc3339(&metadata.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamps_render_as_utc_rfc3339() {
        let at = Utc.with_ymd_and_hms(2023, 10, 1, 12, 0, 0).unwrap();
        assert_eq!(rfc3339(&at), "2023-10-01T12:00:00Z");

        let gql = WeatherAlertMetadataGql::from(AlertMetadata {
            id: "alert1".to_string(),
            region: "Tokyo".to_string(),
            severity: Severity::Critical,
            issued_at: at,
            created_at: at,
        });
        assert_eq!(gql.issued_at, "2023-10-01T12:00:00Z");
        assert_eq!(gql.severity, SeverityGql::Critical);
    }
}
