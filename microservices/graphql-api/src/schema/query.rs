//! Root query type

use async_graphql::{Context, Object, Result, ID};

use super::types::{MessageGql, UserGql, WeatherAlertGql, WeatherAlertMetadataGql};
use super::{gql_error, AppContext};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn hello(&self) -> String {
        "Hello World".to_string()
    }

    /// All users, newest first
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<UserGql>> {
        let app = ctx.data::<AppContext>()?;
        let users = app.users.list().await.map_err(gql_error)?;
        Ok(users.into_iter().map(UserGql::from).collect())
    }

    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<UserGql> {
        let app = ctx.data::<AppContext>()?;
        let user = app.users.get_by_id(&id).await.map_err(gql_error)?;
        Ok(user.into())
    }

    /// All messages, newest first
    async fn messages(&self, ctx: &Context<'_>) -> Result<Vec<MessageGql>> {
        let app = ctx.data::<AppContext>()?;
        let messages = app.messages.list().await.map_err(gql_error)?;
        Ok(messages.into_iter().map(MessageGql::from).collect())
    }

    async fn message(&self, ctx: &Context<'_>, id: ID) -> Result<MessageGql> {
        let app = ctx.data::<AppContext>()?;
        let message = app.messages.get_by_id(&id).await.map_err(gql_error)?;
        Ok(message.into())
    }

    /// Alert details for metadata matching the filter, newest issue first.
    /// `issuedAfter` is an inclusive RFC 3339 bound.
    async fn weather_alerts(
        &self,
        ctx: &Context<'_>,
        region: Option<String>,
        issued_after: Option<String>,
    ) -> Result<Vec<WeatherAlertGql>> {
        let app = ctx.data::<AppContext>()?;
        let alerts = app
            .weather_alerts
            .weather_alerts(region.as_deref(), issued_after.as_deref())
            .await
            .map_err(gql_error)?;
        Ok(alerts.into_iter().map(WeatherAlertGql::from).collect())
    }

    async fn weather_alert(&self, ctx: &Context<'_>, id: ID) -> Result<WeatherAlertGql> {
        let app = ctx.data::<AppContext>()?;
        let alert = app.weather_alerts.alert(&id).await.map_err(gql_error)?;
        Ok(alert.into())
    }

    async fn weather_alert_metadata(
        &self,
        ctx: &Context<'_>,
        region: Option<String>,
        issued_after: Option<String>,
    ) -> Result<Vec<WeatherAlertMetadataGql>> {
        let app = ctx.data::<AppContext>()?;
        let metadata = app
            .weather_alerts
            .metadata(region.as_deref(), issued_after.as_deref())
            .await
            .map_err(gql_error)?;
        Ok(metadata
            .into_iter()
            .map(WeatherAlertMetadataGql::from)
            .collect())
    }
}
