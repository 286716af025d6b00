//! Users in PostgreSQL

use alertgraph_core::{AlertGraphError, Result, User};
use alertgraph_pg::{PgPool, Row};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use super::{store_err, UserRepository};

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &Row) -> std::result::Result<User, alertgraph_pg::PgError> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<User>> {
        let rows = self
            .pool
            .query(
                "SELECT id, name, email, created_at FROM users ORDER BY created_at DESC",
                &[],
            )
            .await
            .map_err(|e| store_err("failed to query users", e))?;

        let users = rows
            .iter()
            .map(user_from_row)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| store_err("failed to scan user", e))?;

        info!(count = users.len(), "Listed users");
        Ok(users)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> Result<User> {
        let row = self
            .pool
            .query_opt(
                "SELECT id, name, email, created_at FROM users WHERE id = $1",
                &[&id],
            )
            .await
            .map_err(|e| store_err("failed to query user", e))?;

        match row {
            Some(row) => user_from_row(&row).map_err(|e| store_err("failed to scan user", e)),
            None => {
                debug!("User not found");
                Err(AlertGraphError::not_found(format!("user not found: {}", id)))
            }
        }
    }
}
