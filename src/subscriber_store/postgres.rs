use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{StoreError, SubscriberStore};
use crate::domain::SubscriberEmail;

/// Postgres-backed store. Relies on the `UNIQUE` constraint on
/// `subscriptions.email` to settle concurrent inserts.
#[derive(Clone)]
pub struct PgSubscriberStore {
    pool: PgPool,
}

impl PgSubscriberStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriberStore for PgSubscriberStore {
    #[tracing::instrument(name = "Check whether subscriber exists", skip(self))]
    async fn exists(&self, email: &SubscriberEmail) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM subscriptions WHERE email = $1)"#)
                .bind(email.as_ref())
                .fetch_one(&self.pool)
                .await
                .context("Failed to check whether the subscriber exists.")?;
        Ok(exists)
    }

    #[tracing::instrument(name = "Saving new subscriber in the database", skip(self))]
    async fn insert(
        &self,
        email: &SubscriberEmail,
        subscribed_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO subscriptions (id, email, subscribed_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email.as_ref())
        .bind(subscribed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_error) if db_error.is_unique_violation() => {
                StoreError::AlreadyExists
            }
            e => {
                tracing::error!("Failed to execute query: {:?}", e);
                StoreError::Unexpected(
                    anyhow::Error::new(e).context("Failed to insert a new subscriber."),
                )
            }
        })?;
        Ok(())
    }

    #[tracing::instrument(name = "Get all subscribers", skip(self))]
    async fn list_all(&self) -> Result<Vec<String>, StoreError> {
        let emails: Vec<String> =
            sqlx::query_scalar(r#"SELECT email FROM subscriptions ORDER BY subscribed_at"#)
                .fetch_all(&self.pool)
                .await
                .context("Failed to load subscribers.")?;
        Ok(emails)
    }
}
