//! Persistence of subscriber addresses.
//!
//! The store is the only place where uniqueness is enforced: callers check
//! [`SubscriberStore::exists`] first, but two concurrent registrations can both
//! pass that check, so [`SubscriberStore::insert`] must reject the second one
//! with [`StoreError::AlreadyExists`].

mod in_memory;
mod postgres;

pub use in_memory::InMemorySubscriberStore;
pub use postgres::PgSubscriberStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{domain::SubscriberEmail, utils::error_chain_fmt};

#[async_trait]
pub trait SubscriberStore: Send + Sync {
    async fn exists(&self, email: &SubscriberEmail) -> Result<bool, StoreError>;

    async fn insert(
        &self,
        email: &SubscriberEmail,
        subscribed_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Every stored address, in insertion order.
    async fn list_all(&self) -> Result<Vec<String>, StoreError>;
}

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("the email address is already stored")]
    AlreadyExists,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
