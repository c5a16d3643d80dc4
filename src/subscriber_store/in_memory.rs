use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{StoreError, SubscriberStore};
use crate::domain::SubscriberEmail;

/// Process-local store with the same uniqueness contract as the Postgres one.
#[derive(Clone, Default)]
pub struct InMemorySubscriberStore {
    subscribers: Arc<Mutex<Vec<(String, DateTime<Utc>)>>>,
}

impl InMemorySubscriberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds raw addresses without validation, as rows written by another
    /// process would appear.
    pub fn with_subscribers<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let now = Utc::now();
        let subscribers = emails.into_iter().map(|e| (e.into(), now)).collect();
        Self {
            subscribers: Arc::new(Mutex::new(subscribers)),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, DateTime<Utc>)>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SubscriberStore for InMemorySubscriberStore {
    async fn exists(&self, email: &SubscriberEmail) -> Result<bool, StoreError> {
        Ok(self.lock().iter().any(|(e, _)| e == email.as_ref()))
    }

    async fn insert(
        &self,
        email: &SubscriberEmail,
        subscribed_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut subscribers = self.lock();
        if subscribers.iter().any(|(e, _)| e == email.as_ref()) {
            return Err(StoreError::AlreadyExists);
        }
        subscribers.push((email.as_ref().to_owned(), subscribed_at));
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock().iter().map(|(e, _)| e.clone()).collect())
    }
}
