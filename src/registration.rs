use anyhow::Context;
use chrono::Utc;

use crate::{
    domain::SubscriberEmail,
    subscriber_store::{StoreError, SubscriberStore},
    utils::error_chain_fmt,
};

/// Result of a registration attempt: the stored address, or why it was not stored.
pub type RegistrationOutcome = Result<SubscriberEmail, SubscribeError>;

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error("the email address is already subscribed")]
    AlreadySubscribed,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<StoreError> for SubscribeError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AlreadyExists => SubscribeError::AlreadySubscribed,
            StoreError::Unexpected(e) => SubscribeError::UnexpectedError(e),
        }
    }
}

/// Validates `candidate` and stores it unless it is already subscribed.
///
/// The store is not touched for an invalid address. At most one insert is
/// attempted, and only after `exists` reported the address as absent. If a
/// concurrent registration wins the race between the two calls, the store's
/// uniqueness check surfaces it as [`SubscribeError::AlreadySubscribed`].
#[tracing::instrument(
    name = "Registering a new subscriber",
    skip(store, candidate),
    fields(subscriber_email = %candidate)
)]
pub async fn register(store: &dyn SubscriberStore, candidate: String) -> RegistrationOutcome {
    let email = SubscriberEmail::parse(candidate).map_err(SubscribeError::ValidationError)?;

    let exists = store
        .exists(&email)
        .await
        .context("Failed to check whether the subscriber is already stored.")?;
    if exists {
        return Err(SubscribeError::AlreadySubscribed);
    }

    store.insert(&email, Utc::now()).await?;
    Ok(email)
}
