//! Sends the current conversion rate to every subscriber.

use crate::{
    domain::SubscriberEmail,
    email_client::EmailClient,
    rate_provider::{RateError, RateProvider},
    subscriber_store::{StoreError, SubscriberStore},
    utils::error_chain_fmt,
};

/// `Ok` only when subscribers existed, the rate was retrieved and every send succeeded.
pub type BroadcastOutcome = Result<BroadcastReport, BroadcastError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    Failed,
    /// The stored address does not parse, so no send was made.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub recipient: String,
    pub status: DeliveryStatus,
}

/// Per-recipient results of one broadcast, in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub deliveries: Vec<Delivery>,
}

impl BroadcastReport {
    pub fn recipients(&self) -> usize {
        self.deliveries.len()
    }

    /// Number of sends made, skipped recipients excluded.
    pub fn attempted(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|d| d.status != DeliveryStatus::Skipped)
            .count()
    }

    pub fn undelivered(&self) -> impl Iterator<Item = &Delivery> {
        self.deliveries
            .iter()
            .filter(|d| d.status != DeliveryStatus::Delivered)
    }

    pub fn all_delivered(&self) -> bool {
        self.deliveries
            .iter()
            .all(|d| d.status == DeliveryStatus::Delivered)
    }
}

#[derive(thiserror::Error)]
pub enum BroadcastError {
    #[error("there are no subscribers to notify")]
    NoSubscribers,
    #[error("failed to load subscribers")]
    LoadSubscribers(#[source] StoreError),
    #[error("the conversion rate could not be retrieved")]
    RateUnavailable(#[source] RateError),
    #[error(
        "{} of {} recipients were not notified ({} sends attempted)",
        .0.undelivered().count(),
        .0.recipients(),
        .0.attempted()
    )]
    DeliveryIncomplete(BroadcastReport),
}

impl std::fmt::Debug for BroadcastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Runs one broadcast.
///
/// Nothing is fetched or sent when the store is empty or unreadable, and
/// nothing is sent when the rate cannot be retrieved. Sends are sequential in
/// store order; a failed send is logged and recorded, and the remaining
/// recipients are still attempted.
#[tracing::instrument(name = "Broadcasting the conversion rate", skip_all)]
pub async fn broadcast_rate(
    store: &dyn SubscriberStore,
    rate_provider: &dyn RateProvider,
    email_client: &EmailClient,
) -> BroadcastOutcome {
    let subscribers = store
        .list_all()
        .await
        .map_err(BroadcastError::LoadSubscribers)?;
    if subscribers.is_empty() {
        return Err(BroadcastError::NoSubscribers);
    }

    let rate = rate_provider
        .fetch_rate()
        .await
        .map_err(BroadcastError::RateUnavailable)?;
    let subject = rate.subject();
    let html_body = rate.html_message();
    let text_body = rate.text_message();

    let mut report = BroadcastReport::default();
    for recipient in subscribers {
        let status = match SubscriberEmail::parse(recipient.clone()) {
            Ok(email) => match email_client
                .send_email(&email, &subject, &html_body, &text_body)
                .await
            {
                Ok(()) => DeliveryStatus::Delivered,
                Err(e) => {
                    tracing::error!(
                        error.cause_chain = ?e,
                        subscriber_email = %recipient,
                        "Failed to deliver the conversion rate"
                    );
                    DeliveryStatus::Failed
                }
            },
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Skipping a subscriber. Their stored contact details are invalid"
                );
                DeliveryStatus::Skipped
            }
        };
        report.deliveries.push(Delivery { recipient, status });
    }

    if report.all_delivered() {
        tracing::info!(recipients = report.recipients(), "Conversion rate delivered");
        Ok(report)
    } else {
        Err(BroadcastError::DeliveryIncomplete(report))
    }
}
