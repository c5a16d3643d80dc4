pub mod health_check;
pub mod notifications;
pub mod rate;
pub mod subscriptions;
