pub mod broadcast;
pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod rate_provider;
pub mod registration;
pub mod routes;
pub mod startup;
pub mod subscriber_store;
pub mod telemetry;
pub mod utils;
