use std::{net::TcpListener, sync::Arc};

use actix_web::{App, HttpServer, dev::Server, web};
use anyhow::Context;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing_actix_web::TracingLogger;

use crate::{
    configuration::{DatabaseSettings, Settings},
    email_client::EmailClient,
    rate_provider::{ExchangeRateClient, RateProvider},
    routes::{
        health_check::health_check, notifications::send_emails, rate::get_rate,
        subscriptions::subscribe,
    },
    subscriber_store::{PgSubscriberStore, SubscriberStore},
};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Builds the application on top of the Postgres subscriber store.
    pub async fn build(configuration: &Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&configuration.database);
        let store = Arc::new(PgSubscriberStore::new(connection_pool));
        Self::build_with_store(configuration, store).await
    }

    pub async fn build_with_store(
        configuration: &Settings,
        store: Arc<dyn SubscriberStore>,
    ) -> Result<Self, anyhow::Error> {
        let sender = configuration
            .email_client
            .sender()
            .map_err(|e| anyhow::anyhow!("Invalid sender email address: {}", e))?;
        let email_client = EmailClient::new(
            configuration.email_client.base_url.clone(),
            sender,
            configuration.email_client.authorization_token.clone(),
            configuration.email_client.timeout(),
        )
        .context("Failed to build the email client.")?;
        let rate_provider = ExchangeRateClient::new(
            configuration.rate_provider.base_url.clone(),
            configuration.rate_provider.api_token.clone(),
            configuration.rate_provider.timeout(),
        )
        .context("Failed to build the exchange rate client.")?;

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(listener, store, Arc::new(rate_provider), email_client)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(database_config: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(database_config.with_db())
}

pub fn run(
    listener: TcpListener,
    store: Arc<dyn SubscriberStore>,
    rate_provider: Arc<dyn RateProvider>,
    email_client: EmailClient,
) -> Result<Server, std::io::Error> {
    let store = web::Data::from(store);
    let rate_provider = web::Data::from(rate_provider);
    let email_client = web::Data::new(email_client);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/rate", web::get().to(get_rate))
            .route("/subscribe", web::post().to(subscribe))
            .route("/sendEmails", web::post().to(send_emails))
            .app_data(store.clone())
            .app_data(rate_provider.clone())
            .app_data(email_client.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
