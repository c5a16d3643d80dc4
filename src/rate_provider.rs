use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{
    domain::{BASE_CODE, ConversionRate, TARGET_CODE},
    utils::error_chain_fmt,
};

/// Source of the current USD to UAH rate.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rate(&self) -> Result<ConversionRate, RateError>;
}

#[derive(thiserror::Error)]
pub enum RateError {
    #[error("failed to reach the exchange rate service")]
    Request(#[from] reqwest::Error),
    #[error("the exchange rate service returned an unexpected payload")]
    Decode(#[source] serde_json::Error),
}

impl std::fmt::Debug for RateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Client for the `exchangerate-api.com` v6 pair endpoint.
pub struct ExchangeRateClient {
    http_client: Client,
    base_url: String,
    api_token: SecretString,
}

#[derive(Debug, Deserialize)]
struct PairResponse {
    base_code: String,
    target_code: String,
    conversion_rate: f64,
}

impl ExchangeRateClient {
    pub fn new(
        base_url: String,
        api_token: SecretString,
        timeout: std::time::Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http_client: Client::builder().timeout(timeout).build()?,
            base_url,
            api_token,
        })
    }
}

#[async_trait]
impl RateProvider for ExchangeRateClient {
    #[tracing::instrument(name = "Fetch current conversion rate", skip(self))]
    async fn fetch_rate(&self) -> Result<ConversionRate, RateError> {
        let url = format!(
            "{}/{}/pair/{}/{}",
            self.base_url,
            self.api_token.expose_secret(),
            BASE_CODE,
            TARGET_CODE
        );
        let body = self
            .http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        let pair: PairResponse = serde_json::from_slice(&body).map_err(RateError::Decode)?;

        Ok(ConversionRate {
            base_code: pair.base_code,
            target_code: pair.target_code,
            rate: pair.conversion_rate,
            retrieved_at: Utc::now(),
        })
    }
}
