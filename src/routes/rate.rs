use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::rate_provider::RateProvider;

#[derive(Debug, Serialize)]
struct RateBody {
    number: f64,
}

/// Proxies the rate provider. A failed lookup answers 400 with a zero rate.
#[tracing::instrument(name = "Get current conversion rate", skip(rate_provider))]
pub async fn get_rate(rate_provider: web::Data<dyn RateProvider>) -> HttpResponse {
    match rate_provider.fetch_rate().await {
        Ok(rate) => HttpResponse::Ok().json(RateBody { number: rate.rate }),
        Err(e) => {
            tracing::warn!(error.cause_chain = ?e, "Failed to retrieve the conversion rate");
            HttpResponse::BadRequest().json(RateBody { number: 0.0 })
        }
    }
}
