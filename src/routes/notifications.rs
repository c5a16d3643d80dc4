use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};

use crate::{
    broadcast::{BroadcastError, broadcast_rate},
    email_client::EmailClient,
    rate_provider::RateProvider,
    subscriber_store::SubscriberStore,
};

#[tracing::instrument(name = "Send the conversion rate to subscribers", skip_all)]
pub async fn send_emails(
    store: web::Data<dyn SubscriberStore>,
    rate_provider: web::Data<dyn RateProvider>,
    email_client: web::Data<EmailClient>,
) -> Result<HttpResponse, BroadcastError> {
    broadcast_rate(store.get_ref(), rate_provider.get_ref(), &email_client).await?;
    Ok(HttpResponse::Ok().finish())
}

// Callers only learn whether the whole broadcast succeeded.
impl ResponseError for BroadcastError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).finish()
    }
}
