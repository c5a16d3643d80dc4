use actix_web::{
    HttpResponse, ResponseError,
    http::StatusCode,
    web::{self},
};
use serde::Serialize;

use crate::{
    registration::{SubscribeError, register},
    subscriber_store::SubscriberStore,
};

#[derive(Debug, serde::Deserialize)]
pub struct FormData {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
struct Details {
    details: &'static str,
}

#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(form, store),
    fields(subscriber_email = %form.email)
)]
pub async fn subscribe(
    form: web::Form<FormData>,
    store: web::Data<dyn SubscriberStore>,
) -> Result<HttpResponse, SubscribeError> {
    register(store.get_ref(), form.0.email).await?;
    Ok(HttpResponse::Ok().json(Details {
        details: "email address added",
    }))
}

impl SubscribeError {
    fn details(&self) -> &'static str {
        match self {
            SubscribeError::ValidationError(_) => "invalid argument value",
            SubscribeError::AlreadySubscribed => "email address already added",
            SubscribeError::UnexpectedError(_) => "failed to add email address",
        }
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SubscribeError::AlreadySubscribed => StatusCode::CONFLICT,
            SubscribeError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(Details {
            details: self.details(),
        })
    }
}
