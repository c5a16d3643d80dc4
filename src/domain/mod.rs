mod conversion_rate;
mod subscriber_email;

pub use conversion_rate::{BASE_CODE, ConversionRate, TARGET_CODE};
pub use subscriber_email::SubscriberEmail;
