use chrono::{DateTime, Utc};

pub const BASE_CODE: &str = "USD";
pub const TARGET_CODE: &str = "UAH";

/// A USD to UAH quote, fetched fresh for every broadcast and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRate {
    pub base_code: String,
    pub target_code: String,
    pub rate: f64,
    pub retrieved_at: DateTime<Utc>,
}

impl ConversionRate {
    pub fn new(rate: f64) -> Self {
        Self {
            base_code: BASE_CODE.to_string(),
            target_code: TARGET_CODE.to_string(),
            rate,
            retrieved_at: Utc::now(),
        }
    }

    pub fn subject(&self) -> String {
        format!("{} to {} exchange rate", self.base_code, self.target_code)
    }

    /// Plain text notification body. The rate is always printed with six decimals.
    pub fn text_message(&self) -> String {
        format!(
            "Hello. Current {} to {} exchange rate: {:.6}",
            self.base_code, self.target_code, self.rate
        )
    }

    pub fn html_message(&self) -> String {
        format!("<p>{}</p>", self.text_message())
    }
}
