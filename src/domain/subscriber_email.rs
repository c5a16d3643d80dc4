use std::sync::LazyLock;

use regex::Regex;

// `\w` is ASCII-only here: word characters, hyphen and dot in the local part,
// one or more domain labels and a 2-4 character top-level label.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^[\w\-.]+@([\w\-]+\.)+[\w\-]{2,4}$").expect("email pattern is valid")
});

/// A subscriber address that passed format validation.
///
/// Comparison is exact and case-sensitive, so `A@test.com` and `a@test.com`
/// are distinct subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(s: String) -> Result<Self, String> {
        let is_empty_or_whitespace = s.trim().is_empty();

        if !is_empty_or_whitespace && EMAIL_PATTERN.is_match(&s) {
            Ok(Self(s))
        } else {
            Err(format!("{} is not a valid subscriber email.", s))
        }
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
