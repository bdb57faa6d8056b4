//! Field validation shared by the write paths. Every violation is collected so
//! a request reports all of its problems at once.

use crate::error::ApiError;

#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn check(&mut self, ok: bool, message: &str) {
        if !ok {
            self.add(message);
        }
    }

    /// Required text: present and not blank
    pub fn require<'a>(&mut self, value: Option<&'a str>, message: &str) -> Option<&'a str> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => Some(v),
            None => {
                self.add(message);
                None
            }
        }
    }

    pub fn max_len(&mut self, value: Option<&str>, max: usize, message: &str) {
        if let Some(v) = value {
            self.check(v.chars().count() <= max, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(self.0))
        }
    }
}

/// `local@domain.tld` with word characters, `.` and `-` in both parts and a
/// 2-3 letter final label.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let word_chars = |s: &str| {
        !s.is_empty()
            && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-')
            && !s.starts_with(['.', '-'])
            && !s.ends_with(['.', '-'])
    };
    if !word_chars(local) || !word_chars(domain) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((head, tld)) => {
            !head.is_empty() && (2..=3).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}

/// Absolute http(s) URL whose host has at least one dot
pub fn is_valid_website(website: &str) -> bool {
    match url::Url::parse(website) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().map(|h| h.contains('.')).unwrap_or(false)
        }
        Err(_) => false,
    }
}
