//! Request data that needs to be validated, its parsing implementations and tests for those.

use axum::http::{header, HeaderMap};
use lazy_regex::regex_is_match;

// ###################################
// ->   STRUCTS
// ###################################
/// Validated subscriber email, already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ValidEmail {
    /// Trims the value and checks it has the `local@domain.tld` shape.
    /// Whitespace and extra `@` signs are rejected in every part.
    /// `\s` is Unicode `White_Space`, which leaves out U+FEFF unlike some other regex engines.
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref().trim();

        if value.is_empty() {
            return Err(DataParsingError::EmailMissing);
        }

        if regex_is_match!(r"^[^\s@]+@[^\s@]+\.[^\s@]+$", value) {
            Ok(ValidEmail(value.to_owned()))
        } else {
            Err(DataParsingError::EmailInvalid(value.to_owned()))
        }
    }
}

/// How the body of a subscribe request should be read, based on its `Content-Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    UrlEncoded,
    Multipart,
    Other,
}

impl BodyKind {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let content_type = header_lowercase(headers, header::CONTENT_TYPE);

        if content_type.contains("application/json") {
            BodyKind::Json
        } else if content_type.contains("application/x-www-form-urlencoded") {
            BodyKind::UrlEncoded
        } else if content_type.contains("multipart/form-data") {
            BodyKind::Multipart
        } else {
            BodyKind::Other
        }
    }
}

/// Whether the client asked for a JSON answer. Plain browser form posts don't.
pub fn accepts_json(headers: &HeaderMap) -> bool {
    header_lowercase(headers, header::ACCEPT).contains("application/json")
}

fn header_lowercase(headers: &HeaderMap, name: header::HeaderName) -> String {
    headers
        .get(name)
        .and_then(|val| val.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("email missing")]
    EmailMissing,
    #[error("email invalid: {0}")]
    EmailInvalid(String),
}
