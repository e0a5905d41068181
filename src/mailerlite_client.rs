use reqwest::{header, Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::web::types::ValidEmail;

/// Client for the MailerLite Connect API.
/// Cloning is cheap, the inner `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct MailerLiteClient {
    pub http_client: Client,
    pub base_url: reqwest::Url,
    api_key: Option<SecretString>,
}

impl MailerLiteClient {
    /// `base_url` points to the API root, e.g. `https://connect.mailerlite.com/api/`.
    /// A missing trailing slash is added so relative joins keep the last path segment.
    /// A blank `api_key` counts as no key at all.
    pub fn new<S: AsRef<str>>(base_url: S, api_key: Option<SecretString>) -> Result<Self> {
        let mut base_url = base_url.as_ref().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url =
            reqwest::Url::parse(&base_url).map_err(|e| Error::UrlParsing(e.to_string()))?;

        let http_client = Client::builder().build()?;
        let api_key = api_key.filter(|key| !key.expose_secret().trim().is_empty());

        Ok(MailerLiteClient {
            http_client,
            base_url,
            api_key,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Creates (or updates) a subscriber upstream and returns the decoded response payload.
    ///
    /// A single attempt is made. Nothing is sent when no API key is configured.
    pub async fn create_subscriber(&self, email: &ValidEmail) -> Result<Value> {
        let Some(api_key) = self.api_key.as_ref() else {
            error!("{:<20} - MAILERLITE_API_KEY missing", "create_subscriber");
            return Err(Error::MissingApiKey);
        };

        let url = self
            .base_url
            .join("subscribers")
            .map_err(|e| Error::UrlParsing(e.to_string()))?;

        let body = NewSubscriber {
            email: email.as_ref(),
        };

        let resp = self
            .http_client
            .post(url)
            .bearer_auth(api_key.expose_secret())
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let details: Value = resp.json().await?;

        if !status.is_success() {
            error!("{:<20} - MailerLite error: {status} {details}", "create_subscriber");
            return Err(Error::Upstream { status, details });
        }

        debug!("{:<20} - MailerLite accepted subscriber", "create_subscriber");
        Ok(details)
    }
}

#[derive(Serialize)]
struct NewSubscriber<'a> {
    email: &'a str,
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("url parsing error: {0}")]
    UrlParsing(String),
    #[error("MailerLite API key is not configured")]
    MissingApiKey,
    #[error("MailerLite responded with {status}: {details}")]
    Upstream { status: StatusCode, details: Value },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
