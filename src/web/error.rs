use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use strum_macros::AsRefStr;

use crate::mailerlite_client;

use super::routes::SubscribeError;

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("subscribe error: {0}")]
    Subscribe(#[from] SubscribeError),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use mailerlite_client::Error as MlError;
        use ClientError::*;

        let Error::Subscribe(sub_er) = self;
        match sub_er {
            SubscribeError::InvalidMethod(_) => (StatusCode::METHOD_NOT_ALLOWED, MethodNotAllowed),
            SubscribeError::InvalidBody(_) => (StatusCode::BAD_REQUEST, InvalidBody),
            SubscribeError::InvalidEmail(_) => (StatusCode::BAD_REQUEST, InvalidEmail),
            SubscribeError::MailerLite(MlError::MissingApiKey | MlError::UrlParsing(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ServerConfiguration)
            }
            SubscribeError::MailerLite(MlError::Upstream { details, .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Upstream(details.clone()),
            ),
            SubscribeError::MailerLite(MlError::Transport(er)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ServiceError(er.to_string()),
            ),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<20} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// What the client gets to see about an error.
#[derive(Debug, AsRefStr)]
pub enum ClientError {
    MethodNotAllowed,
    InvalidBody,
    InvalidEmail,
    ServerConfiguration,
    /// Payload returned by MailerLite with a non-success status.
    Upstream(Value),
    /// Message of the transport or decoding error.
    ServiceError(String),
}

impl ClientError {
    pub fn message(&self) -> &'static str {
        match self {
            ClientError::MethodNotAllowed => "Method Not Allowed",
            ClientError::InvalidBody => "Invalid request body",
            ClientError::InvalidEmail => "Invalid or missing email",
            ClientError::ServerConfiguration => "Server configuration error",
            ClientError::Upstream(_) => "MailerLite error",
            ClientError::ServiceError(_) => "Server error",
        }
    }

    /// Builds the client facing response.
    /// `405` answers are plain text with an `Allow` header, everything else is JSON.
    pub fn into_response_with(self, status: StatusCode, req_id: &str) -> Response {
        let error = self.message();

        let body = match self {
            ClientError::MethodNotAllowed => {
                return (status, [(header::ALLOW, "POST")], error).into_response();
            }
            ClientError::Upstream(details) => {
                json!({ "error": error, "details": details, "req_id": req_id })
            }
            ClientError::ServiceError(message) => {
                json!({ "error": error, "message": message, "req_id": req_id })
            }
            _ => json!({ "error": error, "req_id": req_id }),
        };

        (status, Json(body)).into_response()
    }
}
