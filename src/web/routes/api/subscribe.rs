use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{info, Span};

use crate::{
    mailerlite_client,
    web::{
        types::{self, BodyKind, DataParsingError, ValidEmail},
        WebResult, THANK_YOU_PATH,
    },
    AppState,
};

/// Largest request body we are willing to buffer.
const MAX_BODY_BYTES: usize = 64 * 1024;

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum SubscribeError {
    #[error("method not allowed: {0}")]
    InvalidMethod(Method),
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] DataParsingError),

    #[error("mailerlite client error: {0}")]
    MailerLite(#[from] mailerlite_client::Error),
}

// ###################################
// ->   API
// ###################################
#[tracing::instrument(
    name = "Forwarding a new subscriber to MailerLite",
    skip_all,
    fields(
        body_kind = tracing::field::Empty,
        accepts_json = tracing::field::Empty,
        subscriber_email = tracing::field::Empty
    )
)]
pub async fn subscribe(State(app_state): State<AppState>, req: Request) -> WebResult<Response> {
    let body_kind = BodyKind::from_headers(req.headers());
    let accepts_json = types::accepts_json(req.headers());
    let span = Span::current();
    span.record("body_kind", tracing::field::debug(&body_kind));
    span.record("accepts_json", accepts_json);

    let email = read_email(&app_state, body_kind, req).await?;
    let email = ValidEmail::parse(email.unwrap_or_default()).map_err(SubscribeError::from)?;
    span.record("subscriber_email", email.as_ref());

    let payload = app_state
        .mailerlite_client
        .create_subscriber(&email)
        .await
        .map_err(SubscribeError::from)?;
    info!("SUCCESS");

    if accepts_json {
        let body = json!({ "success": true, "mailerlite": payload });
        Ok((StatusCode::OK, Json(body)).into_response())
    } else {
        Ok((StatusCode::FOUND, [(header::LOCATION, THANK_YOU_PATH)]).into_response())
    }
}

/// Fallback for every method other than POST on the subscribe route.
pub async fn subscribe_method_not_allowed(method: Method) -> WebResult<()> {
    Err(SubscribeError::InvalidMethod(method).into())
}

// ###################################
// ->   HELPERS
// ###################################

/// Pulls the raw `email` value out of the body according to its declared content type.
/// `Ok(None)` means the body was readable but carried no email.
async fn read_email(
    app_state: &AppState,
    body_kind: BodyKind,
    req: Request,
) -> Result<Option<String>, SubscribeError> {
    match body_kind {
        BodyKind::Multipart => {
            let multipart = Multipart::from_request(req, app_state)
                .await
                .map_err(|er| SubscribeError::InvalidBody(er.to_string()))?;
            email_from_multipart(multipart).await
        }
        BodyKind::Json => email_from_json(&read_body(req).await?),
        BodyKind::UrlEncoded => email_from_form(&read_body(req).await?),
        // Best effort: an undeclared body may still be JSON or a form.
        BodyKind::Other => {
            let body = read_body(req).await?;
            Ok(email_from_json(&body)
                .ok()
                .flatten()
                .or_else(|| email_from_form(&body).ok().flatten()))
        }
    }
}

/// Buffers at most `MAX_BODY_BYTES`, anything larger is an invalid body.
async fn read_body(req: Request) -> Result<Bytes, SubscribeError> {
    axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|er| SubscribeError::InvalidBody(er.to_string()))
}

/// An empty body counts as `{}`. A non-string `email` counts as missing.
fn email_from_json(body: &[u8]) -> Result<Option<String>, SubscribeError> {
    if body.is_empty() {
        return Ok(None);
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|er| SubscribeError::InvalidBody(er.to_string()))?;

    Ok(value
        .get("email")
        .and_then(Value::as_str)
        .map(ToString::to_string))
}

/// The first `email` key wins.
fn email_from_form(body: &[u8]) -> Result<Option<String>, SubscribeError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
        .map_err(|er| SubscribeError::InvalidBody(er.to_string()))?;

    Ok(pairs
        .into_iter()
        .find(|(key, _)| key == "email")
        .map(|(_, value)| value))
}

async fn email_from_multipart(mut multipart: Multipart) -> Result<Option<String>, SubscribeError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|er| SubscribeError::InvalidBody(er.to_string()))?
    {
        if field.name() == Some("email") {
            let email = field
                .text()
                .await
                .map_err(|er| SubscribeError::InvalidBody(er.to_string()))?;
            return Ok(Some(email));
        }
    }

    Ok(None)
}
