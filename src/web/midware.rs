use std::sync::Arc;

use axum::{
    http::{HeaderMap, HeaderValue, Method, Uri},
    response::Response,
};
use tracing::{error, warn};
use uuid::Uuid;

use crate::web::{log, Error, REQUEST_ID_HEADER};

/// Maps a `web::Error` stashed in the response extensions to the response the client gets to see.
/// Responses without an error pass through untouched.
/// Rebuilt error responses get the request id header back.
pub async fn response_mapper(
    req_method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    resp: Response,
) -> Response {
    let req_id = req_headers
        .get(REQUEST_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .map(ToString::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let web_error = resp.extensions().get::<Arc<Error>>().cloned();
    let client_status_and_error = web_error
        .as_deref()
        .map(Error::status_code_and_client_error);

    if let (Some(web_error), Some((status, _))) = (&web_error, &client_status_and_error) {
        if status.is_server_error() {
            error!("SERVER ERROR: {web_error:?} ID: {req_id}");
        } else {
            warn!("CLIENT ERROR: {web_error} ID: {req_id}");
        }
    }

    log::log_request(
        &req_id,
        &req_method,
        &uri,
        client_status_and_error
            .as_ref()
            .map_or(resp.status(), |(status, _)| *status),
        web_error.as_deref(),
        client_status_and_error.as_ref().map(|(_, ce)| ce),
    );

    match client_status_and_error {
        Some((status, client_error)) => {
            let mut resp = client_error.into_response_with(status, &req_id);
            if let Ok(val) = HeaderValue::from_str(&req_id) {
                resp.headers_mut().insert(REQUEST_ID_HEADER, val);
            }
            resp
        }
        None => resp,
    }
}
