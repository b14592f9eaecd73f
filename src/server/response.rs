//! Turns service results and errors into HTTP responses.

use axum::{
    Json,
    http::{
        HeaderName, StatusCode,
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use log::warn;
use serde_json::json;

use crate::clients::{entities::PreviewAudio, errors::Error};
use crate::service::PreviewClip;

pub const X_TRACK_TITLE: &str = "x-track-title";
pub const X_TRACK_ARTIST: &str = "x-track-artist";

// Every request may yield a different track, so nothing in between may keep a copy
pub const NO_STORE: &str = "no-store, private";

pub const PREVIEW_FAILED_MESSAGE: &str = "Failed to fetch MP3 preview data";
pub const NOT_FOUND_MESSAGE: &str = "no tracks found";

/// Audio body with track metadata carried in percent-encoded headers.
pub fn audio_response(clip: PreviewClip) -> Response {
    let headers = [
        (CONTENT_TYPE, clip.audio.content_type),
        (CACHE_CONTROL, NO_STORE.to_string()),
        (
            HeaderName::from_static(X_TRACK_TITLE),
            urlencoding::encode(&clip.title).into_owned(),
        ),
        (
            HeaderName::from_static(X_TRACK_ARTIST),
            urlencoding::encode(&clip.artist).into_owned(),
        ),
    ];
    (headers, clip.audio.bytes).into_response()
}

// Upstream search JSON is relayed as-is
pub fn search_response(body: String) -> Response {
    let headers = [
        (CONTENT_TYPE, "application/json"),
        (CACHE_CONTROL, NO_STORE),
    ];
    (headers, body).into_response()
}

pub fn proxy_response(audio: PreviewAudio) -> Response {
    let headers = [
        (CONTENT_TYPE, audio.content_type),
        (ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
        (CACHE_CONTROL, "no-cache".to_string()),
    ];
    (headers, audio.bytes).into_response()
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::ValidationError(_) => StatusCode::BAD_REQUEST,
            Error::NotFoundError | Error::SelectionExhaustedError => StatusCode::NOT_FOUND,
            Error::UpstreamError { .. } | Error::ParseError(_) | Error::PreviewError(_) => {
                StatusCode::BAD_GATEWAY
            }
            Error::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Error::PreviewError(_) => PREVIEW_FAILED_MESSAGE.to_string(),
            Error::NotFoundError | Error::SelectionExhaustedError => NOT_FOUND_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!("Request failed with {status}: {self}");
        }
        error_response(status, self.public_message())
    }
}
