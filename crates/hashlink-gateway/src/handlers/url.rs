use crate::error::{AppError, Result};
use crate::model::{DeleteUrlResponse, ShortenUrlResponse, UrlRequest};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

pub const EMPTY_URL: &str = "Empty URL";
pub const SHORT_URL_GENERATED: &str = "Short URL generated";
pub const KEY_ALREADY_EXISTS: &str = "Key already exists";
pub const SHORT_URL_NOT_FOUND: &str = "Short URL not found";
pub const URL_DELETED: &str = "URL successfully deleted";
pub const URL_NOT_FOUND: &str = "URL Not Found";

/// Reserved characters kept verbatim in a redirect target. Every other byte
/// outside the unreserved set is percent-encoded.
const LOCATION_SAFE: &str = ":/%#?=@[]!$&'()*+,;";

/// `POST /shorten_url/`: 200 for a new mapping, 302 with the same body when
/// the URL was already shortened.
pub async fn shorten_url_handler(
    State(state): State<AppState>,
    Json(request): Json<UrlRequest>,
) -> Result<Response> {
    let outcome = state
        .shortener()
        .shorten(&request.url)
        .await
        .map_err(|e| AppError::from(e).with_detail(EMPTY_URL))?;

    let (status, message) = if outcome.created {
        (StatusCode::OK, SHORT_URL_GENERATED)
    } else {
        (StatusCode::FOUND, KEY_ALREADY_EXISTS)
    };

    let body = ShortenUrlResponse {
        original_url: outcome.mapping.original_url,
        shortened_url: outcome.mapping.short_url,
        message,
    };
    Ok((status, Json(body)).into_response())
}

/// `GET /{short_token}/`: temporary redirect to the original URL.
pub async fn redirect_handler(
    Path(short_token): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let original_url = state
        .shortener()
        .resolve(&short_token)
        .await
        .map_err(|e| AppError::from(e).with_detail(SHORT_URL_NOT_FOUND))?;

    let location = HeaderValue::try_from(encode_location(&original_url)).map_err(|e| {
        AppError::Internal(format!("stored url is not a valid location header: {e}"))
    })?;

    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response())
}

/// `DELETE /delete_url/`: removes every mapping whose original or short URL
/// equals `url`.
pub async fn delete_url_handler(
    State(state): State<AppState>,
    Json(request): Json<UrlRequest>,
) -> Result<Json<DeleteUrlResponse>> {
    state
        .shortener()
        .delete(&request.url)
        .await
        .map_err(|e| AppError::from(e).with_detail(URL_NOT_FOUND))?;

    Ok(Json(DeleteUrlResponse {
        message: URL_DELETED,
    }))
}

/// Percent-encodes a stored URL so it is always a valid `Location` value.
fn encode_location(url: &str) -> String {
    let mut encoded = String::with_capacity(url.len());
    let mut buf = [0u8; 4];
    for c in url.chars() {
        if LOCATION_SAFE.contains(c) {
            encoded.push(c);
        } else {
            encoded.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    encoded
}
