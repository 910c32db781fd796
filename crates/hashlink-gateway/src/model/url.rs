use serde::{Deserialize, Serialize};

/// Body of both `POST /shorten_url/` and `DELETE /delete_url/`.
#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ShortenUrlResponse {
    pub original_url: String,
    pub shortened_url: String,
    #[serde(rename = "Message")]
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DeleteUrlResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}
