mod health;
mod url;

pub use health::HealthResponse;
pub use url::{DeleteUrlResponse, ErrorResponse, ShortenUrlResponse, UrlRequest};
