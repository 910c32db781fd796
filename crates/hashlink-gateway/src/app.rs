use axum::http::Method;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{delete_url_handler, health_handler, redirect_handler, shorten_url_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/shorten_url/", post(shorten_url_handler))
            .route("/delete_url/", delete(delete_url_handler))
            .route("/{short_token}", get(redirect_handler))
            .route("/{short_token}/", get(redirect_handler))
            .layer(Self::cors())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Any origin and header; the methods the routes use plus PUT.
    fn cors() -> CorsLayer {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any)
    }
}
