//! URL shortener service implementation.
//!
//! This crate wires a mapping store and an alias generator into the
//! `Shortener` contract. Core types are re-exported from `hashlink_core`.

pub mod service;

pub use hashlink_core::{CollisionPolicy, ShortenOutcome, Shortener, ShortenerError};
pub use service::{ShortenerService, ShortenerSettings, DEFAULT_BASE_URL};
