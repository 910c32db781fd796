//! Core types and traits for the hashlink URL shortener.
//!
//! This crate provides the types shared by the alias generator, the
//! mapping stores, the shortener service and the HTTP gateway.

pub mod error;
pub mod repository;
pub mod shortener;
pub mod token;

pub use error::{CoreError, ShortenerError, StorageError};
pub use repository::{InsertOutcome, Mapping, ReadRepository, Repository, ShortCollision};
pub use shortener::{CollisionPolicy, ShortenOutcome, Shortener};
pub use token::ShortToken;
