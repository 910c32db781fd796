pub mod digest;
pub mod error;

pub use digest::{DigestGenerator, DigestGeneratorSettings, HashAlgorithm};
pub use error::GeneratorError;

use hashlink_core::ShortToken;

/// Trait for deriving short tokens from original URLs.
///
/// Implementations are pure: they never touch storage, and the same URL
/// always yields the same token.
pub trait Generator: Send + Sync + 'static {
    /// Derives the token for `original_url`.
    fn generate(&self, original_url: &str) -> ShortToken;

    /// Derives a token one character longer than `token` for the same URL.
    ///
    /// Returns `None` once the underlying material is exhausted.
    fn lengthen(&self, original_url: &str, token: &ShortToken) -> Option<ShortToken>;
}
