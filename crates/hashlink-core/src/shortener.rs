use crate::repository::Mapping;
use async_trait::async_trait;
use std::fmt::Display;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// What `shorten` does when a different URL already owns the generated token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Store the colliding mapping anyway. Resolving the shared token returns
    /// whichever record the store finds first.
    #[default]
    Ignore,
    /// Grow the token one digest character at a time until it is free.
    Lengthen,
}

impl Display for CollisionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollisionPolicy::Ignore => f.write_str("ignore"),
            CollisionPolicy::Lengthen => f.write_str("lengthen"),
        }
    }
}

/// Result of a `shorten` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenOutcome {
    pub mapping: Mapping,
    /// `false` when an existing mapping for the same URL was reused.
    pub created: bool,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates a mapping for `original_url`, or returns the existing one.
    async fn shorten(&self, original_url: &str) -> Result<ShortenOutcome>;

    /// Resolves a short token to the original URL.
    /// Fails with `NotFound` if no mapping carries the token.
    async fn resolve(&self, token: &str) -> Result<String>;

    /// Deletes every mapping whose original URL or short URL equals
    /// `identifier`. Fails with `NotFound` if nothing matched.
    async fn delete(&self, identifier: &str) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_policy_names() {
        assert_eq!(CollisionPolicy::default(), CollisionPolicy::Ignore);
        assert_eq!(CollisionPolicy::Ignore.to_string(), "ignore");
        assert_eq!(CollisionPolicy::Lengthen.to_string(), "lengthen");
    }
}
