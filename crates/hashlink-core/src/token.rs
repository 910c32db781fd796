use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A short token standing in for a long URL.
///
/// Tokens are the last path segment of a short URL, so they must be
/// non-empty and must not contain `/`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortToken(String);

impl ShortToken {
    /// Creates a new `ShortToken` after validating the input.
    pub fn new(token: impl Into<String>) -> std::result::Result<Self, CoreError> {
        let token = token.into();
        Self::validate(&token)?;
        Ok(Self(token))
    }

    /// Creates a `ShortToken` without validation.
    ///
    /// Use this only for tokens produced by trusted internal sources
    /// (e.g. a digest generator that only emits hex characters).
    pub fn new_unchecked(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Embeds the token into `base_url`, the way every stored short URL is built.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Extracts the token from a short URL produced by [`ShortToken::to_url`].
    pub fn from_url(short_url: &str) -> std::result::Result<Self, CoreError> {
        let token = short_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();
        Self::new(token)
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters in the token.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn validate(token: &str) -> std::result::Result<(), CoreError> {
        if token.is_empty() {
            return Err(CoreError::InvalidShortToken(
                "token cannot be empty".to_string(),
            ));
        }

        if token.contains('/') {
            return Err(CoreError::InvalidShortToken(format!(
                "token must be a single path segment: '{}'",
                token
            )));
        }

        Ok(())
    }
}

impl Display for ShortToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ShortToken {
    type Error = CoreError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShortToken> for String {
    fn from(value: ShortToken) -> Self {
        value.0
    }
}
