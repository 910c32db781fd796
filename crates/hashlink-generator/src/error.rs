use crate::digest::HashAlgorithm;
use thiserror::Error;

/// Errors returned when configuring a generator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("invalid token length {token_length}; expected 1..={max_length} for {algorithm}")]
    InvalidTokenLength {
        token_length: usize,
        max_length: usize,
        algorithm: HashAlgorithm,
    },
}
