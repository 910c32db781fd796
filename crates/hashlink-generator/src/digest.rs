use crate::error::GeneratorError;
use crate::Generator;
use hashlink_core::ShortToken;
use sha2::{Digest, Sha256, Sha384, Sha512, Sha512_256};
use std::fmt::Display;
use typed_builder::TypedBuilder;

pub const DEFAULT_TOKEN_LENGTH: usize = 7;

/// Digest algorithms a [`DigestGenerator`] can derive tokens from.
///
/// Only digests of at least 256 bits are offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha384,
    Sha512,
    Sha512_256,
}

impl HashAlgorithm {
    /// Lowercase hex digest of `input`.
    pub fn hex_digest(&self, input: &[u8]) -> String {
        match self {
            HashAlgorithm::Sha256 => format!("{:x}", Sha256::digest(input)),
            HashAlgorithm::Sha384 => format!("{:x}", Sha384::digest(input)),
            HashAlgorithm::Sha512 => format!("{:x}", Sha512::digest(input)),
            HashAlgorithm::Sha512_256 => format!("{:x}", Sha512_256::digest(input)),
        }
    }

    /// Number of hex characters in a digest, i.e. the longest possible token.
    pub fn hex_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 | HashAlgorithm::Sha512_256 => 64,
            HashAlgorithm::Sha384 => 96,
            HashAlgorithm::Sha512 => 128,
        }
    }
}

impl Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithm::Sha256 => f.write_str("sha256"),
            HashAlgorithm::Sha384 => f.write_str("sha384"),
            HashAlgorithm::Sha512 => f.write_str("sha512"),
            HashAlgorithm::Sha512_256 => f.write_str("sha512_256"),
        }
    }
}

/// Configures a [`DigestGenerator`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct DigestGeneratorSettings {
    /// Digest the token is cut from.
    #[builder(default)]
    pub algorithm: HashAlgorithm,
    /// Number of leading hex characters kept as the token.
    #[builder(default = DEFAULT_TOKEN_LENGTH)]
    pub token_length: usize,
}

impl Default for DigestGeneratorSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Derives tokens as a fixed-length prefix of the hex digest of the URL.
///
/// Two different URLs can share a prefix. Detecting that is left to the
/// caller, see [`Generator::lengthen`].
#[derive(Debug, Clone)]
pub struct DigestGenerator {
    algorithm: HashAlgorithm,
    token_length: usize,
}

impl DigestGenerator {
    pub fn new(settings: DigestGeneratorSettings) -> Result<Self, GeneratorError> {
        let max_length = settings.algorithm.hex_len();
        if settings.token_length == 0 || settings.token_length > max_length {
            return Err(GeneratorError::InvalidTokenLength {
                token_length: settings.token_length,
                max_length,
                algorithm: settings.algorithm,
            });
        }

        Ok(Self {
            algorithm: settings.algorithm,
            token_length: settings.token_length,
        })
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn token_length(&self) -> usize {
        self.token_length
    }

    fn prefix(&self, original_url: &str, length: usize) -> ShortToken {
        let mut digest = self.algorithm.hex_digest(original_url.as_bytes());
        digest.truncate(length);
        // hex digits only, always a valid single path segment
        ShortToken::new_unchecked(digest)
    }
}

impl Default for DigestGenerator {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            token_length: DEFAULT_TOKEN_LENGTH,
        }
    }
}

impl Generator for DigestGenerator {
    fn generate(&self, original_url: &str) -> ShortToken {
        self.prefix(original_url, self.token_length)
    }

    fn lengthen(&self, original_url: &str, token: &ShortToken) -> Option<ShortToken> {
        let next = token.len() + 1;
        if next > self.algorithm.hex_len() {
            return None;
        }
        Some(self.prefix(original_url, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(algorithm: HashAlgorithm, token_length: usize) -> DigestGenerator {
        DigestGenerator::new(
            DigestGeneratorSettings::builder()
                .algorithm(algorithm)
                .token_length(token_length)
                .build(),
        )
        .unwrap()
    }

    #[test]
    fn default_is_seven_chars_of_sha256() {
        let generator = DigestGenerator::default();
        let token = generator.generate("https://example.com/a");
        assert_eq!(token.as_str(), "2dce0a4");
    }

    #[test]
    fn same_input_same_token() {
        let generator = DigestGenerator::default();
        for url in ["https://example.com", "https://example.com/a?q=1", "ñ/ü"] {
            assert_eq!(generator.generate(url), generator.generate(url));
        }
    }

    #[test]
    fn different_inputs_differ() {
        let generator = DigestGenerator::default();
        assert_eq!(generator.generate("https://example.com/b").as_str(), "d7fe568");
        assert_ne!(
            generator.generate("https://example.com/a"),
            generator.generate("https://example.com/b")
        );
    }

    #[test]
    fn configured_algorithm_and_length() {
        let generator = generator(HashAlgorithm::Sha512, 10);
        assert_eq!(
            generator.generate("https://example.com/a").as_str(),
            "17d40d5003"
        );
    }

    #[test]
    fn token_is_lowercase_hex() {
        let generator = generator(HashAlgorithm::Sha384, 32);
        let token = generator.generate("https://example.com/a");
        assert_eq!(token.len(), 32);
        assert!(token
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn full_length_token_is_whole_digest() {
        let generator = generator(HashAlgorithm::Sha256, 64);
        assert_eq!(
            generator.generate("https://example.com/a").as_str(),
            "2dce0a4c50441bfccfa9caf4b58c3cba6e06c420505dd829f0436de1aa44baac"
        );
    }

    #[test]
    fn rejects_zero_length() {
        let err = DigestGenerator::new(DigestGeneratorSettings::builder().token_length(0).build())
            .unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidTokenLength { .. }));
    }

    #[test]
    fn rejects_length_beyond_digest() {
        let err = DigestGenerator::new(
            DigestGeneratorSettings::builder()
                .algorithm(HashAlgorithm::Sha256)
                .token_length(65)
                .build(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            GeneratorError::InvalidTokenLength {
                token_length: 65,
                max_length: 64,
                algorithm: HashAlgorithm::Sha256,
            }
        );
    }

    #[test]
    fn lengthen_extends_the_same_prefix() {
        let generator = DigestGenerator::default();
        let token = generator.generate("https://example.com/a");
        let longer = generator.lengthen("https://example.com/a", &token).unwrap();
        assert_eq!(longer.as_str(), "2dce0a4c");
    }

    #[test]
    fn lengthen_stops_at_digest_end() {
        let generator = generator(HashAlgorithm::Sha256, 63);
        let token = generator.generate("https://example.com/a");
        let full = generator.lengthen("https://example.com/a", &token).unwrap();
        assert_eq!(full.len(), 64);
        assert!(generator.lengthen("https://example.com/a", &full).is_none());
    }

    #[test]
    fn algorithm_names() {
        assert_eq!(HashAlgorithm::default().to_string(), "sha256");
        assert_eq!(HashAlgorithm::Sha384.to_string(), "sha384");
        assert_eq!(HashAlgorithm::Sha512_256.to_string(), "sha512_256");
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DigestGenerator>();
    }
}
