use crate::error::StorageError;
use crate::token::ShortToken;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored mapping from an original URL to its short URL.
///
/// The field names are the on-disk record layout of the JSON file store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// The original URL that was shortened.
    pub original_url: String,
    /// The short token embedded in the configured base URL.
    pub short_url: String,
}

impl Mapping {
    pub fn new(original_url: impl Into<String>, short_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            short_url: short_url.into(),
        }
    }

    /// Returns the short token carried by `short_url`, if it has one.
    pub fn token(&self) -> Option<ShortToken> {
        ShortToken::from_url(&self.short_url).ok()
    }

    /// Whether `identifier` names either side of this mapping.
    pub fn matches(&self, identifier: &str) -> bool {
        self.original_url == identifier || self.short_url == identifier
    }
}

/// How [`Repository::insert_unique`] treats a record that already holds the
/// same short URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortCollision {
    /// Store the new record anyway; the short URL becomes ambiguous.
    Allow,
    /// Refuse the insert and report the holder.
    Reject,
}

/// Outcome of a transactional check-then-insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The mapping was appended. `shared_with` is the first record of a
    /// different original URL that already held the same short URL.
    Inserted { shared_with: Option<Mapping> },
    /// A record for the same original URL already exists; nothing was written.
    OriginalExists(Mapping),
    /// Another original URL holds the same short URL; nothing was written.
    ShortTaken(Mapping),
}

/// A read-only view of a mapping store.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Finds the mapping whose `original_url` equals `original_url` exactly.
    async fn find_by_original(&self, original_url: &str) -> Result<Option<Mapping>>;

    /// Finds the mapping whose `short_url` equals `short_url` exactly.
    ///
    /// When colliding records share the short URL, the first one in storage
    /// order is returned.
    async fn find_by_short(&self, short_url: &str) -> Result<Option<Mapping>>;
}

/// A mapping store. Every mutation is durable once the call returns.
#[async_trait]
pub trait Repository: ReadRepository {
    /// Appends a mapping without checking either key for uniqueness.
    async fn insert(&self, mapping: Mapping) -> Result<()>;

    /// Appends a mapping unless its original URL is already stored, or its
    /// short URL is taken and `collision` is [`ShortCollision::Reject`].
    ///
    /// The check and the insert happen under one write lock.
    async fn insert_unique(
        &self,
        mapping: Mapping,
        collision: ShortCollision,
    ) -> Result<InsertOutcome>;

    /// Removes every mapping whose original URL or short URL equals
    /// `identifier` and returns how many were removed.
    async fn remove_where(&self, identifier: &str) -> Result<usize>;
}

/// Decides what [`Repository::insert_unique`] does against `existing` records.
///
/// An `Inserted` result means the caller must append `candidate`. Shared by
/// the store implementations so the dedup rules stay identical.
pub fn check_unique<'a>(
    existing: impl IntoIterator<Item = &'a Mapping>,
    candidate: &Mapping,
    collision: ShortCollision,
) -> InsertOutcome {
    let mut taken = None;
    for record in existing {
        if record.original_url == candidate.original_url {
            return InsertOutcome::OriginalExists(record.clone());
        }
        if taken.is_none() && record.short_url == candidate.short_url {
            taken = Some(record.clone());
        }
    }

    match (collision, taken) {
        (ShortCollision::Reject, Some(holder)) => InsertOutcome::ShortTaken(holder),
        (_, shared_with) => InsertOutcome::Inserted { shared_with },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_either_side() {
        let mapping = Mapping::new("https://example.com/a", "http://localhost:8000/2dce0a4");
        assert!(mapping.matches("https://example.com/a"));
        assert!(mapping.matches("http://localhost:8000/2dce0a4"));
        assert!(!mapping.matches("2dce0a4"));
    }

    #[test]
    fn token_is_last_segment() {
        let mapping = Mapping::new("https://example.com/a", "http://localhost:8000/2dce0a4");
        assert_eq!(mapping.token().unwrap().as_str(), "2dce0a4");
    }

    #[test]
    fn check_unique_prefers_original_match() {
        let records = vec![
            Mapping::new("https://b.com", "http://s/abc"),
            Mapping::new("https://a.com", "http://s/xyz"),
        ];
        let candidate = Mapping::new("https://a.com", "http://s/abc");

        let outcome = check_unique(&records, &candidate, ShortCollision::Reject);
        assert_eq!(outcome, InsertOutcome::OriginalExists(records[1].clone()));
    }

    #[test]
    fn check_unique_short_collision() {
        let records = vec![Mapping::new("https://b.com", "http://s/abc")];
        let candidate = Mapping::new("https://a.com", "http://s/abc");

        assert_eq!(
            check_unique(&records, &candidate, ShortCollision::Reject),
            InsertOutcome::ShortTaken(records[0].clone())
        );
        assert_eq!(
            check_unique(&records, &candidate, ShortCollision::Allow),
            InsertOutcome::Inserted {
                shared_with: Some(records[0].clone())
            }
        );
    }

    #[test]
    fn check_unique_free() {
        let records = vec![Mapping::new("https://b.com", "http://s/abc")];
        let candidate = Mapping::new("https://a.com", "http://s/def");
        assert_eq!(
            check_unique(&records, &candidate, ShortCollision::Reject),
            InsertOutcome::Inserted { shared_with: None }
        );
    }
}
