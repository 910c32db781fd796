use async_trait::async_trait;
use hashlink_core::repository::{
    check_unique, InsertOutcome, Mapping, ReadRepository, Repository, Result, ShortCollision,
};
use parking_lot::RwLock;

/// In-memory implementation of the Repository trait.
///
/// Records live in insertion order behind a single `RwLock`, so lookups by
/// either key and the check-then-insert of [`Repository::insert_unique`] see
/// one consistent snapshot. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    records: RwLock<Vec<Mapping>>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn find_by_original(&self, original_url: &str) -> Result<Option<Mapping>> {
        let records = self.records.read();
        Ok(records
            .iter()
            .find(|record| record.original_url == original_url)
            .cloned())
    }

    async fn find_by_short(&self, short_url: &str) -> Result<Option<Mapping>> {
        let records = self.records.read();
        Ok(records
            .iter()
            .find(|record| record.short_url == short_url)
            .cloned())
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, mapping: Mapping) -> Result<()> {
        self.records.write().push(mapping);
        Ok(())
    }

    async fn insert_unique(
        &self,
        mapping: Mapping,
        collision: ShortCollision,
    ) -> Result<InsertOutcome> {
        let mut records = self.records.write();
        let outcome = check_unique(records.iter(), &mapping, collision);
        if let InsertOutcome::Inserted { .. } = outcome {
            records.push(mapping);
        }
        Ok(outcome)
    }

    async fn remove_where(&self, identifier: &str) -> Result<usize> {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|record| !record.matches(identifier));
        Ok(before - records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn mapping(original: &str, token: &str) -> Mapping {
        Mapping::new(original, format!("http://localhost:8000/{token}"))
    }

    #[tokio::test]
    async fn insert_and_find_both_ways() {
        let repo = InMemoryRepository::new();
        repo.insert(mapping("https://example.com", "abc1234"))
            .await
            .unwrap();

        let by_original = repo.find_by_original("https://example.com").await.unwrap();
        let by_short = repo
            .find_by_short("http://localhost:8000/abc1234")
            .await
            .unwrap();
        assert_eq!(by_original, Some(mapping("https://example.com", "abc1234")));
        assert_eq!(by_original, by_short);
    }

    #[tokio::test]
    async fn find_is_exact_match() {
        let repo = InMemoryRepository::new();
        repo.insert(mapping("https://example.com", "abc1234"))
            .await
            .unwrap();

        assert!(repo.find_by_original("https://example.com/").await.unwrap().is_none());
        assert!(repo.find_by_short("abc1234").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn plain_insert_does_not_deduplicate() {
        let repo = InMemoryRepository::new();
        repo.insert(mapping("https://example.com", "abc1234"))
            .await
            .unwrap();
        repo.insert(mapping("https://example.com", "abc1234"))
            .await
            .unwrap();
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn insert_unique_reports_existing_original() {
        let repo = InMemoryRepository::new();
        let first = mapping("https://example.com", "abc1234");
        let outcome = repo
            .insert_unique(first.clone(), ShortCollision::Allow)
            .await
            .unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted { shared_with: None });

        let outcome = repo
            .insert_unique(mapping("https://example.com", "zzz9999"), ShortCollision::Allow)
            .await
            .unwrap();
        assert_eq!(outcome, InsertOutcome::OriginalExists(first));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn insert_unique_short_collision() {
        let repo = InMemoryRepository::new();
        let holder = mapping("https://a.com", "abc1234");
        repo.insert(holder.clone()).await.unwrap();

        let outcome = repo
            .insert_unique(mapping("https://b.com", "abc1234"), ShortCollision::Reject)
            .await
            .unwrap();
        assert_eq!(outcome, InsertOutcome::ShortTaken(holder.clone()));
        assert_eq!(repo.len(), 1);

        let outcome = repo
            .insert_unique(mapping("https://b.com", "abc1234"), ShortCollision::Allow)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            InsertOutcome::Inserted {
                shared_with: Some(holder.clone())
            }
        );
        assert_eq!(repo.len(), 2);

        // the first holder wins ambiguous lookups
        let found = repo
            .find_by_short("http://localhost:8000/abc1234")
            .await
            .unwrap();
        assert_eq!(found, Some(holder));
    }

    #[tokio::test]
    async fn remove_by_either_key() {
        let repo = InMemoryRepository::new();
        repo.insert(mapping("https://a.com", "aaa")).await.unwrap();
        repo.insert(mapping("https://b.com", "bbb")).await.unwrap();

        assert_eq!(repo.remove_where("https://a.com").await.unwrap(), 1);
        assert_eq!(
            repo.remove_where("http://localhost:8000/bbb").await.unwrap(),
            1
        );
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn remove_counts_every_match() {
        let repo = InMemoryRepository::new();
        repo.insert(mapping("https://a.com", "abc")).await.unwrap();
        repo.insert(mapping("https://b.com", "abc")).await.unwrap();
        repo.insert(mapping("https://c.com", "ccc")).await.unwrap();

        assert_eq!(repo.remove_where("http://localhost:8000/abc").await.unwrap(), 2);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn remove_nonexistent() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.remove_where("https://nope.com").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_insert_unique_stores_one_record() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut handles = vec![];

        for _ in 0..16 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.insert_unique(mapping("https://example.com", "abc1234"), ShortCollision::Allow)
                    .await
                    .unwrap()
            }));
        }

        let mut inserted = 0;
        for handle in handles {
            if let InsertOutcome::Inserted { .. } = handle.await.unwrap() {
                inserted += 1;
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(repo.len(), 1);
    }
}
