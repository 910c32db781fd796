use async_trait::async_trait;
use hashlink_core::{
    CollisionPolicy, InsertOutcome, Mapping, ReadRepository, Repository, ShortCollision,
    ShortToken, ShortenOutcome, Shortener, ShortenerError,
};
use hashlink_generator::Generator;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use typed_builder::TypedBuilder;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/";

/// Configures a [`ShortenerService`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerSettings {
    /// Base URL every short token is embedded into.
    #[builder(default = DEFAULT_BASE_URL.to_string(), setter(into))]
    pub base_url: String,
    /// What to do when a different URL already owns the generated token.
    #[builder(default)]
    pub collision: CollisionPolicy,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - dedup-by-content: a URL that is already stored keeps its alias
/// - token derivation and the configured collision policy
/// - resolve and delete by either side of a mapping
///
/// The service keeps no state of its own between calls; the repository is
/// the single source of truth.
#[derive(Debug)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    settings: ShortenerSettings,
}

impl<R, G> Clone for ShortenerService<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
            settings: self.settings.clone(),
        }
    }
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    pub fn new(repository: R, generator: G, settings: ShortenerSettings) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            settings,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    fn short_collision(&self) -> ShortCollision {
        match self.settings.collision {
            CollisionPolicy::Ignore => ShortCollision::Allow,
            CollisionPolicy::Lengthen => ShortCollision::Reject,
        }
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, original_url: &str) -> Result<ShortenOutcome, ShortenerError> {
        if original_url.is_empty() {
            return Err(ShortenerError::InvalidInput(
                "URL cannot be empty".to_string(),
            ));
        }

        if let Some(existing) = self.repository.find_by_original(original_url).await? {
            debug!(original_url, short_url = %existing.short_url, "reusing existing mapping");
            return Ok(ShortenOutcome {
                mapping: existing,
                created: false,
            });
        }

        let collision = self.short_collision();
        let mut token = self.generator.generate(original_url);

        loop {
            let mapping = Mapping::new(original_url, token.to_url(&self.settings.base_url));

            match self
                .repository
                .insert_unique(mapping.clone(), collision)
                .await?
            {
                InsertOutcome::Inserted { shared_with } => {
                    if let Some(holder) = shared_with {
                        warn!(
                            short_url = %mapping.short_url,
                            original_url,
                            holder = %holder.original_url,
                            "short token collision, resolve will be ambiguous"
                        );
                    }
                    info!(original_url, short_url = %mapping.short_url, "created mapping");
                    return Ok(ShortenOutcome {
                        mapping,
                        created: true,
                    });
                }
                InsertOutcome::OriginalExists(existing) => {
                    // a concurrent shorten of the same URL won
                    debug!(original_url, short_url = %existing.short_url, "reusing existing mapping");
                    return Ok(ShortenOutcome {
                        mapping: existing,
                        created: false,
                    });
                }
                InsertOutcome::ShortTaken(holder) => {
                    warn!(
                        token = %token,
                        original_url,
                        holder = %holder.original_url,
                        "short token collision, lengthening"
                    );
                    token = self
                        .generator
                        .lengthen(original_url, &token)
                        .ok_or_else(|| ShortenerError::CollisionUnresolved(original_url.to_string()))?;
                }
            }
        }
    }

    async fn resolve(&self, token: &str) -> Result<String, ShortenerError> {
        trace!(token, "resolving short token");

        let token =
            ShortToken::new(token).map_err(|e| ShortenerError::NotFound(e.to_string()))?;
        let short_url = token.to_url(&self.settings.base_url);

        match self.repository.find_by_short(&short_url).await? {
            Some(mapping) => {
                debug!(short_url = %short_url, original_url = %mapping.original_url, "resolved short token");
                Ok(mapping.original_url)
            }
            None => {
                trace!(short_url = %short_url, "short token not found");
                Err(ShortenerError::NotFound(short_url))
            }
        }
    }

    async fn delete(&self, identifier: &str) -> Result<usize, ShortenerError> {
        let removed = self.repository.remove_where(identifier).await?;
        if removed == 0 {
            trace!(identifier, "nothing to delete");
            return Err(ShortenerError::NotFound(identifier.to_string()));
        }

        info!(identifier, removed, "deleted mappings");
        Ok(removed)
    }
}
