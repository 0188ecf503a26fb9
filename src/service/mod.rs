pub mod aggregator;

use std::time::Duration;
use tracing::debug;

use crate::cache::{cache_key, CacheStats, CacheStore};
use crate::error::Result;
use crate::news::client::{NewsClient, EVERYTHING, SOURCES, TOP_HEADLINES};
use crate::news::query::{HeadlinesQuery, PersonalQuery, SearchQuery, SourcesQuery};
use crate::news::{NewsResponse, Preferences, SourcesResponse};

/// Upstream responses are reused for 15 minutes.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

/// The aggregation-and-cache service.
///
/// Every non-personalized operation follows the same path: compose the
/// canonical parameter list, consult the cache, and only on a miss call
/// upstream and store the result. Personalized requests fan out through
/// [`aggregator`], whose headline sub-requests each pass through the
/// cached headlines path and are therefore cached individually.
pub struct NewsService {
    client: NewsClient,
    news_cache: CacheStore<NewsResponse>,
    sources_cache: CacheStore<SourcesResponse>,
}

impl NewsService {
    pub fn new(client: NewsClient) -> Self {
        Self::with_ttl(client, DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl(client: NewsClient, ttl: Duration) -> Self {
        Self::with_caches(client, CacheStore::new(ttl), CacheStore::new(ttl))
    }

    /// Full dependency injection, used by tests to control the clock.
    pub fn with_caches(
        client: NewsClient,
        news_cache: CacheStore<NewsResponse>,
        sources_cache: CacheStore<SourcesResponse>,
    ) -> Self {
        Self {
            client,
            news_cache,
            sources_cache,
        }
    }

    pub async fn top_headlines(&self, query: &HeadlinesQuery) -> Result<NewsResponse> {
        self.cached_news(TOP_HEADLINES, query.to_params()).await
    }

    pub async fn search_everything(&self, query: &SearchQuery) -> Result<NewsResponse> {
        // Validation happens before any cache or upstream access.
        let params = query.to_params()?;
        self.cached_news(EVERYTHING, params).await
    }

    pub async fn get_sources(&self, query: &SourcesQuery) -> Result<SourcesResponse> {
        let params = query.to_params();
        let key = cache_key(SOURCES, &params);

        if let Some(hit) = self.sources_cache.get(&key) {
            debug!("Cache hit for {}", SOURCES);
            return Ok(hit);
        }

        let response = self.client.get_source_list(&params).await?;
        self.sources_cache.put(key, response.clone());
        Ok(response)
    }

    /// Merged headlines for a user's preference set.
    ///
    /// The merged result itself is not cached; only the underlying
    /// headline sub-requests are.
    pub async fn personalized(
        &self,
        preferences: &Preferences,
        query: &PersonalQuery,
    ) -> Result<NewsResponse> {
        aggregator::personalized(self, preferences, query).await
    }

    async fn cached_news(
        &self,
        endpoint: &str,
        params: Vec<(String, String)>,
    ) -> Result<NewsResponse> {
        let key = cache_key(endpoint, &params);

        if let Some(hit) = self.news_cache.get(&key) {
            debug!("Cache hit for {}", endpoint);
            return Ok(hit);
        }

        let response = self.client.get_news(endpoint, &params).await?;
        self.news_cache.put(key, response.clone());
        Ok(response)
    }

    /// (news, sources) cache statistics.
    pub fn cache_stats(&self) -> (CacheStats, CacheStats) {
        (self.news_cache.stats(), self.sources_cache.stats())
    }
}
