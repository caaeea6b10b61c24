//! Retrying wrapper around the API client.

use std::time::Duration;

use rand::Rng;
use wix_api::types::{
    BulkMachineTranslateResponse, BulkResponse, Content, EmbedPosition, FieldMask, Locale,
    MaskedContent, QueryContentsResponse, QueryPublishedContentResponse, QuerySchemasResponse,
    QuerySiteEmbedsResponse, Schema, SearchPublishedContentResponse, SiteEmbed,
    TranslatableContent,
};
use wix_api::{Client, CursorPaging, CursorQuery, CursorSearch};

use crate::error::WixError;

/// API client wrapper that retries read operations.
///
/// Reads (get, query, search, list) are retried with exponential backoff on
/// transport failures, 429 and 5xx responses. Writes are sent exactly once:
/// a failed create or translate may still have been applied by the service.
pub struct RetryingClient {
    inner: Client,
    retry: RetryConfig,
}

/// Backoff settings for retried reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
        }
    }
}

impl RetryConfig {
    /// Reads `WIX_RETRY_MAX`, `WIX_RETRY_BASE_MS` and `WIX_RETRY_MAX_MS`,
    /// falling back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_retries: env_usize("WIX_RETRY_MAX", defaults.max_retries),
            base_delay_ms: env_u64("WIX_RETRY_BASE_MS", defaults.base_delay_ms),
            max_delay_ms: env_u64("WIX_RETRY_MAX_MS", defaults.max_delay_ms),
        }
    }

    /// No retries at all.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let base = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

impl RetryingClient {
    /// Wraps `inner`, reading retry settings from the environment.
    pub fn new(inner: Client) -> Self {
        Self::with_retry_config(inner, RetryConfig::from_env())
    }

    pub fn with_retry_config(inner: Client, retry: RetryConfig) -> Self {
        Self { inner, retry }
    }

    /// The wrapped client, for calls that need no retry handling.
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    async fn with_retry<T, F, Fut>(&self, label: &str, mut f: F) -> Result<T, WixError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, wix_api::Error>>,
    {
        let mut attempt = 0usize;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt > self.retry.max_retries || !is_retryable(&err) {
                        return Err(err.into());
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} request failed (attempt {}/{}), retrying in {:.1}s",
                        label,
                        attempt,
                        self.retry.max_retries,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    pub async fn get_site_embed(&self, site_embed_id: &str) -> Result<SiteEmbed, WixError> {
        self.with_retry("site embed", || self.inner.get_site_embed(site_embed_id))
            .await
    }

    pub async fn query_site_embeds(
        &self,
        query: &CursorQuery,
    ) -> Result<QuerySiteEmbedsResponse, WixError> {
        self.with_retry("site embeds", || self.inner.query_site_embeds(query))
            .await
    }

    pub async fn get_schema(&self, schema_id: &str) -> Result<Schema, WixError> {
        self.with_retry("schema", || self.inner.get_schema(schema_id))
            .await
    }

    pub async fn query_schemas(&self, query: &CursorQuery) -> Result<QuerySchemasResponse, WixError> {
        self.with_retry("schemas", || self.inner.query_schemas(query))
            .await
    }

    pub async fn list_site_schemas(
        &self,
        paging: &CursorPaging,
    ) -> Result<QuerySchemasResponse, WixError> {
        self.with_retry("site schemas", || self.inner.list_site_schemas(paging))
            .await
    }

    pub async fn get_content(&self, content_id: &str) -> Result<Content, WixError> {
        self.with_retry("content", || self.inner.get_content(content_id))
            .await
    }

    pub async fn query_contents(
        &self,
        query: &CursorQuery,
    ) -> Result<QueryContentsResponse, WixError> {
        self.with_retry("contents", || self.inner.query_contents(query))
            .await
    }

    pub async fn query_published_content(
        &self,
        query: &CursorQuery,
    ) -> Result<QueryPublishedContentResponse, WixError> {
        self.with_retry("published content", || {
            self.inner.query_published_content(query)
        })
        .await
    }

    pub async fn search_published_content(
        &self,
        search: &CursorSearch,
    ) -> Result<SearchPublishedContentResponse, WixError> {
        self.with_retry("published content search", || {
            self.inner.search_published_content(search)
        })
        .await
    }

    // ---------------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------------

    pub async fn create_site_embed(&self, site_embed: &SiteEmbed) -> Result<SiteEmbed, WixError> {
        Ok(self.inner.create_site_embed(site_embed).await?)
    }

    pub async fn update_site_embed(
        &self,
        site_embed: &SiteEmbed,
        field_mask: Option<&FieldMask>,
    ) -> Result<SiteEmbed, WixError> {
        Ok(self.inner.update_site_embed(site_embed, field_mask).await?)
    }

    pub async fn delete_site_embed(&self, site_embed_id: &str) -> Result<(), WixError> {
        Ok(self.inner.delete_site_embed(site_embed_id).await?)
    }

    pub async fn place_site_embed(
        &self,
        site_embed_id: &str,
        position: EmbedPosition,
        order: Option<i32>,
    ) -> Result<SiteEmbed, WixError> {
        Ok(self
            .inner
            .place_site_embed(site_embed_id, position, order)
            .await?)
    }

    pub async fn remove_site_embed_placement(
        &self,
        site_embed_id: &str,
    ) -> Result<SiteEmbed, WixError> {
        Ok(self.inner.remove_site_embed_placement(site_embed_id).await?)
    }

    pub async fn create_schema(&self, schema: &Schema) -> Result<Schema, WixError> {
        Ok(self.inner.create_schema(schema).await?)
    }

    pub async fn update_schema(&self, schema: &Schema) -> Result<Schema, WixError> {
        Ok(self.inner.update_schema(schema).await?)
    }

    pub async fn delete_schema(&self, schema_id: &str) -> Result<(), WixError> {
        Ok(self.inner.delete_schema(schema_id).await?)
    }

    pub async fn create_content(&self, content: &Content) -> Result<Content, WixError> {
        Ok(self.inner.create_content(content).await?)
    }

    pub async fn update_content(
        &self,
        content: &Content,
        field_mask: Option<&FieldMask>,
    ) -> Result<Content, WixError> {
        Ok(self.inner.update_content(content, field_mask).await?)
    }

    pub async fn delete_content(&self, content_id: &str) -> Result<(), WixError> {
        Ok(self.inner.delete_content(content_id).await?)
    }

    pub async fn bulk_create_content(
        &self,
        contents: &[Content],
        return_entity: bool,
    ) -> Result<BulkResponse<Content>, WixError> {
        Ok(self.inner.bulk_create_content(contents, return_entity).await?)
    }

    pub async fn bulk_update_content(
        &self,
        contents: &[MaskedContent],
        return_entity: bool,
    ) -> Result<BulkResponse<Content>, WixError> {
        Ok(self.inner.bulk_update_content(contents, return_entity).await?)
    }

    pub async fn bulk_upsert_content(
        &self,
        contents: &[Content],
        return_entity: bool,
    ) -> Result<BulkResponse<Content>, WixError> {
        Ok(self.inner.bulk_upsert_content(contents, return_entity).await?)
    }

    pub async fn bulk_delete_content(
        &self,
        content_ids: &[String],
    ) -> Result<BulkResponse<Content>, WixError> {
        Ok(self.inner.bulk_delete_content(content_ids).await?)
    }

    pub async fn machine_translate(
        &self,
        source_language: &Locale,
        target_language: &Locale,
        content: &TranslatableContent,
    ) -> Result<TranslatableContent, WixError> {
        Ok(self
            .inner
            .machine_translate(source_language, target_language, content)
            .await?)
    }

    pub async fn bulk_machine_translate(
        &self,
        source_language: &Locale,
        target_language: &Locale,
        contents: &[TranslatableContent],
    ) -> Result<BulkMachineTranslateResponse, WixError> {
        Ok(self
            .inner
            .bulk_machine_translate(source_language, target_language, contents)
            .await?)
    }
}

fn is_retryable(err: &wix_api::Error) -> bool {
    match err {
        wix_api::Error::RequestFailed => true,
        wix_api::Error::HttpStatus { status, .. } | wix_api::Error::Api { status, .. } => {
            *status == 429 || *status >= 500
        }
        wix_api::Error::InvalidArgument { .. } => false,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_grows_and_caps() {
        let cfg = RetryConfig {
            max_retries: 5,
            base_delay_ms: 100,
            max_delay_ms: 300,
        };
        let first = cfg.delay_for_attempt(1).as_millis();
        assert!((80..=120).contains(&first));
        let third = cfg.delay_for_attempt(3).as_millis();
        assert!((240..=360).contains(&third));
        let tenth = cfg.delay_for_attempt(10).as_millis();
        assert!(tenth <= 360);
    }

    #[test]
    fn retryable_statuses() {
        assert!(is_retryable(&wix_api::Error::RequestFailed));
        assert!(is_retryable(&wix_api::Error::HttpStatus {
            status: 429,
            body: String::new()
        }));
        assert!(is_retryable(&wix_api::Error::HttpStatus {
            status: 503,
            body: String::new()
        }));
        assert!(!is_retryable(&wix_api::Error::HttpStatus {
            status: 404,
            body: String::new()
        }));
        assert!(!is_retryable(&wix_api::Error::InvalidArgument {
            message: "x".to_string()
        }));
    }
}
