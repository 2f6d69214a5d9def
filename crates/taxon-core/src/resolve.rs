use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;

use crate::cache::TitleCache;
use crate::error::AppError;
use crate::models::ResolvedItem;
use crate::traits::{ContentExtractor, Fetcher, TitleParser};

/// Turns a single URL into a classifiable text sequence.
///
/// Implemented by [`TitleResolver`] and [`ContentResolver`]; the batch
/// fan-out in [`resolve_all`] is generic over this seam.
pub trait Resolve: Send + Sync {
    fn resolve(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Resolves a URL to its page title, consulting the shared cache before
/// touching the network.
#[derive(Clone)]
pub struct TitleResolver<F, P>
where
    F: Fetcher,
    P: TitleParser,
{
    fetcher: F,
    parser: P,
    cache: Arc<TitleCache>,
}

impl<F, P> TitleResolver<F, P>
where
    F: Fetcher,
    P: TitleParser,
{
    pub fn new(fetcher: F, parser: P, cache: Arc<TitleCache>) -> Self {
        Self {
            fetcher,
            parser,
            cache,
        }
    }
}

impl<F, P> Resolve for TitleResolver<F, P>
where
    F: Fetcher,
    P: TitleParser,
{
    async fn resolve(&self, url: &str) -> Result<String, AppError> {
        if let Some(title) = self.cache.get(url) {
            tracing::debug!(%url, "title cache hit");
            return Ok(title);
        }

        tracing::info!(%url, "fetching title");
        let html = self.fetcher.fetch(url).await?;
        let title = self.parser.parse_title(&html)?.trim().to_string();

        // Empty titles are cached too: re-fetching would not improve them.
        self.cache.put(url, &title);
        Ok(title)
    }
}

/// Resolves a URL to its extracted main-body text. Uncached: extraction
/// runs at most once per URL per request.
#[derive(Clone)]
pub struct ContentResolver<F, X>
where
    F: Fetcher,
    X: ContentExtractor,
{
    fetcher: F,
    extractor: X,
}

impl<F, X> ContentResolver<F, X>
where
    F: Fetcher,
    X: ContentExtractor,
{
    pub fn new(fetcher: F, extractor: X) -> Self {
        Self { fetcher, extractor }
    }
}

impl<F, X> Resolve for ContentResolver<F, X>
where
    F: Fetcher,
    X: ContentExtractor,
{
    async fn resolve(&self, url: &str) -> Result<String, AppError> {
        tracing::info!(%url, "fetching content");
        let html = self.fetcher.fetch(url).await?;
        self.extractor.extract(&html)
    }
}

/// Resolve every URL in the batch concurrently.
///
/// All resolutions are launched before any is awaited, so batch latency
/// approaches the slowest single resolution. The call returns only once
/// every resolution has completed or failed; a failure is recorded as
/// `sequence: None` for its key and never disturbs sibling items. Results
/// come back positionally, one entry per input URL in input order, so a
/// completion race can never land a value under the wrong key.
pub async fn resolve_all<R: Resolve>(resolver: &R, urls: &[String]) -> Vec<ResolvedItem> {
    let pending = urls.iter().map(|url| async move {
        match resolver.resolve(url).await {
            Ok(sequence) => ResolvedItem {
                key: url.clone(),
                sequence: Some(sequence),
            },
            Err(error) => {
                tracing::warn!(%url, %error, "resolution failed");
                ResolvedItem {
                    key: url.clone(),
                    sequence: None,
                }
            }
        }
    });

    join_all(pending).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|u| u.to_string()).collect()
    }

    #[tokio::test]
    async fn title_resolver_populates_and_reuses_cache() {
        let fetcher = MockFetcher::new("<title ignored by passthrough>");
        let cache = Arc::new(TitleCache::default());
        let resolver = TitleResolver::new(
            fetcher.clone(),
            MockTitleParser::fixed("Example Domain"),
            cache.clone(),
        );

        let first = resolver.resolve("https://example.com").await.unwrap();
        let second = resolver.resolve("https://example.com").await.unwrap();

        assert_eq!(first, "Example Domain");
        assert_eq!(second, "Example Domain");
        assert_eq!(fetcher.calls("https://example.com"), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn title_resolver_refetches_after_expiry() {
        use std::time::Duration;

        let fetcher = MockFetcher::new("page");
        let cache = Arc::new(TitleCache::new(10, Duration::from_millis(5)));
        let resolver =
            TitleResolver::new(fetcher.clone(), MockTitleParser::fixed("T"), cache);

        resolver.resolve("https://example.com").await.unwrap();
        std::thread::sleep(Duration::from_millis(20));
        resolver.resolve("https://example.com").await.unwrap();

        assert_eq!(fetcher.calls("https://example.com"), 2);
    }

    #[tokio::test]
    async fn title_resolver_trims_whitespace() {
        let fetcher = MockFetcher::new("page");
        let resolver = TitleResolver::new(
            fetcher,
            MockTitleParser::fixed("  Example Domain \n"),
            Arc::new(TitleCache::default()),
        );

        let title = resolver.resolve("https://example.com").await.unwrap();
        assert_eq!(title, "Example Domain");
    }

    #[tokio::test]
    async fn content_resolver_surfaces_extraction_errors() {
        let resolver = ContentResolver::new(
            MockFetcher::new("<html></html>"),
            MockContentExtractor::with_error("no main content"),
        );

        let err = resolver.resolve("https://example.com").await.unwrap_err();
        assert!(matches!(err, AppError::ExtractionError(_)));
    }

    #[tokio::test]
    async fn batch_keeps_every_key_and_isolates_failures() {
        let fetcher = MockFetcher::with_pages(vec![
            ("https://a.example", Ok("alpha")),
            ("https://b.example", Err("connection refused")),
            ("https://c.example", Ok("charlie")),
        ]);
        let resolver = ContentResolver::new(fetcher, MockContentExtractor::passthrough());

        let resolved = resolve_all(
            &resolver,
            &urls(&["https://a.example", "https://b.example", "https://c.example"]),
        )
        .await;

        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0].key, "https://a.example");
        assert_eq!(resolved[0].sequence.as_deref(), Some("alpha"));
        assert_eq!(resolved[1].key, "https://b.example");
        assert_eq!(resolved[1].sequence, None);
        assert_eq!(resolved[2].key, "https://c.example");
        assert_eq!(resolved[2].sequence.as_deref(), Some("charlie"));
    }

    #[tokio::test(start_paused = true)]
    async fn batch_runs_resolutions_concurrently() {
        use std::time::Duration;
        use tokio::time::Instant;

        /// Fetcher that simulates a slow network hop.
        #[derive(Clone)]
        struct SlowFetcher;

        impl Fetcher for SlowFetcher {
            async fn fetch(&self, _url: &str) -> Result<String, AppError> {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok("page".to_string())
            }
        }

        let resolver = ContentResolver::new(SlowFetcher, MockContentExtractor::passthrough());
        let batch = urls(&["https://a.example", "https://b.example", "https://c.example"]);

        let started = Instant::now();
        let resolved = resolve_all(&resolver, &batch).await;

        // three 100ms fetches overlap instead of summing
        assert!(started.elapsed() < Duration::from_millis(150));
        assert_eq!(resolved.len(), 3);
    }
}
