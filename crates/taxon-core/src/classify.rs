use std::sync::Arc;

use crate::cache::TitleCache;
use crate::error::AppError;
use crate::models::{
    ClassificationOutcome, ClassificationRequest, ClassificationResult, ClassificationResults,
    ClassifyMode, ResolvedItem,
};
use crate::resolve::{ContentResolver, TitleResolver, resolve_all};
use crate::traits::{Classifier, ContentExtractor, Fetcher, TitleParser};

/// Orchestrates the full classification pipeline: validate → resolve URLs
/// concurrently → merge raw texts → classify each item → assemble the
/// ordered result map.
///
/// Generic over all external dependencies via traits, enabling dependency
/// injection and testability without real HTTP or model calls. Each call
/// owns its result map exclusively; only the title cache is shared across
/// requests.
pub struct ClassifyService<F, P, X, C>
where
    F: Fetcher,
    P: TitleParser,
    X: ContentExtractor,
    C: Classifier,
{
    fetcher: F,
    title_parser: P,
    extractor: X,
    classifier: C,
    cache: Arc<TitleCache>,
}

impl<F, P, X, C> ClassifyService<F, P, X, C>
where
    F: Fetcher,
    P: TitleParser,
    X: ContentExtractor,
    C: Classifier,
{
    pub fn new(fetcher: F, title_parser: P, extractor: X, classifier: C, cache: Arc<TitleCache>) -> Self {
        Self {
            fetcher,
            title_parser,
            extractor,
            classifier,
            cache,
        }
    }

    /// Run one classification request.
    ///
    /// The returned map holds exactly one entry per input item, in input
    /// order: URLs under their literal URL, raw texts under `text{i}`. Items
    /// whose sequence could not be resolved come back `Unresolved`; a
    /// resolution failure never aborts the batch. Classifier failures are
    /// not expected per-item conditions and do propagate.
    pub async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResults, AppError> {
        request.validate()?;

        let urls = request.url_slice();
        let mut resolved: Vec<ResolvedItem> = if urls.is_empty() {
            Vec::new()
        } else {
            match request.mode {
                ClassifyMode::Title => {
                    let resolver = TitleResolver::new(
                        self.fetcher.clone(),
                        self.title_parser.clone(),
                        Arc::clone(&self.cache),
                    );
                    resolve_all(&resolver, urls).await
                }
                ClassifyMode::ExtractedText => {
                    let resolver =
                        ContentResolver::new(self.fetcher.clone(), self.extractor.clone());
                    resolve_all(&resolver, urls).await
                }
            }
        };

        for (i, text) in request.text_slice().iter().enumerate() {
            resolved.push(ResolvedItem {
                key: format!("text{i}"),
                sequence: Some(text.clone()),
            });
        }

        let mut results = Vec::with_capacity(resolved.len());
        for item in resolved {
            let outcome = match item.sequence.as_deref().filter(|s| !s.trim().is_empty()) {
                Some(sequence) => {
                    let output = self
                        .classifier
                        .classify(sequence, &request.labels, true)
                        .await?;
                    ClassificationOutcome::Scored(output)
                }
                None => {
                    tracing::info!(key = %item.key, "no sequence to classify");
                    ClassificationOutcome::Unresolved
                }
            };
            results.push(ClassificationResult {
                key: item.key,
                outcome,
            });
        }

        Ok(ClassificationResults(results))
    }
}
