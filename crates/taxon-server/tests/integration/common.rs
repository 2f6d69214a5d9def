use std::sync::Arc;

use axum::Router;

use taxon_client::{DocTitleParser, MainTextExtractor, PageFetcher, ZeroShotClassifier};
use taxon_core::{ClassifyService, TitleCache};
use taxon_server::routes;
use taxon_server::state::AppState;

/// Router wired with the production components.
///
/// The tests only exercise paths that return before any network call
/// (health, request validation), so no external service is needed.
pub fn setup_test_app() -> Router {
    let pipeline = ClassifyService::new(
        PageFetcher::new().expect("fetcher"),
        DocTitleParser,
        MainTextExtractor::new(),
        ZeroShotClassifier::new().expect("classifier"),
        Arc::new(TitleCache::default()),
    );

    routes::router(Arc::new(AppState { pipeline }))
}
