use taxon_client::{DocTitleParser, MainTextExtractor, PageFetcher, ZeroShotClassifier};
use taxon_core::ClassifyService;

/// The classification pipeline wired from the production client components.
pub type Pipeline =
    ClassifyService<PageFetcher, DocTitleParser, MainTextExtractor, ZeroShotClassifier>;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    pub pipeline: Pipeline,
}
