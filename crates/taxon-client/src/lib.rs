pub mod classifier;
pub mod fetcher;
pub mod html;

pub use classifier::{DEFAULT_INFERENCE_URL, DEFAULT_MODEL, ZeroShotClassifier};
pub use fetcher::PageFetcher;
pub use html::{DocTitleParser, MainTextExtractor};
