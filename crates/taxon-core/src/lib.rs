pub mod cache;
pub mod classify;
pub mod error;
pub mod models;
pub mod resolve;
pub mod testutil;
pub mod traits;

pub use cache::TitleCache;
pub use classify::ClassifyService;
pub use error::AppError;
pub use models::{
    ClassificationOutcome, ClassificationRequest, ClassificationResult, ClassificationResults,
    ClassifierOutput, ClassifyMode, ResolvedItem, UNRESOLVED_MARKER,
};
pub use traits::{Classifier, ContentExtractor, Fetcher, TitleParser};
