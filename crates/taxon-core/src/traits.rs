use std::future::Future;

use crate::error::AppError;
use crate::models::ClassifierOutput;

/// Fetches raw HTML content from a URL.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Extracts the document title from raw HTML.
pub trait TitleParser: Send + Sync + Clone {
    fn parse_title(&self, html: &str) -> Result<String, AppError>;
}

/// Isolates the main readable text of a page from raw HTML, discarding
/// navigation, boilerplate, and other non-content markup.
pub trait ContentExtractor: Send + Sync + Clone {
    fn extract(&self, html: &str) -> Result<String, AppError>;
}

/// Scores a text sequence against a set of candidate labels using a
/// zero-shot classification model.
pub trait Classifier: Send + Sync + Clone {
    /// With `single_label`, the model distributes probability mass across
    /// the label set and picks one best label; otherwise each label is
    /// scored independently.
    fn classify(
        &self,
        sequence: &str,
        labels: &[String],
        single_label: bool,
    ) -> impl Future<Output = Result<ClassifierOutput, AppError>> + Send;
}
