//! Test utilities: mock implementations of all core traits.
//!
//! Handwritten mocks for dependency injection in unit and integration
//! tests. All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! assertions on recorded calls after the pipeline has run.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::models::ClassifierOutput;
use crate::traits::{Classifier, ContentExtractor, Fetcher, TitleParser};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher serving canned pages keyed by URL, with a per-URL call
/// counter for cache assertions. Responses replay on every call.
#[derive(Clone, Default)]
pub struct MockFetcher {
    pages: Arc<Mutex<HashMap<String, Result<String, String>>>>,
    default_page: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<HashMap<String, usize>>>,
}

impl MockFetcher {
    /// Serve `html` for every URL.
    pub fn new(html: &str) -> Self {
        let fetcher = Self::default();
        *fetcher.default_page.lock().unwrap() = Some(html.to_string());
        fetcher
    }

    /// Serve per-URL responses; `Err` values become `AppError::HttpError`.
    /// URLs outside the map fail.
    pub fn with_pages(pages: Vec<(&str, Result<&str, &str>)>) -> Self {
        let fetcher = Self::default();
        {
            let mut map = fetcher.pages.lock().unwrap();
            for (url, response) in pages {
                map.insert(
                    url.to_string(),
                    response.map(String::from).map_err(String::from),
                );
            }
        }
        fetcher
    }

    /// Fail every fetch with the given message.
    pub fn with_error(message: &str) -> Self {
        let fetcher = Self::default();
        fetcher
            .pages
            .lock()
            .unwrap()
            .insert("*".to_string(), Err(message.to_string()));
        fetcher
    }

    /// How many times `url` was fetched.
    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    /// Total fetches across all URLs.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;

        let pages = self.pages.lock().unwrap();
        if let Some(response) = pages.get(url).or_else(|| pages.get("*")) {
            return response.clone().map_err(AppError::HttpError);
        }

        match self.default_page.lock().unwrap().as_ref() {
            Some(html) => Ok(html.clone()),
            None => Err(AppError::HttpError(format!("no mock page for {url}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// MockTitleParser
// ---------------------------------------------------------------------------

/// Mock title parser with a fixed or passthrough response.
#[derive(Clone)]
pub struct MockTitleParser {
    title: Arc<Mutex<Result<Option<String>, String>>>,
}

impl MockTitleParser {
    /// Returns the raw input as the title.
    pub fn passthrough() -> Self {
        Self {
            title: Arc::new(Mutex::new(Ok(None))),
        }
    }

    /// Returns the same title for every document.
    pub fn fixed(title: &str) -> Self {
        Self {
            title: Arc::new(Mutex::new(Ok(Some(title.to_string())))),
        }
    }

    /// Fails every parse with an `ExtractionError`.
    pub fn with_error(message: &str) -> Self {
        Self {
            title: Arc::new(Mutex::new(Err(message.to_string()))),
        }
    }
}

impl TitleParser for MockTitleParser {
    fn parse_title(&self, html: &str) -> Result<String, AppError> {
        match &*self.title.lock().unwrap() {
            Ok(Some(title)) => Ok(title.clone()),
            Ok(None) => Ok(html.to_string()),
            Err(message) => Err(AppError::ExtractionError(message.clone())),
        }
    }
}

// ---------------------------------------------------------------------------
// MockContentExtractor
// ---------------------------------------------------------------------------

/// Mock content extractor: passthrough, empty output, or failure.
#[derive(Clone)]
pub struct MockContentExtractor {
    behavior: Arc<Mutex<Result<Option<()>, String>>>,
}

impl MockContentExtractor {
    /// Returns the raw input unchanged.
    pub fn passthrough() -> Self {
        Self {
            behavior: Arc::new(Mutex::new(Ok(Some(())))),
        }
    }

    /// Extracts successfully but finds nothing.
    pub fn empty() -> Self {
        Self {
            behavior: Arc::new(Mutex::new(Ok(None))),
        }
    }

    /// Fails every extraction with an `ExtractionError`.
    pub fn with_error(message: &str) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(Err(message.to_string()))),
        }
    }
}

impl ContentExtractor for MockContentExtractor {
    fn extract(&self, html: &str) -> Result<String, AppError> {
        match &*self.behavior.lock().unwrap() {
            Ok(Some(())) => Ok(html.to_string()),
            Ok(None) => Ok(String::new()),
            Err(message) => Err(AppError::ExtractionError(message.clone())),
        }
    }
}

// ---------------------------------------------------------------------------
// MockClassifier
// ---------------------------------------------------------------------------

/// One recorded classifier invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierCall {
    pub sequence: String,
    pub labels: Vec<String>,
    pub single_label: bool,
}

/// Mock classifier that records every call and returns a configurable
/// output. The default scores the given labels in order with linearly
/// decreasing confidence, so the first label always wins.
#[derive(Clone)]
pub struct MockClassifier {
    output: Arc<Mutex<Result<Option<ClassifierOutput>, String>>>,
    calls: Arc<Mutex<Vec<ClassifierCall>>>,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self {
            output: Arc::new(Mutex::new(Ok(None))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Return the same output for every call.
    pub fn with_output(output: ClassifierOutput) -> Self {
        Self {
            output: Arc::new(Mutex::new(Ok(Some(output)))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail every call with a `ClassifierError`.
    pub fn with_error(message: &str) -> Self {
        Self {
            output: Arc::new(Mutex::new(Err(message.to_string()))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All recorded invocations, in call order.
    pub fn calls(&self) -> Vec<ClassifierCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for MockClassifier {
    async fn classify(
        &self,
        sequence: &str,
        labels: &[String],
        single_label: bool,
    ) -> Result<ClassifierOutput, AppError> {
        self.calls.lock().unwrap().push(ClassifierCall {
            sequence: sequence.to_string(),
            labels: labels.to_vec(),
            single_label,
        });

        match &*self.output.lock().unwrap() {
            Ok(Some(output)) => Ok(output.clone()),
            Ok(None) => {
                let n = labels.len() as f64;
                Ok(ClassifierOutput {
                    labels: labels.to_vec(),
                    scores: labels
                        .iter()
                        .enumerate()
                        .map(|(i, _)| (n - i as f64) / (n * (n + 1.0) / 2.0))
                        .collect(),
                })
            }
            Err(message) => Err(AppError::ClassifierError {
                message: message.clone(),
                status_code: 503,
            }),
        }
    }
}
