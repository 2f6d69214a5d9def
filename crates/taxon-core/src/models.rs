use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::AppError;

/// Marker stored for items whose sequence could not be resolved.
///
/// A string (rather than a score object) keeps a failed item visibly distinct
/// from a legitimate low-confidence classification.
pub const UNRESOLVED_MARKER: &str = "Unable to extract sequence to classify";

/// How a URL is turned into a classifiable sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassifyMode {
    /// Use the page `<title>` text. Cheap, cached.
    Title,
    /// Use the extracted main-body text. Heavier, uncached.
    ExtractedText,
}

/// A batch classification request.
///
/// At least one of `urls`/`texts` must be non-empty, and `Title` mode
/// requires `urls`; [`ClassificationRequest::validate`] enforces both before
/// any network work starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub urls: Option<Vec<String>>,
    pub texts: Option<Vec<String>>,
    pub mode: ClassifyMode,
    pub labels: Vec<String>,
}

impl ClassificationRequest {
    /// Check the request invariants. Returns `ValidationError` on the first
    /// violation; no partial processing happens for invalid requests.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.url_slice().is_empty() && self.text_slice().is_empty() {
            return Err(AppError::ValidationError(
                "you must provide either urls or texts".to_string(),
            ));
        }

        if self.mode == ClassifyMode::Title && self.url_slice().is_empty() {
            return Err(AppError::ValidationError(
                "Title mode requires urls".to_string(),
            ));
        }

        if self.labels.is_empty() {
            return Err(AppError::ValidationError(
                "you must provide at least one label".to_string(),
            ));
        }

        for (i, label) in self.labels.iter().enumerate() {
            if self.labels[..i].contains(label) {
                return Err(AppError::ValidationError(format!(
                    "duplicate label: {label}"
                )));
            }
        }

        Ok(())
    }

    /// URLs to resolve; `None` and `Some(vec![])` are equivalent.
    pub fn url_slice(&self) -> &[String] {
        self.urls.as_deref().unwrap_or_default()
    }

    /// Raw texts to classify; `None` and `Some(vec![])` are equivalent.
    pub fn text_slice(&self) -> &[String] {
        self.texts.as_deref().unwrap_or_default()
    }
}

/// One resolved batch item: the original identifier plus the sequence to
/// classify. `sequence: None` means resolution failed, as distinct from an
/// empty string, which means the page resolved to nothing classifiable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem {
    pub key: String,
    pub sequence: Option<String>,
}

/// Raw classifier output: labels and scores paired by index, best first
/// according to the model. Callers must not rely on that ordering; use
/// [`ClassifierOutput::best_label`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierOutput {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

impl ClassifierOutput {
    /// The label at the first maximum score. Ties resolve to the earliest
    /// occurrence, so repeated calls pick the same label.
    pub fn best_label(&self) -> Option<&str> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &score) in self.scores.iter().enumerate() {
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((i, score)),
            }
        }
        best.and_then(|(i, _)| self.labels.get(i).map(String::as_str))
    }
}

/// Outcome for a single item.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationOutcome {
    /// The classifier scored the item against every label.
    Scored(ClassifierOutput),
    /// No sequence could be resolved; the item was never classified.
    Unresolved,
}

impl Serialize for ClassificationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ClassificationOutcome::Scored(output) => output.serialize(serializer),
            ClassificationOutcome::Unresolved => serializer.serialize_str(UNRESOLVED_MARKER),
        }
    }
}

/// Outcome paired with its originating key (URL or `text{i}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub key: String,
    pub outcome: ClassificationOutcome,
}

/// The full result set of one request, in input order (URLs first, then
/// texts). Serializes as a JSON object keyed by item, preserving that order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassificationResults(pub Vec<ClassificationResult>);

impl ClassificationResults {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassificationResult> {
        self.0.iter()
    }

    /// Look up an item's outcome by key.
    pub fn get(&self, key: &str) -> Option<&ClassificationOutcome> {
        self.0.iter().find(|r| r.key == key).map(|r| &r.outcome)
    }
}

impl Serialize for ClassificationResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for result in &self.0 {
            map.serialize_entry(&result.key, &result.outcome)?;
        }
        map.end()
    }
}
