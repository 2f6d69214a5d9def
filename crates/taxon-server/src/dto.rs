use serde::{Deserialize, Serialize};

use taxon_core::models::{ClassificationRequest, ClassifyMode};

// ---------------------------------------------------------------------------
// Classify
// ---------------------------------------------------------------------------

/// Wire spelling of the URL resolution mode.
#[derive(Debug, Clone, Copy, Deserialize, utoipa::ToSchema)]
pub enum ModeParam {
    Title,
    ExtractedText,
}

impl From<ModeParam> for ClassifyMode {
    fn from(mode: ModeParam) -> Self {
        match mode {
            ModeParam::Title => ClassifyMode::Title,
            ModeParam::ExtractedText => ClassifyMode::ExtractedText,
        }
    }
}

/// Body of `POST /v1/classify`. Field names keep the legacy wire contract.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ClassifyRequest {
    /// URLs to resolve and classify; each appears as a result key
    #[serde(default)]
    pub url_input: Option<Vec<String>>,
    /// Raw texts to classify under synthetic keys "text0", "text1", ...
    #[serde(default)]
    pub text_input: Option<Vec<String>>,
    /// Resolve URLs to the page title or to the extracted main text
    pub option: ModeParam,
    /// Candidate category labels (unique, at least one)
    pub word_list: Vec<String>,
}

impl From<ClassifyRequest> for ClassificationRequest {
    fn from(body: ClassifyRequest) -> Self {
        Self {
            urls: body.url_input,
            texts: body.text_input,
            mode: body.option.into(),
            labels: body.word_list,
        }
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
