use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use taxon_core::error::AppError;
use taxon_core::models::ClassifierOutput;
use taxon_core::traits::Classifier;

/// Default hosted inference endpoint (Hugging Face wire format).
pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";

/// Default multilingual NLI model for zero-shot classification.
pub const DEFAULT_MODEL: &str = "MoritzLaurer/mDeBERTa-v3-base-mnli-xnli";

const DEFAULT_CLASSIFY_TIMEOUT: Duration = Duration::from_secs(60);

/// Zero-shot classification client for Hugging Face-style inference APIs.
///
/// Sends a sequence plus candidate labels and receives parallel
/// label/score arrays. Works against the hosted inference API or any
/// self-hosted endpoint speaking the same format.
#[derive(Clone)]
pub struct ZeroShotClassifier {
    client: Client,
    base_url: String,
    model: String,
    token: Option<String>,
    timeout_secs: u64,
}

impl ZeroShotClassifier {
    /// Client for the default endpoint and model, unauthenticated.
    pub fn new() -> Result<Self, AppError> {
        Self::build(DEFAULT_INFERENCE_URL, DEFAULT_MODEL, None, DEFAULT_CLASSIFY_TIMEOUT)
    }

    pub fn with_config(
        base_url: &str,
        model: &str,
        token: Option<String>,
    ) -> Result<Self, AppError> {
        Self::build(base_url, model, token, DEFAULT_CLASSIFY_TIMEOUT)
    }

    pub fn with_timeout(self, timeout: Duration) -> Result<Self, AppError> {
        Self::build(&self.base_url, &self.model, self.token, timeout)
    }

    fn build(
        base_url: &str,
        model: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            token,
            timeout_secs: timeout.as_secs(),
        })
    }
}

// ---- Inference API types ----

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters<'a>,
}

#[derive(Serialize)]
struct InferenceParameters<'a> {
    candidate_labels: &'a [String],
    multi_label: bool,
}

#[derive(Deserialize)]
struct InferenceResponse {
    labels: Vec<String>,
    scores: Vec<f64>,
}

#[derive(Deserialize)]
struct ApiError {
    error: String,
}

impl Classifier for ZeroShotClassifier {
    async fn classify(
        &self,
        sequence: &str,
        labels: &[String],
        single_label: bool,
    ) -> Result<ClassifierOutput, AppError> {
        let url = format!("{}/{}", self.base_url, self.model);
        let body = InferenceRequest {
            inputs: sequence,
            parameters: InferenceParameters {
                candidate_labels: labels,
                multi_label: !single_label,
            },
        };

        tracing::debug!(
            model = %self.model,
            sequence_chars = sequence.len(),
            label_count = labels.len(),
            "classifying sequence"
        );

        let mut request = self.client.post(&url).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let raw = response.text().await.unwrap_or_default();

            if status_code == 429 {
                return Err(AppError::RateLimitExceeded);
            }

            let message = serde_json::from_str::<ApiError>(&raw)
                .map(|e| e.error)
                .unwrap_or_else(|_| format!("HTTP {status_code}: {raw}"));

            return Err(AppError::ClassifierError {
                message,
                status_code,
            });
        }

        let output: InferenceResponse = response.json().await.map_err(|e| {
            AppError::ClassifierError {
                message: format!("Failed to parse classifier response: {e}"),
                status_code: status.as_u16(),
            }
        })?;

        if output.labels.len() != output.scores.len() {
            return Err(AppError::ClassifierError {
                message: format!(
                    "classifier returned {} labels but {} scores",
                    output.labels.len(),
                    output.scores.len()
                ),
                status_code: status.as_u16(),
            });
        }

        Ok(ClassifierOutput {
            labels: output.labels,
            scores: output.scores,
        })
    }
}
