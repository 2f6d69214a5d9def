use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use taxon_client::{
    DEFAULT_INFERENCE_URL, DEFAULT_MODEL, DocTitleParser, MainTextExtractor, PageFetcher,
    ZeroShotClassifier,
};
use taxon_core::models::{ClassificationOutcome, ClassificationRequest, ClassifyMode};
use taxon_core::{ClassifyService, TitleCache, UNRESOLVED_MARKER};

#[derive(Parser)]
#[command(name = "taxon", version, about = "Zero-shot web content classifier")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Classify the page title
    Title,
    /// Classify the extracted main text
    ExtractedText,
}

impl From<ModeArg> for ClassifyMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Title => ClassifyMode::Title,
            ModeArg::ExtractedText => ClassifyMode::ExtractedText,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Classify URLs and/or raw texts into categories
    Classify {
        /// Page URL to classify (repeatable)
        #[arg(short, long = "url")]
        urls: Vec<String>,

        /// Raw text to classify (repeatable)
        #[arg(short, long = "text")]
        texts: Vec<String>,

        /// How URLs are resolved to classifiable text
        #[arg(short, long, value_enum, default_value_t = ModeArg::Title)]
        mode: ModeArg,

        /// Comma-separated category labels
        #[arg(short, long)]
        labels: String,

        /// Zero-shot model identifier
        #[arg(long, env = "TAXON_CLASSIFIER_MODEL", default_value = DEFAULT_MODEL)]
        model: String,

        /// Inference API base URL
        #[arg(long, env = "TAXON_CLASSIFIER_URL", default_value = DEFAULT_INFERENCE_URL)]
        base_url: String,

        /// Inference API token
        #[arg(long, env = "TAXON_CLASSIFIER_TOKEN")]
        token: Option<String>,

        /// Emit a key,category CSV summary instead of the full JSON result
        #[arg(long, default_value_t = false)]
        csv: bool,

        /// Allow fetching loopback/private hosts
        #[arg(long, default_value_t = false)]
        allow_private: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Setup tracing; stdout is reserved for results
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("taxon=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify {
            urls,
            texts,
            mode,
            labels,
            model,
            base_url,
            token,
            csv,
            allow_private,
        } => {
            let request = ClassificationRequest {
                urls: (!urls.is_empty()).then_some(urls),
                texts: (!texts.is_empty()).then_some(texts),
                mode: mode.into(),
                labels: parse_labels(&labels),
            };
            cmd_classify(request, &model, &base_url, token, csv, allow_private).await
        }
    }
}

/// Split a comma-separated label list, trimming and dropping empties.
fn parse_labels(labels: &str) -> Vec<String> {
    labels
        .split(',')
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect()
}

async fn cmd_classify(
    request: ClassificationRequest,
    model: &str,
    base_url: &str,
    token: Option<String>,
    csv: bool,
    allow_private: bool,
) -> Result<()> {
    let fetcher = PageFetcher::new().context("Failed to create HTTP client")?;
    let fetcher = if allow_private {
        fetcher.allow_private_hosts()
    } else {
        fetcher
    };

    let classifier = ZeroShotClassifier::with_config(base_url, model, token)
        .context("Failed to create classifier client")?;

    let service = ClassifyService::new(
        fetcher,
        DocTitleParser,
        MainTextExtractor::new(),
        classifier,
        Arc::new(TitleCache::default()),
    );

    tracing::info!(
        "Classifying {} items into {} categories with {model}",
        request.url_slice().len() + request.text_slice().len(),
        request.labels.len()
    );

    let results = service
        .classify(&request)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    if csv {
        let mut writer = csv::Writer::from_writer(io::stdout());
        writer.write_record(["key", "category"])?;
        for result in results.iter() {
            let category = match &result.outcome {
                ClassificationOutcome::Scored(output) => {
                    output.best_label().unwrap_or_default().to_string()
                }
                ClassificationOutcome::Unresolved => UNRESOLVED_MARKER.to_string(),
            };
            writer.write_record([result.key.as_str(), category.as_str()])?;
        }
        writer.flush()?;
    } else {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    Ok(())
}
