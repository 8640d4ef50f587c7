mod cli;
mod output;

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use studynotes_compute::StudyNotesPipeline;
use studynotes_core::config::load_dotenv;
use studynotes_core::{Config, SourceFormat};
use studynotes_ingest::{ApproxBpeTokenCounter, Document, TokenCounter, WhitespaceTokenCounter};
use studynotes_llm::ChatSummarizer;

use crate::cli::{CliArgs, TokenizerArg};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let args = CliArgs::parse();

    let mut config = match &args.profile {
        Some(profile) => Config::for_profile(profile),
        None => Config::from_env(),
    };
    args.apply_overrides(&mut config);
    config.log_summary();

    let document = read_document(&args)?;
    let stats = document.stats();
    info!(
        characters = stats.characters,
        words = stats.words,
        reading_minutes = stats.reading_minutes,
        "document loaded"
    );
    if matches!(document.source(), SourceFormat::Pdf | SourceFormat::Docx) {
        warn!(
            source = %document.source(),
            "input is read as text; extract PDF and DOCX content before passing it in"
        );
    }

    if !config.engine.is_configured() {
        warn!(provider = %config.engine.provider, "engine credentials missing, calls will fail");
    }
    let summarizer =
        ChatSummarizer::from_config(&config.engine).context("failed to create summarization engine")?;
    let counter: Arc<dyn TokenCounter> = match args.tokenizer {
        TokenizerArg::Words => Arc::new(WhitespaceTokenCounter),
        TokenizerArg::Bpe => Arc::new(ApproxBpeTokenCounter::default()),
    };
    let pipeline = StudyNotesPipeline::from_config(Arc::new(summarizer), counter, &config);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    let formats = args.format.formats();
    let artifacts = pipeline
        .generate_all(
            &document,
            &formats,
            config.pipeline.default_detail_level,
            cancel,
        )
        .await
        .context("failed to generate study notes")?;

    if args.json {
        let json = serde_json::to_string_pretty(&artifacts).context("failed to encode artifacts")?;
        println!("{json}");
    } else {
        for artifact in &artifacts {
            println!("{}", output::format_artifact(artifact));
        }
    }
    Ok(())
}

/// Read the input file or stdin into a document.
fn read_document(args: &CliArgs) -> Result<Document> {
    let document = match &args.input {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Document::from_bytes(&bytes, &path.display().to_string())
        }
        None => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
            Document::from_bytes(&bytes, "stdin").with_source(SourceFormat::Pasted)
        }
    };
    Ok(match args.source_format {
        Some(source) => document.with_source(source),
        None => document,
    })
}
