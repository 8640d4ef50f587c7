use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, ValueEnum};
use studynotes_core::{Config, NoteFormat, SourceFormat};

/// Generate study notes from a document with an AI summarizer.
///
/// Reads extracted text from a file or stdin, summarizes it chunk by chunk
/// and renders the result as one or all note formats.
#[derive(Parser, Debug)]
#[command(name = "study-notes", version, about = "Generate study notes from documents")]
pub struct CliArgs {
    /// Input text file (reads stdin when omitted)
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Declared source format: pdf, docx, txt, markdown or pasted
    #[arg(long)]
    pub source_format: Option<SourceFormat>,

    /// Note format: summary, bullet-points, flashcards, qanda, concept-map or all
    #[arg(long, short, env = "STUDYNOTES_FORMAT", default_value = "summary")]
    pub format: FormatArg,

    /// Detail level 1-5 (default from DEFAULT_DETAIL_LEVEL)
    #[arg(long, short)]
    pub detail: Option<i64>,

    /// Config profile (overrides STUDYNOTES_PROFILE)
    #[arg(long, env = "STUDYNOTES_PROFILE")]
    pub profile: Option<String>,

    /// Engine input budget per chunk
    #[arg(long)]
    pub max_input_tokens: Option<usize>,

    /// Tokens shared between adjacent chunks
    #[arg(long)]
    pub overlap_tokens: Option<usize>,

    /// Maximum engine calls in flight
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// How chunk lengths are measured
    #[arg(long, value_enum, default_value_t = TokenizerArg::Words)]
    pub tokenizer: TokenizerArg,

    /// Print artifacts as JSON
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// Apply command-line overrides on top of the env-derived config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(max) = self.max_input_tokens {
            config.chunking.max_input_tokens = max;
        }
        if let Some(overlap) = self.overlap_tokens {
            config.chunking.overlap_tokens = overlap;
        }
        if let Some(concurrency) = self.concurrency {
            config.pipeline.concurrency = concurrency;
        }
        if let Some(detail) = self.detail {
            config.pipeline.default_detail_level = detail;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TokenizerArg {
    /// Whitespace-separated words
    Words,
    /// Sub-word estimate, about four characters per token
    Bpe,
}

/// One note format or every format from a single synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    One(NoteFormat),
    All,
}

impl FormatArg {
    pub fn formats(self) -> Vec<NoteFormat> {
        match self {
            FormatArg::One(format) => vec![format],
            FormatArg::All => NoteFormat::ALL.to_vec(),
        }
    }
}

impl FromStr for FormatArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "all-formats" => Ok(FormatArg::All),
            other => other.parse().map(FormatArg::One),
        }
    }
}
