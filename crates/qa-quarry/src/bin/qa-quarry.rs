//! qa-quarry: extract QA pairs from documents into a dated JSON tree.
//!
//! Usage:
//!   cargo run --bin qa-quarry -- docs/ --recursive
//!   cargo run --bin qa-quarry -- manual.pdf -o results -c 3000

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qa_quarry::config::QuarryConfig;
use qa_quarry::extract::{QaExtractor, DEFAULT_PROMPT};
use qa_quarry::ingest::{collect_files, ChunkSplitter, DocumentReader};
use qa_quarry::llm::OpenAiClient;
use qa_quarry::output::{DocumentReport, OutputWriter, RunSummary};

/// Extract question-answer pairs from documents with an LLM.
#[derive(Parser)]
#[command(name = "qa-quarry", version)]
struct Args {
    /// File or directory to process
    input: PathBuf,

    /// Directory the dated output tree is written under
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum chunk size in characters
    #[arg(short, long)]
    chunk_size: Option<usize>,

    /// Extraction instruction sent with every chunk
    #[arg(short, long)]
    prompt: Option<String>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qa_quarry=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => QuarryConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => QuarryConfig::default(),
    };
    config.llm.apply_env_overrides();

    if let Some(output) = args.output {
        config.output.root = output;
    }
    if let Some(chunk_size) = args.chunk_size {
        config.chunking.max_chunk_size = chunk_size;
    }
    let instruction = args.prompt.unwrap_or_else(|| DEFAULT_PROMPT.to_string());

    let client = OpenAiClient::new(&config.llm)?;

    let files = collect_files(&args.input, args.recursive)?;
    if files.is_empty() {
        bail!("no supported files found in {}", args.input.display());
    }
    println!("Processing {} file(s)...", files.len());

    // inputs keep their layout relative to this base in the output tree
    let base = if args.input.is_file() {
        args.input
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        args.input.clone()
    };

    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    let writer = OutputWriter::new(&config.output.root, &date)?;

    let reader = DocumentReader::new(config.chunking.max_chunk_size)?;
    let splitter = ChunkSplitter::new(config.chunking.max_chunk_size)?;
    let extractor = QaExtractor::new(Arc::new(client), splitter);

    let mut summary = RunSummary::new(&date);
    let mut seen_hashes = HashSet::new();

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    for path in &files {
        progress.set_message(path.display().to_string());

        let document = match reader.read_file(path) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::error!("failed to read {}: {}", path.display(), e);
                progress.inc(1);
                continue;
            }
        };
        let rel_path = document.relative_path(&base).to_path_buf();

        if !seen_hashes.insert(document.content_hash.clone()) {
            tracing::info!("skipping {}: duplicate content", document.file_name);
            progress.inc(1);
            continue;
        }

        let pairs = extractor.extract_document(&document, &instruction).await;
        if pairs.is_empty() {
            tracing::warn!("no QA pairs generated from {}", document.file_name);
            progress.inc(1);
            continue;
        }

        if let Err(e) = writer.write_document(&rel_path, &pairs) {
            tracing::error!("failed to write output for {}: {}", rel_path.display(), e);
            progress.inc(1);
            continue;
        }

        summary.record(DocumentReport {
            file_path: rel_path.display().to_string(),
            chunks: document.chunks.len(),
            qa_pairs: pairs.len(),
        });
        progress.inc(1);
    }
    progress.finish_and_clear();

    if summary.total_documents == 0 {
        bail!("no documents were successfully processed");
    }

    writer.write_summary(&summary)?;

    println!(
        "\nExtracted {} QA pairs from {} document(s).",
        summary.total_qa_pairs, summary.total_documents
    );
    println!("Output written to: {}", writer.run_dir().display());
    print_summary_table(&summary);

    Ok(())
}

fn print_summary_table(summary: &RunSummary) {
    println!("\nSummary:");
    println!("{}", "-".repeat(80));
    println!("{:<50} | {:<10} | {:<10}", "Document", "Chunks", "QA pairs");
    println!("{}", "-".repeat(80));

    for doc in &summary.documents {
        let name = if doc.file_path.chars().count() > 50 {
            let truncated: String = doc.file_path.chars().take(47).collect();
            format!("{}...", truncated)
        } else {
            doc.file_path.clone()
        };
        println!("{:<50} | {:<10} | {:<10}", name, doc.chunks, doc.qa_pairs);
    }

    println!("{}", "-".repeat(80));
    println!(
        "Total: {} document(s), {} QA pairs",
        summary.total_documents, summary.total_qa_pairs
    );
}
