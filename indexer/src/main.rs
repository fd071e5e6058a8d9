use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engine::persist::{load_snapshot, save_snapshot};
use engine::{Engine, EngineError, MarkupExtractor, Tokenizer};
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs;
use std::path::Path;

/// One entry of a crawled JSON collection.
#[derive(Debug, Deserialize)]
struct CollectionEntry {
    title: String,
    url: String,
    summary: String,
}

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and inspect tf-idf index snapshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a snapshot from a directory of text files or a JSON collection
    Build {
        /// Input path: a directory of documents, or a collection file with --collection
        #[arg(long)]
        input: String,
        /// Output snapshot path
        #[arg(long, default_value = "./snapshot.json")]
        output: String,
        /// Treat the input as a JSON collection: [{"title", "url", "summary"}, ...]
        #[arg(long, default_value_t = false)]
        collection: bool,
        /// Extract plain text from markup documents before tokenizing
        #[arg(long, default_value_t = false)]
        markup: bool,
        /// Index raw tokens, skipping stopword removal and stemming
        #[arg(long, default_value_t = false)]
        no_stemming: bool,
        /// Export raw counts and leave weighting to a later run
        #[arg(long, default_value_t = false)]
        skip_weighting: bool,
    },
    /// Print statistics for an existing snapshot
    Stats {
        /// Snapshot path
        #[arg(long)]
        snapshot: String,
        /// How many of the most frequent terms to list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

/// Markup collaborator for HTML-ish corpora: parses leniently and keeps the
/// text nodes.
struct HtmlTextExtractor;

impl MarkupExtractor for HtmlTextExtractor {
    fn extract_plain_text(&self, raw: &str) -> Result<String, EngineError> {
        let document = scraper::Html::parse_document(raw);
        let text: Vec<&str> = document.root_element().text().collect();
        Ok(text.join(" "))
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, collection, markup, no_stemming, skip_weighting } => {
            build(&input, &output, collection, markup, no_stemming, skip_weighting)
        }
        Commands::Stats { snapshot, top } => stats(&snapshot, top),
    }
}

fn build(
    input: &str,
    output: &str,
    collection: bool,
    markup: bool,
    no_stemming: bool,
    skip_weighting: bool,
) -> Result<()> {
    let mut tokenizer = Tokenizer::new(!no_stemming);
    if markup {
        tokenizer = tokenizer.with_markup_extractor(Box::new(HtmlTextExtractor));
    }
    let mut engine = Engine::new(tokenizer);

    let ingested = if collection {
        ingest_collection(&mut engine, Path::new(input))?
    } else {
        ingest_directory(&mut engine, Path::new(input))?
    };
    tracing::info!(documents = ingested, terms = engine.vocabulary_size(), "ingestion complete");

    if !skip_weighting {
        engine.compute_weights()?;
    }
    save_snapshot(output, &engine)?;
    tracing::info!(output, "snapshot written");
    Ok(())
}

fn ingest_directory(engine: &mut Engine, dir: &Path) -> Result<usize> {
    let mut ingested = 0;
    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.path().is_file() {
            continue;
        }
        let key = entry.file_name().to_string_lossy().into_owned();
        // A bad file must not sink the rest of the build.
        match fs::read_to_string(entry.path()) {
            Ok(text) => match engine.ingest_document(&key, &text, None) {
                Ok(()) => ingested += 1,
                Err(err) => tracing::warn!(%err, file = %entry.path().display(), "skipping document"),
            },
            Err(err) => {
                tracing::warn!(%err, file = %entry.path().display(), "unreadable document, skipping")
            }
        }
    }
    Ok(ingested)
}

fn ingest_collection(engine: &mut Engine, path: &Path) -> Result<usize> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading collection {}", path.display()))?;
    let entries: Vec<serde_json::Value> =
        serde_json::from_str(&json).context("collection must be a JSON array")?;

    let mut ingested = 0;
    for value in entries {
        match serde_json::from_value::<CollectionEntry>(value) {
            Ok(entry) => {
                match engine.ingest_document(&entry.url, &entry.summary, Some(&entry.title)) {
                    Ok(()) => ingested += 1,
                    Err(err) => tracing::warn!(%err, url = %entry.url, "skipping entry"),
                }
            }
            Err(err) => tracing::warn!(%err, "malformed collection entry, skipping"),
        }
    }
    Ok(ingested)
}

fn stats(snapshot: &str, top: usize) -> Result<()> {
    let engine = load_snapshot(snapshot)?;
    println!("documents:       {}", engine.doc_count());
    println!("word count:      {}", engine.word_count());
    println!("vocabulary size: {}", engine.vocabulary_size());
    let skew = engine.fifteen_percent_vocabulary();
    println!(
        "15% vocabulary:  {} terms cover {} occurrences (threshold {:.1})",
        skew.distinct_terms, skew.covered_count, skew.threshold
    );
    println!("top {top} terms:");
    for (term, count) in engine.top_n(top) {
        println!("  {count:>8}  {term}");
    }
    Ok(())
}
