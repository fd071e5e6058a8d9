use anyhow::{bail, Context, Result};
use clap::Parser;
use engine::persist::load_snapshot;
use engine::Engine;
use tracing_subscriber::{fmt, EnvFilter};

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "console")]
#[command(about = "Query an index snapshot interactively or in batch", long_about = None)]
struct Args {
    /// Snapshot to load
    #[arg(long)]
    snapshot: String,
    /// Batch mode: file with one query per line
    #[arg(long)]
    queries: Option<PathBuf>,
    /// Batch mode output path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let engine = load_snapshot(&args.snapshot)
        .with_context(|| format!("loading snapshot {}", args.snapshot))?;
    if !engine.is_weighted() {
        bail!("snapshot holds raw counts; rebuild it without --skip-weighting first");
    }

    match args.queries {
        Some(path) => batch(&engine, &path, args.output.as_deref()),
        None => interactive(&engine),
    }
}

/// Runs every query in the file and emits the query-to-results mapping as
/// JSON, for offline evaluation.
fn batch(engine: &Engine, queries_path: &Path, output: Option<&Path>) -> Result<()> {
    let text = fs::read_to_string(queries_path)
        .with_context(|| format!("reading queries from {}", queries_path.display()))?;
    let queries: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    let results = engine.process_queries(&queries)?;
    let json = serde_json::to_string_pretty(&results)?;
    match output {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

fn interactive(engine: &Engine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("query> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() || query == "exit" {
            break;
        }

        for hit in engine.process_query(query)? {
            match &hit.title {
                Some(title) => println!("{:>8.4}  {title}  {}", hit.score, hit.key),
                None => println!("{:>8.4}  {}", hit.score, hit.key),
            }
        }
        println!();
    }
    Ok(())
}
