//! `annotdb-render`: loads schemas and cells from a JSON document and prints
//! each cell in canonical and/or diagnostic form.
//!
//! **Usage:**
//! ```text
//! annotdb-render --input <doc.json> [--config <client.toml>] [--form canonical|diagnostic|both]
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;

use annotdb_clients::config::{ClientConfig, OutputForm};
use annotdb_clients::document::Document;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Render annotdb cells.
#[derive(Parser)]
#[command(
    name = "annotdb-render",
    about = "Render annotdb cells in canonical and diagnostic form"
)]
struct Args {
    /// JSON document with schemas and cells.
    #[arg(long)]
    input: PathBuf,

    /// Optional TOML client configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Forms to print; overrides the configuration file.
    #[arg(long, value_enum)]
    form: Option<OutputForm>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    let form = args.form.unwrap_or(config.output.form);
    debug!(?form, input = %args.input.display(), "rendering");

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read input: {}", args.input.display()))?;
    let loaded = Document::from_json(&text)
        .and_then(|doc| doc.load(config.database.clone()))
        .with_context(|| format!("In document {}", args.input.display()))?;

    for cell in &loaded.cells {
        match form {
            OutputForm::Canonical => println!("{}", cell.to_canonical()),
            OutputForm::Diagnostic => println!("{}", cell.to_diagnostic()),
            OutputForm::Both => {
                println!("{}", cell.to_canonical());
                println!("{}", cell.to_diagnostic());
            }
        }
    }
    Ok(())
}
