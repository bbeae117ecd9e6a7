//! Schemadoc render CLI
//!
//! Documents model documents from disk under a given version pair and
//! prints the rendered node trees as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use schemadoc::{
    CompatibilityRegistry, DocConfig, HostEnvironment, ModelIndex, ModelReference,
    SchemaDocumenter,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schemadoc-render")]
#[command(about = "Render model schemas as documentation nodes")]
struct Cli {
    /// Reported validation-library version (e.g. "1.8.2")
    #[arg(long)]
    validator_version: String,

    /// Reported documentation-framework version (e.g. "4.0")
    #[arg(long)]
    doctree_version: String,

    /// Compatibility table (TOML); the built-in table is used when omitted
    #[arg(long)]
    compat: Option<PathBuf>,

    /// Config file with render options
    #[arg(short, long)]
    config: Option<String>,

    /// Compact JSON output
    #[arg(long)]
    compact: bool,

    /// Model document files: JSON with "qualified_name" and "document"
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = DocConfig::load_from(cli.config.as_deref())?;

    let table_path = cli.compat.or(config.compat.table);
    let registry = match table_path {
        Some(path) => CompatibilityRegistry::from_toml_file(&path)
            .with_context(|| format!("loading compatibility table {path:?}"))?,
        None => CompatibilityRegistry::builtin(),
    };

    let env = HostEnvironment::new(&cli.validator_version, &cli.doctree_version);
    let documenter = SchemaDocumenter::with_registry(&env, &registry, config.options)?;

    let mut index = ModelIndex::new();
    for path in &cli.files {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading model document {path:?}"))?;
        let model: ModelReference = serde_json::from_str(&raw)
            .with_context(|| format!("parsing model document {path:?}"))?;
        index.insert(model);
    }

    let outcome = documenter.document_all(&index)?;

    for warning in &outcome.warnings {
        eprintln!("⚠️  {} - {}", warning.model, warning.message);
    }

    let rendered = if cli.compact {
        serde_json::to_string(&outcome.sections)?
    } else {
        serde_json::to_string_pretty(&outcome.sections)?
    };
    println!("{rendered}");

    if outcome.warnings.is_empty() {
        eprintln!("✅ documented {} model(s)", outcome.sections.len());
    } else {
        eprintln!(
            "⚠️  documented {} model(s), skipped {}",
            outcome.sections.len(),
            outcome.warnings.len()
        );
    }

    Ok(())
}
