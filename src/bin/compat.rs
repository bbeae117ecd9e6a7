//! Compatibility table CLI
//!
//! Shows, validates, and resolves against compatibility tables, so the
//! persisted table can be kept in lockstep with the CI version matrix.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use schemadoc::{CompatibilityRegistry, Library};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schemadoc-compat")]
#[command(about = "Inspect and validate compatibility tables")]
struct Cli {
    /// Compatibility table (TOML); the built-in table is used when omitted
    #[arg(long)]
    table: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every registered entry
    Show,

    /// Validate the table (span overlap, strategy/library agreement)
    Check,

    /// Resolve the strategy for a library version
    Resolve {
        /// Library name: "validator" or "doctree"
        library: String,
        /// Version to resolve (e.g. "1.8.2")
        version: String,
    },
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
    let registry = match &cli.table {
        Some(path) => CompatibilityRegistry::from_toml_file(path)
            .with_context(|| format!("loading compatibility table {path:?}"))?,
        None => CompatibilityRegistry::builtin(),
    };

    match cli.command {
        Commands::Show => {
            for entry in registry.entries() {
                println!(
                    "{:<10} {:<20} {}",
                    entry.library.to_string(),
                    entry.span.to_string(),
                    entry.strategy.id()
                );
            }
            Ok(())
        }

        Commands::Check => {
            // Construction already validated; getting here means the table
            // loaded cleanly.
            println!(
                "✅ table valid: {} entr{}",
                registry.entries().len(),
                if registry.entries().len() == 1 { "y" } else { "ies" }
            );
            Ok(())
        }

        Commands::Resolve { library, version } => {
            let library = match library.as_str() {
                "validator" => Library::Validator,
                "doctree" => Library::Doctree,
                other => bail!("unknown library '{other}' (expected 'validator' or 'doctree')"),
            };
            let version = schemadoc::version::parse_version(&version)
                .with_context(|| format!("parsing version '{version}'"))?;

            match registry.resolve(library, &version) {
                Ok(strategy) => {
                    println!("✅ {library} {version} -> {}", strategy.id());
                    Ok(())
                }
                Err(err) => {
                    println!("❌ {err}");
                    std::process::exit(1);
                }
            }
        }
    }
}
