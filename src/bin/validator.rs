//! Schema Validator CLI
//!
//! Validates YAML field schemas, singly or across a directory.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use theme_fields::validate;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "fields-validator")]
#[command(about = "Validate YAML field schemas")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a single schema file
    File {
        /// Path to the schema file
        path: PathBuf,
        /// Template the schema is attached to (enables the info-field check)
        #[arg(short, long)]
        template: Option<String>,
    },

    /// Validate every .yml/.yaml schema under a directory
    Dir {
        /// Directory to scan
        path: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::File { path, template } => {
            if !validate_file(&path, template.as_deref())? {
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Dir { path } => {
            let mut all_valid = true;
            let mut checked = 0usize;

            for entry in WalkDir::new(&path).into_iter().filter_map(|e| e.ok()) {
                let file = entry.path();
                if !file.is_file() {
                    continue;
                }
                let is_yaml = file
                    .extension()
                    .map(|e| e == "yml" || e == "yaml")
                    .unwrap_or(false);
                if !is_yaml {
                    continue;
                }

                checked += 1;
                if !validate_file(file, None)? {
                    all_valid = false;
                }
            }

            println!();
            if all_valid {
                println!("✅ {} schema(s) valid", checked);
            } else {
                println!("❌ Validation failed");
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn validate_file(path: &Path, template: Option<&str>) -> anyhow::Result<bool> {
    let yaml = std::fs::read_to_string(path)?;
    let outcome = validate(&yaml, template);

    if outcome.valid {
        println!("✅ {} - {}", path.display(), outcome.message);
    } else {
        println!("❌ {} - {}", path.display(), outcome.message);
    }

    Ok(outcome.valid)
}
