//! Theme Scanner CLI
//!
//! Scans a theme root and prints the template/partial classification.
//! Results are cached through the configured store; `--refresh` drops the
//! cache entry first.

use std::path::PathBuf;

use clap::Parser;
use theme_fields::{FieldsConfig, FileStore, ScanCache, ThemeScanner};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fields-scan")]
#[command(about = "Classify theme files into templates and partials")]
struct Cli {
    /// Theme root to scan (defaults to the configured theme)
    #[arg(short = 'r', long)]
    theme: Option<PathBuf>,

    /// Path to a config file
    #[arg(short, long)]
    config: Option<String>,

    /// Print the classification as JSON
    #[arg(long)]
    json: bool,

    /// Drop the cache entry before scanning
    #[arg(long)]
    refresh: bool,
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
    let config = FieldsConfig::load_from(cli.config.as_deref())?;

    let theme_root = cli.theme.unwrap_or_else(|| config.theme_root());
    let identity = theme_root.to_string_lossy().to_string();
    let scanner = ThemeScanner::new();
    let registered = &config.theme.registered_templates;

    let index = if config.cache.enabled {
        let mut store = FileStore::open(&config.store.path)?;
        let mut cache = ScanCache::with_ttl(&mut store, config.cache_ttl());

        if cli.refresh {
            cache.refresh(&identity)?;
        }

        cache.get_or_insert_with(&identity, || scanner.scan_dir(&theme_root, registered))?
    } else {
        scanner.scan_dir(&theme_root, registered)?
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&index)?);
        return Ok(());
    }

    println!("🔍 Theme: {}", theme_root.display());
    println!();
    println!("Templates ({}):", index.templates.len());
    for t in &index.templates {
        println!("  📄 {} ({})", t.file, t.name);
    }
    println!();
    println!("Partials ({}):", index.partials.len());
    for p in &index.partials {
        println!("  🧩 {} ({})", p.file, p.name);
    }

    Ok(())
}
