//! Export / Import CLI
//!
//! Moves persisted schemas and data objects in and out of the store as
//! versioned JSON envelopes.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use theme_fields::{
    export::{export_data_objects, export_schemas, import_data_objects, import_schemas},
    Envelope, ExportKind, FieldsConfig, FileStore,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fields-export")]
#[command(about = "Export and import field data as JSON envelopes")]
struct Cli {
    /// Path to a config file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export all template schemas plus the global schema
    Schemas {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export all data objects
    Data {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import an envelope file into the store
    Import {
        /// Envelope file to apply
        input: PathBuf,
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
    let config = FieldsConfig::load_from(cli.config.as_deref())?;
    let mut store = FileStore::open(&config.store.path)?;

    match cli.command {
        Commands::Schemas { output } => {
            let envelope = export_schemas(&mut store, &config.export.site_url);
            write_envelope(&envelope, output, config.export.pretty)
        }

        Commands::Data { output } => {
            let envelope = export_data_objects(&mut store, &config.export.site_url)?;
            write_envelope(&envelope, output, config.export.pretty)
        }

        Commands::Import { input } => {
            let text = std::fs::read_to_string(&input)?;
            let envelope = Envelope::from_json(&text)?;

            let written = match envelope.kind {
                ExportKind::Schemas => import_schemas(&mut store, &envelope)?,
                ExportKind::DataObjects => import_data_objects(&mut store, &envelope)?,
            };

            println!("✅ Imported {} record(s) from {}", written, input.display());
            Ok(())
        }
    }
}

fn write_envelope(
    envelope: &Envelope,
    output: Option<PathBuf>,
    pretty: bool,
) -> anyhow::Result<()> {
    let text = if pretty {
        envelope.to_json_pretty()?
    } else {
        serde_json::to_string(envelope)?
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &text)?;
            println!("✅ Envelope written to {}", path.display());
        }
        None => println!("{}", text),
    }

    Ok(())
}
