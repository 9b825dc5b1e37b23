use crate::{
    commands::{Commands, DocumentSource},
    env::EnvManager,
    error::CliError,
};
use clap::Parser;
use planner::{Document, PlannerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod env;
mod error;

#[derive(Parser)]
#[command(
    name = "qframe",
    version = "0.1.0",
    about = "Validate query documents and render them to SQL"
)]
struct Cli {
    #[arg(long, global = true, help = "Load QFRAME_* settings from this .env file")]
    env_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), CliError> {
    // Initialize logger; RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut env = EnvManager::new();
    if let Some(path) = &cli.env_file {
        env.load_from_file(path)?;
    }
    let config = env.planner_config()?;

    match cli.command {
        Commands::Validate { source } => {
            let doc = load_document(&source, &env)?;
            doc.validate()?;
            info!("Document {} is valid", describe(&source));
            println!(
                "valid {} document with {} output columns",
                doc.shape(),
                doc.get_output_aliases()?.len()
            );
        }
        Commands::Render { source, compact } => {
            let doc = load_document(&source, &env)?;
            let config = if compact {
                PlannerConfig {
                    pretty: false,
                    ..config
                }
            } else {
                config
            };
            println!("{}", doc.get_sql_with(&config)?);
        }
        Commands::Columns { source } => {
            let doc = load_document(&source, &env)?;
            let columns = doc.get_output_columns_with(&config)?;
            println!("{}", serde_json::to_string_pretty(&columns)?);
        }
        Commands::Count { source } => {
            let doc = load_document(&source, &env)?;
            println!("{}", doc.count_sql_with(&config)?);
        }
    }

    Ok(())
}

fn load_document(source: &DocumentSource, env: &EnvManager) -> Result<Document, CliError> {
    info!("Loading document {}", describe(source));

    let doc = match &source.name {
        Some(name) => Document::read_json(&source.doc, name)?,
        None => {
            let text = std::fs::read_to_string(&source.doc)?;
            Document::from_json_str(&text)?
        }
    };

    Ok(match env.engine() {
        Some(engine) => doc.with_engine(engine),
        None => doc,
    })
}

fn describe(source: &DocumentSource) -> String {
    match &source.name {
        Some(name) => format!("'{}' from {}", name, source.doc),
        None => source.doc.clone(),
    }
}
