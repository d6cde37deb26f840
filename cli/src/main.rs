//! Command line front end: ask questions about the database in plain
//! English, get SQL results plus semantically similar items.

mod render;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nldb_engine::{EngineConfig, SearchEngine};

#[derive(Parser)]
#[command(name = "nldb", about = "Natural-language database search", version)]
struct Cli {
    /// Path to the SQLite database file.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Directory holding the similarity index files.
    #[arg(long, global = true)]
    index_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database schema.
    Init,

    /// Insert sample data and build the similarity indexes.
    Seed,

    /// Ask a question in plain English.
    Ask {
        /// The question, e.g. "Show me all employees in Sales".
        question: String,

        /// Number of similar items to return.
        #[arg(long, default_value_t = 5)]
        top_k: usize,

        /// Write the query results to a CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

impl Cli {
    fn engine_config(&self, top_k: usize) -> EngineConfig {
        let mut config = EngineConfig::default().with_top_k(top_k);
        if let Some(db) = &self.db {
            config = config.with_db_path(db);
        }
        if let Some(index_dir) = &self.index_dir {
            config = config.with_index_dir(index_dir);
        }
        config
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Single catch-all boundary: anything that goes wrong below surfaces
    // here as one error message.
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Init => {
            let engine = SearchEngine::new(cli.engine_config(5));
            engine.init_database().await?;
            println!(
                "Database ready at {}",
                engine.config().db_path.display()
            );
        }
        Command::Seed => {
            let engine = SearchEngine::new(cli.engine_config(5));
            let batches = engine.seed().await?;
            for batch in &batches {
                println!("Seeded {} {} rows", batch.rows.len(), batch.kind);
            }
            println!(
                "Indexes stored in {}",
                engine.config().index_dir.display()
            );
        }
        Command::Ask {
            question,
            top_k,
            csv,
        } => {
            let engine = SearchEngine::new(cli.engine_config(*top_k));
            let outcome = engine.ask(question).await?;

            println!("SQL: {}", outcome.sql);
            println!();

            if outcome.rows.is_empty() {
                println!("No results found");
            } else {
                println!("Found {} results", outcome.rows.len());
                println!("{}", render::rows_table(&outcome.rows));
            }

            if let Some(path) = csv {
                std::fs::write(path, outcome.rows.to_csv())
                    .with_context(|| format!("writing CSV to {}", path.display()))?;
                println!("Results written to {}", path.display());
            }

            if let Some(similar) = &outcome.similar {
                println!();
                println!("Similar {} (semantic search):", similar.kind);
                for line in render::similar_lines(similar) {
                    println!("  {line}");
                }
            }
        }
    }

    Ok(())
}
