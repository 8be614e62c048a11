//! mccq CLI
//!
//! Minecraft command query. Inspired by the in-game help command, with added
//! features like multiple version support and expandable regex search:
//! - `mccq` / `mccq repl`: interactive shell with tab completion
//! - `mccq query <query...>`: run one query and exit

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use mccq_query::{QueryArguments, QueryEngine};
use mccq_storage::VersionRegistry;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

mod config;
mod repl;

use config::Settings;

#[derive(Parser)]
#[command(name = "mccq")]
#[command(
    author,
    version,
    about = "Minecraft command query: search command signatures across game versions"
)]
struct Cli {
    #[command(flatten)]
    startup: StartupArgs,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Args)]
pub struct StartupArgs {
    /// Where versions are loaded from (directory, file:// or http(s):// URI)
    #[arg(short = 'd', long, value_name = "URI")]
    pub database_uri: Option<String>,

    /// Version(s) to query by default (repeatable)
    #[arg(short = 's', long = "show-version", value_name = "VERSION")]
    pub show_versions: Vec<String>,

    /// Only allow these versions to be loaded (repeatable)
    #[arg(short = 'w', long, value_name = "VERSION")]
    pub whitelist: Vec<String>,

    /// Force a loader (`file`, `http`, `https`) instead of picking one by URI scheme
    #[arg(long, value_name = "KEY")]
    pub loader: Option<String>,

    /// Grammar parser to use (`v1`)
    #[arg(long, value_name = "KEY")]
    pub parser: Option<String>,

    /// Log level or filter directive (`RUST_LOG` takes precedence)
    #[arg(short = 'l', long, value_name = "LEVEL")]
    pub log: Option<String>,

    /// JSON file with defaults for the options above
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive shell (the default)
    Repl,

    /// Run a single query and print the results
    ///
    /// Query flags (`-t`, `-e`, `-c N`, `-v VERSION`) go after `--`:
    /// `mccq query -- -t -v 1.13 tag . add`
    Query {
        /// Print results as JSON
        #[arg(long)]
        json: bool,

        #[arg(
            value_name = "QUERY",
            required = true,
            trailing_var_arg = true,
            allow_hyphen_values = true
        )]
        query: Vec<String>,
    },
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::resolve(&cli.startup)?;
    init_tracing(&settings.log);
    tracing::debug!(?settings, "resolved settings");

    let registry = VersionRegistry::new(settings.registry_config())
        .context("failed to set up the version registry")?;
    let engine = QueryEngine::new(registry, settings.show_versions.clone());

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => repl::cmd_repl(Arc::new(engine)),
        Commands::Query { json, query } => cmd_query(&engine, &query, json),
    }
}

fn cmd_query(engine: &QueryEngine, words: &[String], json: bool) -> Result<()> {
    let args = QueryArguments::from_words(words)?;
    let results = engine.results_from_arguments(&args)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        repl::print_results(&mut io::stdout().lock(), &results)?;
    }
    Ok(())
}
