//! Command-line driver for the example service.
//!
//! # Responsibility
//! - Load config, start logging and open the configured store.
//! - Run one REST operation per invocation and print its envelope as JSON.
//!
//! Exits non-zero when the envelope carries an error status.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use mstemplate_api::{ExamplePayload, ExampleRestApi, Response};
use mstemplate_core::db::{open_db, open_db_in_memory};
use mstemplate_core::{
    default_log_level, init_logging, init_logging_from_config, read_config, AppConfig,
    ExampleDataService, ExampleId, InMemoryExampleDataService, SqliteExampleDataService,
    StoreConfig, StoreKind, SystemClock,
};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "mstemplate", version)]
#[command(about = "Manage examples through the REST adapter")]
struct Cli {
    /// YAML config file; defaults to an in-memory store
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log directory used when the config has no `logging` section
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List examples
    List {
        /// Only examples that were not deactivated
        #[arg(long)]
        active: bool,
    },

    /// Show one example
    Get { id: ExampleId },

    /// Create an example
    Create {
        name: String,
        #[arg(long)]
        useful: bool,
    },

    /// Replace name and flag of an example
    Update {
        id: ExampleId,
        name: String,
        #[arg(long)]
        useful: bool,
    },

    /// Update selected properties from a JSON object, e.g. '{"useful":true}'
    Patch { id: ExampleId, properties: String },

    /// Remove an example permanently
    Delete { id: ExampleId },

    /// Mark an example inactive
    Deactivate { id: ExampleId },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match (&config.logging, &cli.log_dir) {
        (Some(logging), _) => {
            init_logging_from_config(logging).context("failed to start logging")?
        }
        (None, Some(dir)) => {
            init_logging(default_log_level(), dir).context("failed to start logging")?
        }
        (None, None) => {}
    }
    info!(
        "event=store_open module=cli status=start type={:?} endpoint={}",
        config.store_config.kind,
        config.store_config.endpoint().as_deref().unwrap_or("-")
    );

    let response = match config.store_config.kind {
        StoreKind::Sqlite => {
            let conn = match &config.store_config.path {
                Some(path) => open_db(path)
                    .with_context(|| format!("failed to open database `{}`", path.display()))?,
                None => open_db_in_memory().context("failed to open in-memory database")?,
            };
            let store = SqliteExampleDataService::try_new(&conn)?;
            run(store, &cli.command)?
        }
        StoreKind::Memory => run(InMemoryExampleDataService::new(), &cli.command)?,
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    if let Some(location) = response.location() {
        eprintln!("location: {location}");
    }

    Ok(exit_code(&response))
}

fn exit_code(response: &Response) -> ExitCode {
    if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => Ok(read_config(path)?),
        None => Ok(AppConfig {
            store_config: StoreConfig {
                kind: StoreKind::Memory,
                host: None,
                port: None,
                path: None,
            },
            logging: None,
        }),
    }
}

fn run<D: ExampleDataService + Clone>(store: D, command: &Command) -> Result<Response> {
    let api = ExampleRestApi::new(store, SystemClock);

    let response = match command {
        Command::List { active: false } => api.get(),
        Command::List { active: true } => api.get_active(),
        Command::Get { id } => api.get_by_id(*id),
        Command::Create { name, useful } => api.create(&ExamplePayload {
            name: name.clone(),
            useful: *useful,
        }),
        Command::Update { id, name, useful } => api.update(
            *id,
            &ExamplePayload {
                name: name.clone(),
                useful: *useful,
            },
        ),
        Command::Patch { id, properties } => {
            let properties: Map<String, Value> = serde_json::from_str(properties)
                .context("properties must be a JSON object")?;
            api.partial_update(*id, &properties)
        }
        Command::Delete { id } => api.delete(*id),
        Command::Deactivate { id } => api.deactivate(*id),
    };

    info!(
        "event=cli_command module=cli status={} code={}",
        if response.is_success() { "ok" } else { "error" },
        response.status.as_u16()
    );
    Ok(response)
}
