//! Taskboard
//!
//! Terminal frontend for the task management API: list, inspect, create,
//! edit and delete tasks.

use clap::{Parser, Subcommand};
use core_config::FromEnv;
use core_config::tracing::{init_tracing_with_filter, install_color_eyre};
use eyre::Result;
use std::process::ExitCode;
use tasks_client::{TaskApiClient, TaskStore};
use tracing::debug;

mod config;
mod routes;
mod views;

use config::Config;
use routes::{FormArgs, ListArgs};

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Manage tasks from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tasks with optional filters
    List(ListArgs),

    /// Show one task
    Show { id: String },

    /// Create a task
    New(FormArgs),

    /// Edit a task; only the given fields change
    Edit {
        id: String,
        #[command(flatten)]
        form: FormArgs,
    },

    /// Delete a task
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    install_color_eyre();

    let config = Config::from_env()?;
    // Quiet unless RUST_LOG says otherwise; stdout is reserved for views
    init_tracing_with_filter(&config.environment, "warn");

    let cli = Cli::parse();

    debug!(api_url = %config.api_url, "Using tasks API");
    let client = TaskApiClient::new(config.api_url.clone())
        .map_err(|e| eyre::eyre!("Failed to build HTTP client: {}", e))?;
    let store = TaskStore::new(client);

    let screen = match cli.command {
        Commands::List(args) => routes::list(&store, args).await,
        Commands::Show { id } => routes::show(&store, &id).await,
        Commands::New(form) => routes::new_task(&store, form).await,
        Commands::Edit { id, form } => routes::edit(&store, &id, form).await,
        Commands::Delete { id } => routes::delete(&store, &id).await,
    };

    println!("{}", screen.output);

    Ok(if screen.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
