use clap::{Parser, Subcommand};
use core_config::{Environment, FromEnv, tracing::init_tracing_with_filter};
use database::postgres::{PostgresConfig, connect_from_config};
use migration::{Migrator, MigratorTrait};

/// Applies or rolls back the task schema.
///
/// Connects with `DATABASE_URL` when set, otherwise with the `DB_*` variables.
#[derive(Debug, Parser)]
#[command(name = "migration", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Command {
    /// Apply pending migrations (default)
    Up {
        /// Apply at most this many
        #[arg(short, long)]
        num: Option<u32>,
    },
    /// Roll back applied migrations
    Down {
        #[arg(short, long, default_value_t = 1)]
        num: u32,
    },
    /// List migrations and whether they are applied
    Status,
    /// Drop all tables, then apply every migration
    Fresh,
    /// Roll back every migration, then apply them again
    Refresh,
    /// Roll back every migration
    Reset,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_filter(&Environment::from_env(), "info");

    let config = PostgresConfig::from_env()?;
    tracing::info!(url = %config.redacted_url(), "Connecting");
    let db = connect_from_config(config).await?;

    match cli.command.unwrap_or(Command::Up { num: None }) {
        Command::Up { num } => Migrator::up(&db, num).await?,
        Command::Down { num } => Migrator::down(&db, Some(num)).await?,
        Command::Status => Migrator::status(&db).await?,
        Command::Fresh => Migrator::fresh(&db).await?,
        Command::Refresh => Migrator::refresh(&db).await?,
        Command::Reset => Migrator::reset(&db).await?,
    }

    db.close().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_up() {
        let cli = Cli::try_parse_from(["migration"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_down_defaults_to_one_step() {
        let cli = Cli::try_parse_from(["migration", "down"]).unwrap();
        assert_eq!(cli.command, Some(Command::Down { num: 1 }));

        let cli = Cli::try_parse_from(["migration", "up", "-n", "2"]).unwrap();
        assert_eq!(cli.command, Some(Command::Up { num: Some(2) }));
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["migration", "generate"]).is_err());
    }
}
