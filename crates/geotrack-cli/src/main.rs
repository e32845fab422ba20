mod export;
mod report;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "geotrack-cli")]
#[command(about = "GEO tracker reporting from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List completed runs, newest first
    Runs,
    /// Engine metrics, competitors, citations and weakest prompts for a run
    Report {
        /// Run to report on (defaults to the latest completed run)
        #[arg(long)]
        run: Option<String>,
        /// Only show this provider in the engine table
        #[arg(long)]
        provider: Option<String>,
    },
    /// Estimated API spend per provider and model
    Costs {
        /// Run to price (defaults to the latest completed run)
        #[arg(long)]
        run: Option<String>,
    },
    /// Dump one row per response to CSV
    Export {
        /// Run to export (defaults to every run)
        #[arg(long)]
        run: Option<String>,
        /// Output CSV path
        #[arg(short, long, default_value = "export.csv")]
        output: std::path::PathBuf,
    },
    /// Database maintenance and inspection
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database file opens and answers queries
    Ping,
    /// Row counts per table and responses per provider
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = geotrack_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        println!("geotrack-cli: pass --help to list commands");
        return Ok(());
    };

    let pool_config = geotrack_db::PoolConfig::from_app_config(&config);
    let pool = geotrack_db::connect_pool(&config.db_path, pool_config).await?;
    tracing::debug!(db_path = %config.db_path.display(), "opened read-only database");

    match command {
        Commands::Runs => report::run_runs(&pool).await?,
        Commands::Report { run, provider } => {
            report::run_report(&pool, &config, run.as_deref(), provider.as_deref()).await?;
        }
        Commands::Costs { run } => report::run_costs(&pool, run.as_deref()).await?,
        Commands::Export { run, output } => {
            export::run_export(&pool, run.as_deref(), &output).await?;
        }
        Commands::Db { command } => match command {
            DbCommands::Ping => {
                geotrack_db::health_check(&pool).await?;
                println!("database ok: {}", config.db_path.display());
            }
            DbCommands::Stats => report::run_db_stats(&pool).await?,
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests;
