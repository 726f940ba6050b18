mod collect;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "harvest-cli")]
#[command(about = "Catalog attribute harvester")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Discover every catalog item, scrape its attributes, and write the CSV
    Collect {
        /// Site definition file (defaults to HARVEST_SITE_PATH)
        #[arg(long)]
        site: Option<PathBuf>,
        /// Output CSV path (defaults to the site's output_path)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Load and validate a site definition without opening a browser
    CheckSite {
        #[arg(long)]
        site: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse first so --help and usage errors never depend on env config.
    let cli = Cli::parse();

    let config = harvest_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Collect { site, output } => {
            collect::run_collect(&config, site.as_deref(), output.as_deref()).await?;
        }
        Commands::CheckSite { site } => {
            collect::run_check_site(&config, site.as_deref())?;
        }
    }

    Ok(())
}
