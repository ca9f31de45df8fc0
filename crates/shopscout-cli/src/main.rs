mod report;
mod search;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shopscout")]
#[command(about = "Search Amazon and Flipkart and compare what comes back")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search one or both sites for a product
    Search(SearchArgs),
}

#[derive(Debug, clap::Args)]
pub(crate) struct SearchArgs {
    /// Product to search for; multiple words are joined with spaces
    #[arg(required = true)]
    pub(crate) query: Vec<String>,

    #[arg(long, value_enum, default_value_t = SiteChoice::Both)]
    pub(crate) site: SiteChoice,

    /// Containers to inspect per site (overrides `SHOPSCOUT_MAX_RESULTS`)
    #[arg(long)]
    pub(crate) max_results: Option<usize>,

    /// Fetch attempts per site (overrides `SHOPSCOUT_MAX_RETRIES`)
    #[arg(long)]
    pub(crate) max_retries: Option<u32>,

    /// Seconds between attempts (overrides `SHOPSCOUT_RETRY_DELAY_SECS`)
    #[arg(long)]
    pub(crate) retry_delay: Option<u64>,

    /// Write `<site>_products.json` for each site that returned products
    #[arg(long)]
    pub(crate) save: bool,

    /// Where `--save` writes (overrides `SHOPSCOUT_OUTPUT_DIR`)
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SiteChoice {
    Amazon,
    Flipkart,
    Both,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = shopscout_core::load_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Search(args)) => search::run_search(&config, &args).await?,
        None => println!("nothing to do; try `shopscout search <QUERY>`"),
    }

    Ok(())
}
