mod report;
mod run;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::report::DEFAULT_OUTPUT_DIR;

#[derive(Debug, Parser)]
#[command(name = "cybernews")]
#[command(about = "Security news aggregator with a daily SOC-ready digest")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Ingest all sources, enrich the window, and write the markdown report
    Run(RunArgs),
    /// List the configured sources
    Sources,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct RunArgs {
    /// Time window such as 24h, 48h or 7d
    #[arg(long, default_value = "24h")]
    pub since: String,

    /// Directory the report is written to
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Maximum number of articles in the report
    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u16).range(1..=200))]
    pub limit: u16,

    /// Keep articles in memory instead of PostgreSQL
    #[arg(long)]
    pub in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = cybernews_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Run(args)) => run::run_pipeline(&config, &args).await?,
        Some(Commands::Sources) => run::list_sources(&config)?,
        None => println!("nothing to do; try `cybernews run --help`"),
    }

    Ok(())
}
