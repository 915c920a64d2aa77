//! deed-harvest - record extraction and fuzzy matching for county tax-deed
//! auction captures.

use anyhow::Result;
use clap::{Parser, Subcommand};
use deed_harvest::commands::{ParseCommand, RankCommand};
use deed_harvest::config::{Config, OutputFormat};
use deed_harvest::matching;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "deed-harvest",
    version,
    about = "Record extraction and fuzzy matching for county tax-deed auction captures",
    long_about = "Parses saved auction-results pages into sold-with-surplus records and \
                  ranks scraped candidates against a query address or parcel number. \
                  Fetching pages is someone else's job; this tool only reads captures."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract sold records from a captured results page
    #[command(alias = "p")]
    Parse {
        /// HTML or plain-text capture file
        file: PathBuf,

        /// CSS selector isolating listing blocks (plain-text paragraphs
        /// otherwise)
        #[arg(short, long, env = "DEED_BLOCK_SELECTOR")]
        selector: Option<String>,

        /// Minimum assessed-minus-sale surplus
        #[arg(long, env = "DEED_MIN_SURPLUS")]
        min_surplus: Option<f64>,

        /// Keep only records meeting the surplus threshold
        #[arg(short, long)]
        qualified: bool,
    },

    /// Rank candidate rows against a query address or parcel number
    #[command(alias = "r")]
    Rank {
        /// Query string (address or numeric identifier)
        query: String,

        /// File with one candidate per line
        file: PathBuf,

        /// Minimum similarity for acceptance
        #[arg(long, env = "DEED_MIN_SIMILARITY")]
        min_similarity: Option<f64>,

        /// Show only the N best candidates (0 = all)
        #[arg(short, long, default_value = "0")]
        top: usize,
    },

    /// Print the comparison key a string normalizes to
    #[command(alias = "n")]
    Normalize {
        /// Text to normalize
        text: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();
    config.format = cli.format;

    match cli.command {
        Commands::Parse { file, selector, min_surplus, qualified } => {
            if let Some(surplus) = min_surplus {
                config.min_surplus = surplus;
            }
            if selector.is_some() {
                config.block_selector = selector;
            }
            config.validate()?;

            let cmd = ParseCommand::new(config);
            let output = cmd.execute(&file, qualified)?;
            println!("{}", output);
        }

        Commands::Rank { query, file, min_similarity, top } => {
            if let Some(similarity) = min_similarity {
                config.min_similarity = similarity;
            }
            config.validate()?;

            let cmd = RankCommand::new(config);
            let output = cmd.execute(&query, &file, top)?;
            println!("{}", output);
        }

        Commands::Normalize { text } => {
            println!("{}", matching::normalize(&text));
        }
    }

    Ok(())
}
