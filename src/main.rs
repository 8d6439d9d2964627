use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use vinedex::{comicvine, ComicVineClient, HarvestConfig};

/// Vinedex - Harvest comic book metadata from the ComicVine catalog
#[derive(Parser, Debug)]
#[command(name = "vinedex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Harvest comic book metadata from the ComicVine catalog", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// ComicVine API key (falls back to COMICVINE_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Delay between page fetches, in seconds (values below 1 are clamped up)
    #[arg(long, global = true)]
    delay: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for volumes matching a series name
    Volumes {
        /// Series name to search for
        series: String,

        /// Maximum number of records to return (0 = unbounded)
        #[arg(long, default_value_t = 0)]
        max_records: u32,
    },

    /// List every issue of a volume
    Issues {
        /// Volume identifier
        volume_id: String,
    },

    /// Look up a single issue of a volume by issue number
    Issue {
        /// Volume identifier
        volume_id: String,

        /// Issue number
        issue_number: String,
    },

    /// Fetch the full details of a single issue
    IssueDetails {
        /// Issue identifier
        issue_id: String,
    },

    /// Search for story arcs matching a name
    Stories {
        /// Story arc name to search for
        name: String,

        /// Maximum number of records to return (0 = unbounded)
        #[arg(long, default_value_t = 0)]
        max_records: u32,
    },

    /// Fetch the full details of a story arc, resolving its issues
    Story {
        /// Story arc reference identifier
        reference_id: String,
    },

    /// Extract the reference id from a ComicVine web address
    Reference {
        /// Web address to inspect
        web_address: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => HarvestConfig::load(path)?,
        None => HarvestConfig::from_env(),
    };
    if let Some(api_key) = cli.api_key {
        config.api_key = api_key;
    }
    if let Some(delay) = cli.delay {
        config.delay_seconds = delay;
    }

    match cli.command {
        Commands::Volumes { series, max_records } => {
            let client = ComicVineClient::new(config)?;
            print_json(&client.get_volumes(&series, max_records).await?)
        }
        Commands::Issues { volume_id } => {
            let client = ComicVineClient::new(config)?;
            print_json(&client.get_all_issues(&volume_id).await?)
        }
        Commands::Issue {
            volume_id,
            issue_number,
        } => {
            let client = ComicVineClient::new(config)?;
            match client.get_issue(&volume_id, &issue_number).await? {
                Some(issue) => print_json(&issue),
                None => {
                    eprintln!("No issue {} found in volume {}", issue_number, volume_id);
                    std::process::exit(1);
                }
            }
        }
        Commands::IssueDetails { issue_id } => {
            let client = ComicVineClient::new(config)?;
            print_json(&client.get_issue_details(&issue_id).await?)
        }
        Commands::Stories { name, max_records } => {
            let client = ComicVineClient::new(config)?;
            print_json(&client.get_stories(&name, max_records).await?)
        }
        Commands::Story { reference_id } => {
            let client = ComicVineClient::new(config)?;
            print_json(&client.get_story_detail(&reference_id).await?)
        }
        Commands::Reference { web_address } => match comicvine::reference_id(&web_address) {
            Some(id) => {
                println!("{}", id);
                Ok(())
            }
            None => {
                eprintln!("No ComicVine reference found in {}", web_address);
                std::process::exit(1);
            }
        },
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{}", rendered);
    Ok(())
}
