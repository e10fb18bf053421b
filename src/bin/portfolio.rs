//! portfolio: lay out dashboard widgets and manage portfolios kept offline.
//!
//! Portfolios created here go to the local JSON store named in `config.toml`
//! (`[storage] local_path`), not to a server.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use portfolio_tracker::config::{AppConfig, CONFIG_PATH};
use portfolio_tracker::layout::pack;
use portfolio_tracker::local::LocalPortfolioStore;
use portfolio_tracker::reporter;
use portfolio_tracker::types::{PersonRequest, PortfolioRequest, WidgetType};

#[derive(Parser)]
#[command(name = "portfolio", about = "Dashboard widget layout and local portfolios")]
struct Cli {
    /// Path to the config file (defaults apply when it does not exist)
    #[arg(long, default_value = CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the grid layout for widget types, in the given order
    Layout {
        widgets: Vec<WidgetType>,

        /// Draw the grid as text instead of JSON lines
        #[arg(long)]
        grid: bool,
    },

    /// Create a portfolio in the local store
    Create {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Widget type; repeat to add more, in display order
        #[arg(long = "widget")]
        widgets: Vec<WidgetType>,

        /// Person to track as NAME or NAME:TYPE (e.g. "Nancy Pelosi:politician")
        #[arg(long = "person", value_parser = parse_person)]
        people: Vec<PersonRequest>,

        /// Data source such as reddit, news or threads
        #[arg(long = "source")]
        data_sources: Vec<String>,
    },

    /// List portfolios in the local store
    List,

    /// Print one portfolio
    Show {
        id: u64,

        /// Also draw its widget grid
        #[arg(long)]
        grid: bool,
    },

    /// Delete a portfolio from the local store
    Delete { id: u64 },
}

fn parse_person(s: &str) -> Result<PersonRequest, String> {
    let (name, kind) = match s.rsplit_once(':') {
        Some((name, kind)) => (name.trim(), Some(kind.trim())),
        None => (s.trim(), None),
    };
    if name.is_empty() {
        return Err("person name cannot be empty".to_string());
    }
    Ok(PersonRequest {
        name: name.to_string(),
        kind: kind.filter(|k| !k.is_empty()).map(str::to_string),
        ..Default::default()
    })
}

fn open_store(config_path: &Path) -> Result<LocalPortfolioStore> {
    let config = AppConfig::load_or_default(config_path)?;
    LocalPortfolioStore::open(&config.storage.local_path, config.storage.storage_key)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Layout { widgets, grid } => {
            let placed = pack(&widgets);
            if grid {
                print!("{}", reporter::render_grid(&placed));
            } else {
                reporter::report_layout(&placed);
            }
        }
        Command::Create {
            name,
            description,
            widgets,
            people,
            data_sources,
        } => {
            let mut store = open_store(&cli.config)?;
            let portfolio = store.create(PortfolioRequest {
                name,
                description,
                people,
                data_sources,
                widgets,
            })?;
            reporter::report_portfolio(&portfolio);
        }
        Command::List => {
            let store = open_store(&cli.config)?;
            info!(
                "{} portfolio(s) in {}",
                store.list().len(),
                store.path().display()
            );
            reporter::report_portfolio_list(store.list());
        }
        Command::Show { id, grid } => {
            let store = open_store(&cli.config)?;
            let Some(portfolio) = store.get(id) else {
                bail!("no portfolio with id {id} in {}", store.path().display());
            };
            reporter::report_portfolio(portfolio);
            if grid {
                print!("{}", reporter::render_grid(&portfolio.widgets));
            }
        }
        Command::Delete { id } => {
            let mut store = open_store(&cli.config)?;
            if !store.delete(id)? {
                bail!("no portfolio with id {id} in {}", store.path().display());
            }
            info!("Deleted portfolio {id}");
        }
    }

    Ok(())
}
