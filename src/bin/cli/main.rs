mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "recall-cli", about = "Spaced-repetition knowledge tracker", version)]
struct Cli {
    /// Database file (overrides the config file)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Config file (default: <config dir>/recall/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Create the knowledge table if it does not exist
    Init,

    /// Add a knowledge item (first review is due tomorrow)
    Add {
        /// What to remember
        title: String,
    },

    /// List all items, newest first
    List,

    /// List items due for review today
    Due,

    /// Mark an item as reviewed and schedule the next review
    Review {
        /// Item ID
        id: String,
    },

    /// Delete an item
    Delete {
        /// Item ID
        id: String,
    },

    /// Serve the HTTP API
    Serve {
        /// Listen host (overrides the config file)
        #[arg(long)]
        host: Option<String>,
        /// Listen port (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.config.as_deref(), cli.db)?;

    match cli.command {
        Command::Init => commands::init::run(&app, &cli.format)?,
        Command::Add { title } => commands::add::run(&app, &title, &cli.format, use_color)?,
        Command::List => commands::list::run(&app, &cli.format, use_color)?,
        Command::Due => commands::due::run(&app, &cli.format, use_color)?,
        Command::Review { id } => commands::review::run(&app, &id, &cli.format, use_color)?,
        Command::Delete { id } => commands::delete::run(&app, &id, &cli.format)?,
        Command::Serve { host, port } => commands::serve::run(app, host, port)?,
    }

    Ok(())
}
