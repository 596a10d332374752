mod bootstrap;
mod commands;

use crate::bootstrap::{config, datasource, logging};
use clap::{Parser, Subcommand};
use filedock_events::{AppEvent, EventBus};
use anyhow::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "filedock", version, about = "Maintenance tool for the configured file datasource")]
struct Cli {
    /// Configuration file, created with defaults when missing
    #[arg(short, long, env = "FILEDOCK_CONFIG", default_value = "filedock.toml")]
    config: String,

    /// Print lifecycle banners to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload FILE under NAME
    Put { name: String, file: PathBuf },
    /// Download NAME to OUT, or to stdout
    Get { name: String, out: Option<PathBuf> },
    /// Delete NAME
    Rm { name: String },
    /// Print the size of NAME in bytes
    Size { name: String },
    /// Print the total stored bytes
    Usage,
    /// Delete everything in the datasource
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_level = logging::initialize();
    let cli = Cli::parse();

    let events = EventBus::new(!cli.verbose);
    events.emit(AppEvent::Starting);

    let config = config::load(&cli.config, &events).await?;
    log_level.apply(&config.logging.level);

    let datasource = datasource::initialize(&config, &events).await?;

    let result = match cli.command {
        Command::Put { name, file } => commands::put(datasource.as_ref(), &name, &file).await,
        Command::Get { name, out } => commands::get(datasource.as_ref(), &name, out.as_deref()).await,
        Command::Rm { name } => commands::rm(datasource.as_ref(), &name).await,
        Command::Size { name } => commands::size(datasource.as_ref(), &name).await,
        Command::Usage => commands::usage(datasource.as_ref()).await,
        Command::Clear => commands::clear(datasource.as_ref()).await,
    };

    events.emit(AppEvent::Shutdown);
    result
}
