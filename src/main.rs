use anyhow::Result;
use clap::{Parser, Subcommand};
use ni::{app, config, logging};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ni", version, about = "Small modal text editor for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// File to open
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the config file in $EDITOR (default: vi)
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Config) = cli.command {
        return config::open_config_in_editor();
    }

    let cfg = config::load_config()?;
    // Running without a log file is fine.
    let _ = logging::init(&cfg);
    app::run_app(cli.file, cfg)
}
