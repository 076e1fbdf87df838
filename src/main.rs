use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use monday_export::cli::{
    handle_boards_command, handle_config_command, handle_export_command, ExportArgs,
};

#[derive(Parser)]
#[command(
    name = "monday-export",
    author = "Kaylee Beyene",
    version,
    about = "Export a Monday.com board to CSV, Excel, or Google Sheets",
    long_about = "monday-export fetches every item of a Monday.com board through the \
                  GraphQL API, drops header-like and excluded rows, and writes the \
                  result to monday_data.csv, monday_data.xlsx, or a Google spreadsheet."
)]
struct Cli {
    /// Path to the JSON config file
    #[arg(short, long, global = true, env = "MONDAY_EXPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Export options used when no command is given
    #[command(flatten)]
    export: ExportArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the configured board (the default)
    Export(ExportArgs),

    /// List the boards visible to the API token
    Boards,

    /// Show the resolved configuration
    Config,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => std::env::var("MONDAY_EXPORT_LOG")
            .ok()
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .or_else(|| EnvFilter::try_from_default_env().ok())
            .unwrap_or_else(|| EnvFilter::new("warn")),
        1 => EnvFilter::new("monday_export=info,warn"),
        _ => EnvFilter::new("monday_export=debug,info"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();

    match cli.command {
        Some(Commands::Boards) => handle_boards_command(config)?,
        Some(Commands::Config) => handle_config_command(config)?,
        Some(Commands::Export(args)) => run_export(config, args.or(cli.export))?,
        None => run_export(config, cli.export)?,
    }

    Ok(())
}

fn run_export(config: Option<&Path>, args: ExportArgs) -> Result<()> {
    handle_export_command(config, args).map_err(|e| {
        eprintln!("Failed to export data from Monday.com: {}", e);
        e.into()
    })
}
