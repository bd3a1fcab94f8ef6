mod commands;
mod layout;
mod mindmap;
mod parser;
mod project;
mod tui;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

#[derive(Parser)]
#[command(
    name = "hoid",
    version,
    about = "Turn loosely formatted outline text into a radial mind map"
)]
struct Cli {
    /// Raise log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    debug: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create .hoid/config.hoid in the current directory
    Init,
    /// Print the interpreted tree as an outline
    Show {
        /// Mind-map text file, or `-` for stdin
        file: String,
        /// Print JSON instead of an outline
        #[arg(long)]
        json: bool,
    },
    /// Print the radial layout coordinates of every node
    Layout {
        /// Mind-map text file, or `-` for stdin
        file: String,
        /// Print JSON instead of one line per node
        #[arg(long)]
        json: bool,
        /// Use the wide layout regardless of config
        #[arg(long)]
        wide: bool,
    },
    /// List every line that did not make it into the mind map
    Check {
        /// Mind-map text file, or `-` for stdin
        file: String,
    },
    /// Open the interactive mind-map viewer
    View {
        /// Mind-map text file, or `-` for stdin
        file: Option<String>,
        /// Launch with a built-in sample map
        #[arg(long, conflicts_with = "file")]
        demo: bool,
    },
    /// Open a mind-map text file in your editor
    Edit {
        file: String,
    },
    /// Open the settings panel for the current project
    Setup,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    match cli.command {
        Command::Init => commands::init::run(),
        Command::Show { file, json } => commands::show::run(&file, json),
        Command::Layout { file, json, wide } => commands::layout::run(&file, json, wide),
        Command::Check { file } => commands::check::run(&file),
        Command::View { file, demo } => commands::view::run(file, demo),
        Command::Edit { file } => commands::edit::run(&file),
        Command::Setup => commands::view::run_setup(),
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
    tracing::debug!(?filter, "logging initialised");
}
