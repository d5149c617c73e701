use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "voxclone")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "VoxClone - clone a voice from a sample and archive generated speech")]
struct Args {
    /// Settings file (TOML). Environment variables override its values.
    #[arg(long, value_name = "PATH", default_value = "voxclone.toml")]
    config: PathBuf,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API
    Serve,

    /// Run the full clone-and-speak pipeline once for a local sample
    Run {
        /// Voice sample to clone
        #[arg(long)]
        sample: PathBuf,

        /// Display name of the new voice
        #[arg(long)]
        name: String,

        /// Text to speak with the new voice
        #[arg(long)]
        text: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Drop the voice and speech tables
    ResetDb {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_tracing(args.log_file.as_deref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<()> {
    info!("Startup: config={:?}, command={:?}", args.config, args.command);

    match args.command {
        Command::Serve => commands::serve(&args.config).await,
        Command::Run {
            sample,
            name,
            text,
            description,
        } => commands::run_once(&args.config, sample, name, description, text).await,
        Command::ResetDb { yes } => commands::reset_db(&args.config, yes).await,
    }
}

fn setup_tracing(log_file: Option<&std::path::Path>) -> Result<()> {
    use tracing_subscriber::fmt;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;

            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(file)
                        .with_ansi(false)
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .init();
            info!("Tracing initialized to {:?}", path);
        }
        None => {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .init();
        }
    }
    Ok(())
}
