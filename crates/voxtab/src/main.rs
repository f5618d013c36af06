//! voxtab CLI - capture loop and one-shot command runner.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use voxtab::effects::apply_outcome;
use voxtab::error::CaptureError;
use voxtab::io::{Capture, ConsoleCapture, ConsoleSink, FeedbackSink};
use voxtab::{handle_utterance, Session, VoxConfig};

#[derive(Parser)]
#[command(name = "voxtab")]
#[command(about = "Voice-driven command interpreter for tabular datasets", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file path (default: ~/.config/voxtab/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the dataset path
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Override the export output directory
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read utterances interactively, one per line, until end of input
    Listen,

    /// Interpret a single utterance and exit
    Run {
        /// The command text, e.g. "show year 2020 price 15000"
        utterance: Vec<String>,
    },

    /// Show the effective configuration
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = VoxConfig::load(cli.config.as_deref())?;
    if let Some(dataset) = cli.dataset {
        config.dataset = dataset;
    }
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }

    match cli.command {
        Commands::Config => {
            let rendered =
                toml::to_string_pretty(&config).context("failed to render configuration")?;
            print!("{}", rendered);
            Ok(())
        }
        Commands::Run { utterance } => {
            let mut session = load_session(&config)?;
            let mut sink = ConsoleSink;
            let text = utterance.join(" ");
            let outcome = handle_utterance(&text, &mut session);
            apply_outcome(&outcome, &config.output_dir, &mut sink);
            Ok(())
        }
        Commands::Listen => {
            let mut session = load_session(&config)?;
            let mut capture = ConsoleCapture::stdin();
            let mut sink = ConsoleSink;
            listen_loop(&mut capture, &mut sink, &mut session, &config);
            Ok(())
        }
    }
}

fn load_session(config: &VoxConfig) -> Result<Session> {
    let session = Session::from_csv(&config.dataset, config.name_column.clone())?;
    info!(
        "loaded {} ({} rows, {} columns)",
        config.dataset.display(),
        session.table().row_count(),
        session.table().columns().len()
    );
    Ok(session)
}

/// Request-per-utterance loop. A failed capture short-circuits to a
/// feedback message without touching the table; nothing here
/// terminates the process short of end of input.
fn listen_loop(
    capture: &mut dyn Capture,
    sink: &mut dyn FeedbackSink,
    session: &mut Session,
    config: &VoxConfig,
) {
    loop {
        sink.set_status("listening");
        let utterance = match capture.capture_utterance() {
            Ok(text) => text,
            Err(CaptureError::Closed) => {
                info!("input closed, shutting down");
                return;
            }
            Err(err) => {
                info!("capture failed: {}", err);
                sink.speak("Sorry, I didn't get that.");
                sink.set_status("could not understand");
                continue;
            }
        };

        let outcome = handle_utterance(&utterance, session);
        apply_outcome(&outcome, &config.output_dir, sink);
    }
}
