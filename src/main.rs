// SPDX-License-Identifier: GPL-3.0-only

use byebye_scanner::app::ScanMode;
use byebye_scanner::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "byebye-scanner")]
#[command(about = "Barcode and QR scanner for the ByeByeExpired inventory tracker")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Config file (default: ~/.config/byebye-scanner/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive scan screen in the terminal
    Scan {
        /// Scan mode to start in (qr or barcode)
        #[arg(short, long)]
        mode: Option<ScanMode>,

        /// Replay decode events from a JSON script instead of typed input
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Answer the camera permission prompt with "denied"
        #[arg(long)]
        deny_camera: bool,

        /// Write logs to this file
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Run one scan session headless against a decode script
    Simulate {
        /// JSON array or JSON lines of {"type", "data", "delay_ms"} entries
        #[arg(short, long)]
        script: PathBuf,

        /// Scan mode (qr or barcode)
        #[arg(short, long)]
        mode: Option<ScanMode>,

        /// Answer the camera permission prompt with "denied"
        #[arg(long)]
        deny_camera: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the symbologies each scan mode accepts
    Symbologies,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_file = match &cli.command {
        Some(Commands::Scan { log_file, .. }) => log_file.clone(),
        _ => None,
    };
    // The terminal screen owns stdout, so it only ever logs to a file
    let interactive = matches!(cli.command, None | Some(Commands::Scan { .. }));
    init_logging(log_file, interactive)?;

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Scan {
            mode,
            script,
            deny_camera,
            ..
        }) => cli::scan(config, mode, script, deny_camera),
        Some(Commands::Simulate {
            script,
            mode,
            deny_camera,
            json,
        }) => cli::simulate(config, mode, &script, deny_camera, json),
        Some(Commands::Symbologies) => cli::list_symbologies(),
        None => cli::scan(config, None, None, false),
    }
}

fn init_logging(
    log_file: Option<PathBuf>,
    interactive: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=byebye_scanner=debug, RUST_LOG=info
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::File::create(&path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None if interactive => {
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::io::sink)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}
