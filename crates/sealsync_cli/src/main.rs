//! SealSync CLI
//!
//! Command-line client and server for SealSync.
//!
//! # Commands
//!
//! - `fetch` - Establish a channel and print the verified record
//! - `send` - Sign, store and post a new record
//! - `verify` - Check the local record against the server, optionally restoring it
//! - `reset` - Discard the key and local state and re-establish
//! - `serve` - Run the record server

mod commands;

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// SealSync integrity-checked record client.
#[derive(Parser)]
#[command(name = "sealsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Server URL (defaults to SEALSYNC_SERVER_URL or http://localhost:3000)
    #[arg(global = true, short, long)]
    server: Option<String>,

    /// Directory holding the key, record and signature
    #[arg(global = true, long, default_value = ".sealsync")]
    state_dir: PathBuf,

    /// Request timeout in milliseconds
    #[arg(global = true, long)]
    timeout_ms: Option<u64>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Establish a channel and print the verified record
    Fetch,

    /// Sign, store and post a new record
    Send {
        /// The record's content
        data: String,
    },

    /// Check the local record against the server
    Verify {
        /// Resubmit the local record if it diverged
        #[arg(short, long)]
        restore: bool,
    },

    /// Discard the key and local state and re-establish
    Reset,

    /// Run the record server
    Serve {
        /// Address to bind to
        #[arg(short, long, default_value = "127.0.0.1:3000")]
        bind: SocketAddr,

        /// Record served before the first write
        #[arg(short, long, default_value = "Hello World!")]
        initial: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let session = commands::Session::new(cli.server, cli.state_dir, cli.timeout_ms);
    match cli.command {
        Commands::Fetch => commands::fetch::run(&session)?,
        Commands::Send { data } => commands::send::run(&session, data)?,
        Commands::Verify { restore } => commands::verify::run(&session, restore)?,
        Commands::Reset => commands::reset::run(&session)?,
        Commands::Serve { bind, initial } => commands::serve::run(bind, initial)?,
        Commands::Version => {
            println!("SealSync CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Signing algorithm: {}", sealsync_client::ALGORITHM);
        }
    }

    Ok(())
}
