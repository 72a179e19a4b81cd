// SPDX-FileCopyrightText: 2026 Replypal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Replypal - password-sealed Gemini API key files.
//!
//! This is the binary entry point for the `replypal` command.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod config_cmd;
mod keyfile;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use replypal_config::model::ReplypalConfig;

/// Replypal - keep your Gemini API key sealed under a password.
#[derive(Parser, Debug)]
#[command(name = "replypal", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Seal an API key under a password and write the key file.
    Create {
        /// Where to write the key file.
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
        /// Skip the API key liveness check.
        #[arg(long)]
        no_verify: bool,
    },
    /// Open a key file and show the recovered API key.
    Load {
        /// Key file to open.
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
        /// Print the full key instead of a masked form.
        #[arg(long)]
        reveal: bool,
        /// Skip the API key liveness check.
        #[arg(long)]
        no_verify: bool,
    },
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => replypal_config::load_and_validate_path(path),
        None => replypal_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            replypal_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.normalized_log_level());

    if let Err(e) = run(cli.command, &config).await {
        eprintln!("replypal: {}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &ReplypalConfig) -> Result<(), replypal_core::ReplypalError> {
    match command {
        Commands::Create { out, no_verify } => {
            keyfile::run_create(config, out.as_deref(), !no_verify)
                .await
                .map(|_| ())
        }
        Commands::Load {
            file,
            reveal,
            no_verify,
        } => keyfile::run_load(config, file.as_deref(), reveal, !no_verify).await,
        Commands::Config => config_cmd::run_config(config),
    }
}

/// Install the global tracing subscriber. Logs go to stderr so a revealed
/// key on stdout can be piped cleanly.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("replypal={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
