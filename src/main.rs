//! zram-swap - boot-time zram swap provisioning.
//!
//! Creates a compressed RAM-backed swap device and records it in a
//! boot-scoped state file. Re-running within the same boot replaces the
//! device recorded by the earlier invocation; state from a previous
//! boot is ignored.

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use zram_swap::setup::{provision, Settings};

/// Set up a compressed RAM-backed swap device.
#[derive(Parser)]
#[command(name = "zram-swap", author, version, about, long_about = None)]
struct Cli {
    /// Boot-scoped state file recording the provisioned device.
    #[arg(long, value_name = "PATH", default_value = "/run/zram-swap.state")]
    state_file: PathBuf,

    /// Maximum swap size in bytes (default: half of total memory).
    #[arg(short = 'S', long, value_name = "BYTES")]
    max_size: Option<u64>,

    /// Compression algorithm.
    #[arg(short = 'A', long, value_name = "NAME", default_value = "lz4")]
    algorithm: String,

    /// Block device backing the zram device.
    #[arg(short = 'D', long, value_name = "PATH")]
    backing_dev: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("zram-swap: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings {
        state_file: cli.state_file,
        max_size: cli.max_size,
        algorithm: cli.algorithm,
        backing_dev: cli.backing_dev,
    };
    provision(&settings).context("failed to provision zram swap")
}
