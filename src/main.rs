//! Levelscout - extracts Geometry Dash level IDs from YouTube videos.
//!
//! Given a video reference, fetches its metadata and runs a staged fallback
//! pipeline (regex candidates, AI-assisted extraction, name search), where
//! every candidate is validated against GDBrowser before being reported.

pub mod cli;
pub mod config;
pub mod error;
pub mod gdbrowser;
pub mod gemini;
pub mod pipeline;
pub mod ratelimit;
pub mod youtube;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("levelscout=info".parse().unwrap()))
        .init();

    cli::run_command(&args)
}
