//! CLI command definitions and handlers.
//!
//! Each subcommand is implemented as a function that takes the parsed
//! arguments and returns an `anyhow::Result<()>`. Async work runs under an
//! explicitly constructed runtime.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

use crate::config::{self, Config, DependencyLimits};
use crate::error::{Error, ResultExt};
use crate::gdbrowser::GdBrowserClient;
use crate::gemini::GeminiClient;
use crate::pipeline::{ExtractionOutcome, ExtractionService, FoundLevel, GdLevel, PipelineSettings};
use crate::ratelimit::RateLimiter;
use crate::youtube::YouTubeClient;

/// Levelscout CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the extraction pipeline for one or more YouTube video IDs
    Extract {
        /// Video IDs (11-character references, already parsed from URLs)
        #[arg(required = true)]
        video_ids: Vec<String>,
        /// YouTube Data API key (or set YOUTUBE_API_KEY)
        #[arg(long, env = "YOUTUBE_API_KEY")]
        youtube_key: Option<String>,
        /// Gemini API key (or set GEMINI_API_KEY)
        #[arg(long, env = "GEMINI_API_KEY")]
        gemini_key: Option<String>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look up a level by ID on GDBrowser
    Lookup {
        /// Level ID
        level_id: String,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search GDBrowser by level name (top hit only)
    Search {
        /// Level name
        name: String,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check configuration and credentials
    Check {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let config = config::load();

    match &cli.command {
        Commands::Extract {
            video_ids,
            youtube_key,
            gemini_key,
            json,
        } => cmd_extract(
            &rt,
            &config,
            video_ids,
            youtube_key.as_deref(),
            gemini_key.as_deref(),
            *json,
        ),
        Commands::Lookup { level_id, json } => cmd_lookup(&rt, &config, level_id, *json),
        Commands::Search { name, json } => cmd_search(&rt, &config, name, *json),
        Commands::Check { init } => cmd_check(&config, *init),
    }
}

// ============================================================================
// Individual command implementations
// ============================================================================

fn cmd_extract(
    rt: &Runtime,
    config: &Config,
    video_ids: &[String],
    youtube_key: Option<&str>,
    gemini_key: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let youtube_key = youtube_key
        .map(str::to_string)
        .or_else(|| config.credentials.youtube_key())
        .ok_or(Error::MissingCredential("YOUTUBE_API_KEY"))?;
    let gemini_key = gemini_key
        .map(str::to_string)
        .or_else(|| config.credentials.gemini_key())
        .ok_or(Error::MissingCredential("GEMINI_API_KEY"))?;

    let service = build_service(config, &youtube_key, &gemini_key);
    let outcomes = rt.block_on(service.extract_all(video_ids));

    for (video_id, outcome) in video_ids.iter().zip(&outcomes) {
        if json {
            println!("{}", serde_json::to_string_pretty(outcome)?);
        } else {
            print_outcome(video_id, outcome);
        }
    }
    Ok(())
}

fn cmd_lookup(rt: &Runtime, config: &Config, level_id: &str, json: bool) -> anyhow::Result<()> {
    let client = gdbrowser_client(config);
    let level = rt
        .block_on(client.lookup_level(level_id))
        .with_context(format!("looking up level {level_id}"))?;
    match level {
        Some(level) => print_level(&level, json)?,
        None => println!("No level with ID {level_id}"),
    }
    Ok(())
}

fn cmd_search(rt: &Runtime, config: &Config, name: &str, json: bool) -> anyhow::Result<()> {
    let client = gdbrowser_client(config);
    let level = rt
        .block_on(client.search_levels(name))
        .with_context(format!("searching for \"{name}\""))?;
    match level {
        Some(level) => print_level(&level, json)?,
        None => println!("No level found for \"{name}\""),
    }
    Ok(())
}

fn cmd_check(config: &Config, init: bool) -> anyhow::Result<()> {
    match config::config_path() {
        Some(path) if path.exists() => println!("Config file:     {}", path.display()),
        Some(path) if init => {
            config::save(config).map_err(Error::Config)?;
            println!("Config file:     {} (written with defaults)", path.display());
        }
        Some(path) => println!("Config file:     {} (not present, using defaults)", path.display()),
        None => println!("Config file:     <no config directory>"),
    }

    let check = |present: bool| if present { "configured" } else { "MISSING" };
    println!(
        "YouTube key:     {}",
        check(config.credentials.youtube_key().is_some())
    );
    println!(
        "Gemini key:      {}",
        check(config.credentials.gemini_key().is_some())
    );
    println!("Gemini model:    {}", config.gemini.model);
    println!("Authority:       {}", config.gdbrowser.base_url);
    println!(
        "GDBrowser rate:  {}/min, {} in flight, {}ms spacing",
        config.limits.gdbrowser.requests_per_minute,
        config.limits.gdbrowser.max_concurrent,
        config.limits.gdbrowser.min_interval_ms
    );
    Ok(())
}

// ============================================================================
// Wiring
// ============================================================================

fn limiter(name: &'static str, limits: &DependencyLimits) -> Arc<RateLimiter> {
    Arc::new(RateLimiter::per_minute(
        name,
        limits.requests_per_minute,
        limits.max_concurrent,
        limits.min_interval(),
    ))
}

fn gdbrowser_client(config: &Config) -> GdBrowserClient {
    GdBrowserClient::new(
        config.gdbrowser.base_url.clone(),
        limiter("gdbrowser", &config.limits.gdbrowser),
    )
}

fn build_service(config: &Config, youtube_key: &str, gemini_key: &str) -> ExtractionService {
    let youtube = YouTubeClient::new(
        youtube_key,
        config.youtube.base_url.clone(),
        limiter("youtube", &config.limits.youtube),
    );
    let gemini = GeminiClient::new(
        gemini_key,
        config.gemini.base_url.clone(),
        config.gemini.model.clone(),
        config.gemini.description_truncate_chars,
        limiter("gemini", &config.limits.gemini),
    );
    let settings = PipelineSettings {
        retry_attempts: config.pipeline.retry_attempts,
        retry_base_delay: Duration::from_millis(config.pipeline.retry_base_delay_ms),
        max_videos_per_event: config.pipeline.max_videos_per_event,
        max_candidate_lookups: config.pipeline.max_candidate_lookups,
    };

    ExtractionService::new(
        Arc::new(youtube),
        Arc::new(gemini),
        Arc::new(gdbrowser_client(config)),
        settings,
    )
}

// ============================================================================
// Output
// ============================================================================

fn print_outcome(video_id: &str, outcome: &ExtractionOutcome) {
    match outcome {
        ExtractionOutcome::Found(found) => print_found(video_id, found),
        ExtractionOutcome::VideoNotFound => {
            println!("{video_id}: video not found");
        }
        ExtractionOutcome::LevelNotFound { metadata } => {
            println!("{video_id}: no level found for \"{}\"", metadata.title);
        }
    }
}

fn print_found(video_id: &str, found: &FoundLevel) {
    let FoundLevel { level, stage, .. } = found;
    println!(
        "{video_id}: {} by {} (ID {}) via {:?} stage",
        level.name, level.author, level.level_id, stage
    );
    println!(
        "  {} | {} stars | {} downloads | {} likes",
        level.difficulty, level.stars, level.downloads, level.likes
    );
    if let (Some(song), Some(by)) = (&level.song_name, &level.song_author) {
        println!("  Song: {song} by {by}");
    }
    if let Some(rationale) = &found.rationale {
        println!("  Model rationale: {rationale}");
    }
    if !found.searched_names.is_empty() {
        println!("  Searched names: {}", found.searched_names.join(", "));
    }
}

fn print_level(level: &GdLevel, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(level)?);
    } else {
        println!("{} by {} (ID {})", level.name, level.author, level.level_id);
        println!(
            "  {} | {} stars | {} downloads | {} likes | {}",
            level.difficulty, level.stars, level.downloads, level.likes, level.length
        );
        if let Some(description) = &level.description {
            println!("  {description}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_extract_requires_video_id() {
        assert!(Cli::try_parse_from(["levelscout", "extract"]).is_err());
        assert!(Cli::try_parse_from(["levelscout", "extract", "dQw4w9WgXcQ"]).is_ok());
    }

    #[test]
    fn test_lookup_and_search_parse() {
        assert!(Cli::try_parse_from(["levelscout", "lookup", "10565740", "--json"]).is_ok());
        assert!(Cli::try_parse_from(["levelscout", "search", "Bloodbath"]).is_ok());
    }
}
