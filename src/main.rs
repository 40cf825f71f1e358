//! comment-feed - RSS 2.0 feeds of blog comments.

mod cli;
mod config;
mod feed;
mod logger;
mod store;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    cli::serve::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Init { force, sample } => cli::init::init_project(&config, *force, *sample),
        Commands::Render { args } => cli::render::render_feed(args, &config),
        Commands::Serve { .. } => cli::serve::serve_feeds(&config),
    }
}
