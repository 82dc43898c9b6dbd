//! mdxroute - compile MDX content files into cached route modules.

mod cache;
mod cli;
mod compiler;
mod config;
mod content;
mod logger;
mod pipeline;
mod route;
mod utils;
mod watch;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.common().verbose);

    let cwd = std::env::current_dir().context("Failed to get current working directory")?;
    let config = Config::load(&cli.config, &cwd)?;
    if let Some(path) = &config.config_path {
        debug!("config"; "loaded {}", path.display());
    }

    match &cli.command {
        Commands::Build { args, .. } => cli::build::run(&config, args).await,
        Commands::Compile { args, .. } => cli::compile::run(&config, args).await,
        Commands::Watch { .. } => cli::watch::run(&config).await,
        Commands::Clean { .. } => cli::clean::run(&config).await,
    }
}
