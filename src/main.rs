//! geowarden - geo page generator and location whitelist guard.

mod cli;
mod config;
mod consistency;
mod geo;
mod logger;
mod registry;
mod scan;
mod utils;
mod whitelist;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Init { dry } => cli::init::init_project(&config, *dry),
        Commands::Generate { args } => cli::generate::generate_site(&config, args),
        Commands::Validate { args } => cli::validate::validate_site(&config, args),
        Commands::Check { .. } => cli::check::check_site(&config),
        Commands::Routes { pretty } => cli::routes::print_routes(&config, *pretty),
    }
}
