//! Quire - an asset bundler.

mod cli;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::build::{BuildOptions, build_bundle, print_order};
use cli::{Cli, Commands};
use quire::ProjectConfig;
use quire::logger::set_verbose;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    set_verbose(cli.verbose);

    let (config_file, explicit) = cli.config_file();
    let project = ProjectConfig::load(&config_file, explicit)?;

    match &cli.command {
        Commands::Build {
            asset,
            search,
            output,
            fingerprint,
            asset_root,
        } => {
            let options = BuildOptions {
                output: output.clone(),
                fingerprint: *fingerprint,
                asset_root: asset_root.clone(),
            };
            build_bundle(&project, asset, search, &options)
        }
        Commands::Resolve { asset, search } => print_order(&project, asset, search),
        Commands::Serve {
            search,
            interface,
            port,
        } => cli::serve::serve(&project, search, *interface, *port),
    }
}
