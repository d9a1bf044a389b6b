//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

/// Quire asset bundler CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: quire.toml)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve an asset and write the bundle
    #[command(visible_alias = "b")]
    Build {
        /// Logical path of the entry asset (e.g. app.js)
        asset: String,

        #[command(flatten)]
        search: SearchArgs,

        /// Write the bundle to a file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Splice content fingerprints into url() results
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        fingerprint: Option<bool>,

        /// Public prefix for url() results (default: /assets/)
        #[arg(short = 'r', long)]
        asset_root: Option<String>,
    },

    /// Print the load order of an asset, one logical path per line
    #[command(visible_alias = "r")]
    Resolve {
        /// Logical path of the entry asset
        asset: String,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Serve bundles over HTTP, rebuilt on every request
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        search: SearchArgs,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Search paths shared by every command.
#[derive(clap::Args, Debug, Clone)]
pub struct SearchArgs {
    /// Directory to search for assets; repeatable, searched in order
    #[arg(short = 's', long = "search-path", value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
    pub search_paths: Vec<PathBuf>,
}

impl Cli {
    /// Config file to load, and whether it was named with `-C`.
    ///
    /// Only an explicit file is required to exist.
    pub fn config_file(&self) -> (PathBuf, bool) {
        match &self.config {
            Some(path) => (path.clone(), true),
            None => (PathBuf::from(quire::config::CONFIG_FILE), false),
        }
    }
}
