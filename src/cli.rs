// CLI module for handling command-line interface

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dccompat")]
#[command(about = "Find marketplace plugin versions compatible with a Data Center release")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create plugins.toml
    Init {
        /// Platform release to check against
        target: Option<String>,
    },
    /// Add or replace a plugin in plugins.toml
    Add {
        name: String,
        /// Marketplace listing URL
        url: String,
        /// Installed plugin version
        version: String,
    },
    /// Resolve compatible versions for every plugin in plugins.toml
    Check {
        /// Override the target release from plugins.toml
        #[arg(long)]
        target: Option<String>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
        /// Write JSON results to a file
        #[arg(long, short)]
        output: Option<String>,
        /// Skip the rendered-page fallback
        #[arg(long)]
        no_browser: bool,
    },
    /// Compare two version strings
    Compare { a: String, b: String },
    /// Extract the version range from compatibility text
    Parse { text: String },
}
