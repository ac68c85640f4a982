//! CLI definitions for restyle.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// restyle CLI.
#[derive(Parser)]
#[command(name = "restyle")]
#[command(about = "Restyle zhihu pages in a running Chromium browser")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.restyle/config.toml)
    #[arg(short, long, global = true, env = "RESTYLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// DevTools endpoint, overriding the configuration
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Restyle the active tab and keep it styled until the page unloads
    Run,

    /// Evaluate a script file in the active tab
    Inject {
        /// Script file to evaluate
        file: PathBuf,
    },

    /// Apply the styling to a local HTML file
    Preview {
        /// HTML file to restyle
        html: PathBuf,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List open page tabs, most recently focused first
    Tabs,
}
