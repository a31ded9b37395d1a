use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::params::LaunchParams;

/// regform - participant registration in the terminal
#[derive(Parser, Debug)]
#[command(name = "regform")]
#[command(about = "A multi-step participant registration form with local draft saving")]
#[command(version)]
pub struct Cli {
    /// Settings file (JSON). Defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for drafts, the language preference and logs
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Interface language (en, es, fr, ar, zh, ur, pl)
    #[arg(long, global = true)]
    pub lang: Option<String>,

    /// Open the form on this step (1-5)
    #[arg(long, global = true)]
    pub step: Option<u8>,

    /// Show the diagnostic overlay
    #[arg(long, global = true)]
    pub debug: bool,

    /// Launch parameters as a query string, e.g. '?step=3&debug=true&lang=es'
    #[arg(long, global = true)]
    pub query: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Fill in the form interactively (default)
    Run,
    /// Show the stored draft's step and completion
    Status,
    /// Validate a draft file and list incomplete fields
    Check {
        /// Path to a draft JSON file
        file: PathBuf,
    },
    /// Delete the stored draft
    Reset,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// Launch parameters from `--query`, overridden by explicit flags
    pub fn launch_params(&self) -> LaunchParams {
        let base = self
            .query
            .as_deref()
            .map(LaunchParams::from_query)
            .unwrap_or_default();
        base.merge(self.step, self.debug, self.lang.as_deref())
    }
}
