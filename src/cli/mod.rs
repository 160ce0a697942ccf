//! CLI module - Command-line interface for Tripfinder
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;
mod console;

use clap::{Parser, Subcommand};

use crate::domain::SearchMode;

/// Tripfinder - jump straight to a travel destination page
#[derive(Parser)]
#[command(name = "tripfinder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use this config file instead of the default search paths
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search destinations and go to the first match
    #[command(alias = "s")]
    Search {
        /// Search query
        query: Vec<String>,
        /// redirect (first match) or list (all matches)
        #[arg(long)]
        mode: Option<SearchMode>,
        /// Dataset URL or file, overrides the config
        #[arg(long)]
        source: Option<String>,
    },

    /// Start the web search page
    #[command(alias = "web")]
    Serve,

    /// Print every destination in the dataset
    #[command(alias = "ls")]
    Entries {
        /// Dataset URL or file, overrides the config
        #[arg(long)]
        source: Option<String>,
    },

    /// Fetch the dataset and report problems
    Check {
        /// Dataset URL or file, overrides the config
        #[arg(long)]
        source: Option<String>,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
pub use console::{ConsoleNavigator, ConsoleNotifier, ConsoleResults};
