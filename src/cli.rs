//! CLI definitions for chemhover.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// chemhover CLI.
#[derive(Parser)]
#[command(name = "chemhover")]
#[command(about = "Find chemical formulas in text and attach hover overlays")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "~/.chemhover/config.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the overlay pipeline over a text file and print the result
    Scan {
        /// Text file; blank lines separate paragraphs
        file: PathBuf,

        /// Acceptance threshold (scores must be strictly above it)
        #[arg(long)]
        threshold: Option<f32>,

        /// Model artifact path or http(s) URL
        #[arg(long)]
        model: Option<String>,

        /// Do not decorate detected labels
        #[arg(long)]
        no_sparkle: bool,
    },

    /// Print the padded id grid for a batch of words
    Tokenize {
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Site filter management
    Site {
        #[command(subcommand)]
        action: SiteAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum SiteAction {
    /// Enable the overlay on the URL's host
    Add { url: String },

    /// Disable the overlay on the URL's host
    Remove { url: String },

    /// Show whether a page on this URL would be activated
    Check { url: String },

    /// List enabled hosts
    List,
}
