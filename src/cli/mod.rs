//! CLI module - Command-line interface for cinefind
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// cinefind - find movies you'll enjoy without the hassle
#[derive(Parser)]
#[command(name = "cinefind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Live search: every line typed replaces the search text (default)
    #[command(alias = "i")]
    Interactive,

    /// Search the catalog once and print the results
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    /// Show the popularity feed
    #[command(alias = "d")]
    Discover {
        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    /// Show the most searched terms
    #[command(alias = "t")]
    Trending {
        /// Number of entries to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the URL a poster is loaded from
    Poster {
        /// Raw poster URL
        url: Option<String>,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
