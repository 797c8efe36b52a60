use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI front end over the shareparse session stores
#[derive(Parser)]
#[command(name = "shareparse")]
#[command(about = "Resolve video share links into downloadable media", long_about = None)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a share link and print the media info
    Parse {
        /// Share link copied from the app
        url: String,
    },
    /// Resolve a share link and download its media with a progress readout
    Download {
        /// Share link copied from the app
        url: String,
        /// Directory to save into (defaults to the configured download dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// File name override
        #[arg(long)]
        filename: Option<String>,
    },
    /// List the available UI themes
    Themes,
}
