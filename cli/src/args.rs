use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jamcache")]
#[command(about = "Inspect and maintain the jamcache catalog database")]
pub struct Args {
    /// SQLite database path or URL (defaults to DATABASE_URL, then the user data dir)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub database: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import tracks from a saved Jamendo /tracks response
    Import {
        /// JSON file holding a Jamendo response or a bare list of tracks
        file: PathBuf,
    },

    /// Delete expired response cache entries
    PurgeCache,

    /// Show catalog and cache row counts
    Stats,

    /// List the best rated tracks in the catalog
    Top {
        /// Number of tracks to show
        #[arg(short = 'n', long, value_name = "COUNT", default_value = "10")]
        limit: usize,
    },
}
