//! Command-line definition.
//!
//! Lives in the library so `xtask` can generate the man page from the
//! same definition the binary parses.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[cfg(not(feature = "release"))]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("STROKECAST_BUILD_DATE"),
    ")"
);

#[cfg(feature = "release")]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("STROKECAST_BUILD_DATE"),
    ")"
);

#[derive(Debug, Parser)]
#[command(
    name = "strokecast",
    version = VERSION,
    about = "Replay recorded presentation sessions",
    long_about = "Replay recorded presentation sessions.\n\n\
                  A recording pairs an audio track with the strokes, text and page \
                  changes drawn while it was captured. strokecast inspects recordings, \
                  renders the view at any instant, and plays them back against a clock.",
    after_help = format!("Source: https://github.com/{}", env!("STROKECAST_REPO_NAME"))
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a summary of a recording
    Inspect {
        /// Recording file (JSON)
        file: PathBuf,
    },

    /// Print what is visible at a point in time
    Render {
        /// Recording file (JSON)
        file: PathBuf,

        /// Time in milliseconds from the start of the audio
        #[arg(long, value_name = "MS")]
        at: u64,
    },

    /// Play a recording against a simulated clock, printing draw calls
    Play {
        /// Recording file (JSON)
        file: PathBuf,

        /// Playback speed multiplier (default from config)
        #[arg(long)]
        speed: Option<f64>,

        /// Clock tick interval in milliseconds (default from config)
        #[arg(long, value_name = "MS")]
        tick_ms: Option<u64>,

        /// Start playback at this time instead of 0
        #[arg(long, value_name = "MS")]
        from: Option<u64>,
    },

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
}
