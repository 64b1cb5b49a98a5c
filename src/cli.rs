//! Command-line interface for aryavoice
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Wake-phrase voice assistant for college placement Q&A
#[derive(Parser, Debug)]
#[command(
    name = "aryavoice",
    version,
    about = "Wake-phrase voice assistant for college placement Q&A"
)]
pub struct Cli {
    /// Subcommand to execute (default: voice)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress status messages
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: transcript events, -vv: full diagnostics)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the voice assistant (wake phrase, spoken answers)
    Voice {
        /// Input device index from `aryavoice devices`
        #[arg(long, value_name = "INDEX")]
        device: Option<usize>,

        /// Active window ceiling (default: 5m). Examples: 90s, 2m30s, 10m
        #[arg(long, value_name = "DURATION", value_parser = parse_window_secs)]
        window: Option<u64>,

        /// Length of each turn-based listen window in seconds
        #[arg(long, value_name = "SECONDS")]
        listen_secs: Option<f32>,

        /// Print answers instead of speaking them
        #[arg(long)]
        no_tts: bool,
    },

    /// Run the text chat surface on stdin/stdout
    Chat,

    /// List available audio input devices
    Devices,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Parse an active-window duration string into seconds.
///
/// Supports any duration format accepted by `humantime`: bare numbers
/// (seconds), single-unit (`90s`, `5m`), and compound (`2m30s`).
fn parse_window_secs(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(secs);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_secs())
        .map_err(|e| e.to_string())
}
