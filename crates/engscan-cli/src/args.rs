use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "engscan",
    version,
    about = "Game engine and template detection for web game snapshots"
)]
pub struct Args {
    /// Path to the JSON snapshot capture
    #[arg(required_unless_present = "list_profiles")]
    pub snapshot_path: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Optional git commit hash for tool metadata
    #[arg(long)]
    pub commit: Option<String>,

    /// Print the built-in engine profiles in registration order and exit
    #[arg(long, conflicts_with = "snapshot_path")]
    pub list_profiles: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}
