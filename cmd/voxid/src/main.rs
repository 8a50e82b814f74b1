//! voxid - name the speakers of a diarized transcript.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{
    CheckCommand, ConfigCommand, DeleteCommand, EnrollCommand, ListCommand, MatchCommand,
    ShowCommand,
};

/// voxid - speaker enrollment and identification.
///
/// Enroll known voices once, then replace the anonymous SPEAKER_XX labels of
/// WhisperX transcripts with their names:
///
///   voxid enroll alice.wav --name "Alice"
///   voxid match --transcript meeting.json --audio meeting.wav --output-txt meeting.txt
///
/// Configuration is stored in ~/.voxid/config.yaml, profiles in
/// ~/.voxid/speakers unless configured otherwise.
#[derive(Parser)]
#[command(name = "voxid")]
#[command(about = "Speaker enrollment and identification for diarized transcripts")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.voxid/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Profile store directory (overrides the config file)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enroll a speaker from a voice sample
    Enroll(EnrollCommand),
    /// List enrolled speakers
    List(ListCommand),
    /// Show one enrolled speaker
    Show(ShowCommand),
    /// Delete an enrolled speaker
    Delete(DeleteCommand),
    /// Relabel a diarized transcript with enrolled speakers
    Match(MatchCommand),
    /// Check the profile store for inconsistencies
    Check(CheckCommand),
    /// Manage CLI configuration
    Config(ConfigCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Enroll(cmd) => cmd.run(&cli),
        Commands::List(cmd) => cmd.run(&cli),
        Commands::Show(cmd) => cmd.run(&cli),
        Commands::Delete(cmd) => cmd.run(&cli),
        Commands::Match(cmd) => cmd.run(&cli),
        Commands::Check(cmd) => cmd.run(&cli),
        Commands::Config(cmd) => cmd.run(&cli),
    }
}
