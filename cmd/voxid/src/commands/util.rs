//! Utility functions for CLI commands.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use serde::Serialize;
use voxid_cli::{load_config, Config, Output, OutputFormat, Paths};
use voxid_profile::{DirStore, SpeakerProfile};
use voxid_speakerid::{ClusterPolicy, EnrollConfig, MatchConfig};
use voxid_voiceprint::FbankStatsModel;

use crate::Cli;

/// Gets the global configuration.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(cli.config.as_deref())
}

/// Resolves the profile store directory: `--store`, then the config file,
/// then ~/.voxid/speakers.
pub fn store_dir(cli: &Cli, cfg: &Config) -> anyhow::Result<PathBuf> {
    let paths = Paths::new()?;
    Ok(match &cli.store {
        Some(dir) => paths.expand(dir),
        None => cfg.resolve_store_dir(&paths),
    })
}

/// Opens the profile store.
pub fn open_store(cli: &Cli, cfg: &Config) -> anyhow::Result<DirStore> {
    let dir = store_dir(cli, cfg)?;
    print_verbose(cli, &format!("Profile store: {}", dir.display()));
    Ok(DirStore::open(dir)?)
}

/// The voiceprint extractor used for enrollment and matching.
pub fn voiceprint_model() -> FbankStatsModel {
    FbankStatsModel::default()
}

/// Matching parameters from the config file.
pub fn match_config(cfg: &Config) -> MatchConfig {
    MatchConfig {
        enabled: cfg.matching.enabled,
        threshold: cfg.matching.threshold,
        policy: ClusterPolicy {
            min_segment_secs: cfg.matching.min_segment_secs,
            max_segments: cfg.matching.max_segments,
        },
    }
}

/// Enrollment bounds from the config file.
pub fn enroll_config(cfg: &Config) -> EnrollConfig {
    EnrollConfig {
        min_duration_secs: cfg.enrollment.min_duration_secs,
        max_duration_secs: cfg.enrollment.max_duration_secs,
    }
}

/// Asks a yes/no question on the terminal. Non-interactive input answers no.
pub fn confirm(question: &str) -> bool {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return false;
    }
    eprint!("{} [y/N] ", question);
    let _ = io::stderr().flush();

    let mut answer = String::new();
    if stdin.lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Profile as shown by `list` and `show`.
#[derive(Serialize)]
pub struct ProfileView<'a> {
    #[serde(flatten)]
    pub profile: &'a SpeakerProfile,
    pub embedding_dim: usize,
}

impl<'a> From<&'a SpeakerProfile> for ProfileView<'a> {
    fn from(profile: &'a SpeakerProfile) -> Self {
        Self {
            profile,
            embedding_dim: profile.dimension(),
        }
    }
}

/// Whether structured output was requested.
pub fn wants_structured(cli: &Cli) -> bool {
    cli.json || cli.output.is_some()
}

/// Outputs result as JSON or YAML.
pub fn output_result<T: Serialize>(result: &T, output_path: Option<&str>, as_json: bool) -> anyhow::Result<()> {
    let format = if as_json {
        OutputFormat::Json
    } else {
        OutputFormat::Yaml
    };
    Output::new(format, output_path.map(str::to_string)).write(result)
}

/// Prints verbose output if enabled.
pub fn print_verbose(cli: &Cli, msg: &str) {
    voxid_cli::print_verbose(cli.verbose, msg);
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}

/// Prints info message.
pub fn print_info(msg: &str) {
    eprintln!("\x1b[34mℹ\x1b[0m {}", msg);
}

/// Prints warning message.
pub fn print_warning(msg: &str) {
    eprintln!("\x1b[33m⚠\x1b[0m {}", msg);
}

/// Formats seconds as `1m05.0s` / `42.3s`.
pub fn format_duration(secs: f64) -> String {
    if secs >= 60.0 {
        let m = (secs / 60.0).floor();
        format!("{}m{:04.1}s", m as u64, secs - m * 60.0)
    } else {
        format!("{:.1}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_config_from_file_settings() {
        let mut cfg = Config::default();
        cfg.set("matching.threshold", "0.6").unwrap();
        cfg.set("matching.max_segments", "4").unwrap();

        let mc = match_config(&cfg);
        assert!(mc.enabled);
        assert_eq!(mc.threshold, 0.6);
        assert_eq!(mc.policy.max_segments, 4);
        assert_eq!(mc.policy.min_segment_secs, 2.0);
        assert!(mc.validate().is_ok());
    }

    #[test]
    fn test_enroll_config_defaults() {
        let ec = enroll_config(&Config::default());
        assert_eq!(ec, EnrollConfig::default());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(42.34), "42.3s");
        assert_eq!(format_duration(65.0), "1m05.0s");
        assert_eq!(format_duration(60.0), "1m00.0s");
    }
}
