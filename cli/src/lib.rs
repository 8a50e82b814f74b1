//! CLI utilities for voxid.
//!
//! Configuration file handling, the `~/.voxid` directory layout and
//! structured output shared by the `voxid` command.

pub mod config;
pub mod output;
pub mod paths;

pub use config::{load_config, Config, EnrollmentSettings, MatchingSettings};
pub use output::{print_verbose, Output, OutputFormat};
pub use paths::Paths;
