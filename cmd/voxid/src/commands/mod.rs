//! CLI commands module.

mod check;
mod config;
mod enroll;
mod matching;
mod speakers;
mod util;

pub use check::CheckCommand;
pub use config::ConfigCommand;
pub use enroll::EnrollCommand;
pub use matching::MatchCommand;
pub use speakers::{DeleteCommand, ListCommand, ShowCommand};

// Re-export utils for use in commands
pub(crate) use util::*;
