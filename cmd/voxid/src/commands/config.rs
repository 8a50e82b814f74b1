//! Configuration management commands.

use clap::{Args, Subcommand};

use super::{get_config, output_result, print_success};
use crate::Cli;

/// Manage CLI configuration.
///
/// Configuration is stored in ~/.voxid/config.yaml
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// View the current configuration
    View,
    /// Print the config file path
    Path,
    /// Set a configuration value (e.g. matching.threshold 0.8)
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },
}

impl ConfigCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ConfigSubcommand::View => {
                let cfg = get_config(cli)?;
                output_result(&cfg, cli.output.as_deref(), cli.json)
            }

            ConfigSubcommand::Path => {
                let cfg = get_config(cli)?;
                println!("{}", cfg.path().display());
                Ok(())
            }

            ConfigSubcommand::Set { key, value } => {
                let mut cfg = get_config(cli)?;
                cfg.set(key, value)?;
                cfg.save()?;
                print_success(&format!("{} = {}", key, value));
                Ok(())
            }
        }
    }
}
