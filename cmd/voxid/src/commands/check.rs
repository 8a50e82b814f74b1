//! Profile store consistency check.

use clap::Args;

use super::{get_config, open_store, output_result, print_success};
use crate::Cli;

/// Check the profile store for orphan or missing vectors.
///
/// Exits non-zero when the store is inconsistent. Deleting the affected ids
/// repairs it.
#[derive(Args)]
pub struct CheckCommand;

impl CheckCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let store = open_store(cli, &cfg)?;
        let report = store.verify()?;

        output_result(&report, cli.output.as_deref(), cli.json)?;

        if !report.is_clean() {
            anyhow::bail!(
                "profile store {} is inconsistent: {}",
                store.root().display(),
                report.summary()
            );
        }
        print_success(&format!("{} speaker(s), store is consistent", report.profiles));
        Ok(())
    }
}
