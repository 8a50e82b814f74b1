//! Profile listing and removal commands.

use clap::Args;
use voxid_profile::ProfileStore;

use super::{
    format_duration, get_config, open_store, output_result, print_info, print_success,
    wants_structured, ProfileView,
};
use crate::Cli;

/// List enrolled speakers in enrollment order.
#[derive(Args)]
pub struct ListCommand;

impl ListCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let store = open_store(cli, &cfg)?;
        let profiles = store.list()?;

        if wants_structured(cli) {
            let views: Vec<ProfileView> = profiles.iter().map(ProfileView::from).collect();
            return output_result(&views, cli.output.as_deref(), cli.json);
        }

        if profiles.is_empty() {
            print_info("No speakers enrolled");
            return Ok(());
        }

        println!(
            "{:<20} {:<24} {:<17} {:>9} {}",
            "ID", "NAME", "CREATED", "DURATION", "MODEL"
        );
        for p in &profiles {
            println!(
                "{:<20} {:<24} {:<17} {:>9} {}",
                p.id,
                p.display_name,
                p.created_at.format("%Y-%m-%d %H:%M"),
                format_duration(p.duration_seconds),
                p.model_id
            );
        }
        Ok(())
    }
}

/// Show one enrolled speaker.
#[derive(Args)]
pub struct ShowCommand {
    /// Speaker id
    id: String,
}

impl ShowCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let store = open_store(cli, &cfg)?;

        let profile = store
            .get(&self.id)?
            .ok_or_else(|| anyhow::anyhow!("speaker '{}' not found", self.id))?;

        output_result(&ProfileView::from(&profile), cli.output.as_deref(), cli.json)
    }
}

/// Delete an enrolled speaker.
///
/// The archived enrollment sample is kept.
#[derive(Args)]
pub struct DeleteCommand {
    /// Speaker id
    id: String,
}

impl DeleteCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let store = open_store(cli, &cfg)?;

        if !store.delete(&self.id)? {
            anyhow::bail!("speaker '{}' not found", self.id);
        }
        print_success(&format!("Speaker '{}' deleted", self.id));
        Ok(())
    }
}
