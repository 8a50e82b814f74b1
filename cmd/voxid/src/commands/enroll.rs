//! Speaker enrollment command.

use std::path::PathBuf;

use clap::Args;
use voxid_audio::WavConverter;
use voxid_speakerid::{EnrollOutcome, Enroller};

use super::{
    confirm, enroll_config, format_duration, get_config, open_store, output_result, print_success,
    print_verbose, print_warning, voiceprint_model, wants_structured, ProfileView,
};
use crate::Cli;

/// Enroll a speaker from a voice sample.
///
/// The sample should contain only the speaker's voice, between 10 and 60
/// seconds long (longer samples are cut to their first 60 seconds). A copy
/// of the sample is kept in the store's samples/ directory.
#[derive(Args)]
pub struct EnrollCommand {
    /// Voice sample (WAV)
    audio: PathBuf,

    /// Speaker name as it should appear in transcripts
    #[arg(long)]
    name: String,

    /// Overwrite an existing speaker without asking
    #[arg(short = 'y', long)]
    yes: bool,
}

impl EnrollCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let store = open_store(cli, &cfg)?;
        let archive = store.archive();
        let model = voiceprint_model();
        let converter = WavConverter::default();

        print_verbose(cli, &format!("Enrolling {} from {}", self.name, self.audio.display()));

        let enroller = Enroller::new(&model, &converter, &store, &archive, enroll_config(&cfg))?;
        let outcome = enroller.enroll(&self.audio, &self.name, |existing| {
            self.yes
                || confirm(&format!(
                    "Speaker '{}' already exists (enrolled {}). Overwrite?",
                    existing.display_name,
                    existing.created_at.format("%Y-%m-%d %H:%M")
                ))
        })?;

        match outcome {
            EnrollOutcome::Enrolled(profile) => {
                print_success(&format!(
                    "Enrolled '{}' as {} ({})",
                    profile.display_name,
                    profile.id,
                    format_duration(profile.duration_seconds)
                ));
                if wants_structured(cli) {
                    output_result(&ProfileView::from(&profile), cli.output.as_deref(), cli.json)?;
                } else {
                    println!("id:       {}", profile.id);
                    println!("name:     {}", profile.display_name);
                    println!("duration: {}", format_duration(profile.duration_seconds));
                }
                Ok(())
            }
            EnrollOutcome::Cancelled { existing } => {
                print_warning(&format!(
                    "Enrollment cancelled, existing speaker '{}' kept (use -y to overwrite)",
                    existing.id
                ));
                Ok(())
            }
        }
    }
}
