//! Transcript relabeling command.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use voxid_audio::{AudioConverter, WavConverter};
use voxid_speakerid::{identify, render_text, ClusterReport, Decision, Transcript};

use super::{
    get_config, match_config, open_store, output_result, print_success, print_verbose,
    print_warning, voiceprint_model, wants_structured,
};
use crate::Cli;

/// Relabel a diarized transcript with enrolled speakers.
///
/// Reads a WhisperX JSON transcript, identifies each SPEAKER_XX cluster
/// against the enrolled profiles and writes a plain text transcript. When
/// matching is disabled, no profiles exist, or the audio cannot be read, the
/// original labels are kept.
#[derive(Args)]
pub struct MatchCommand {
    /// WhisperX JSON transcript
    #[arg(long)]
    transcript: PathBuf,

    /// Audio the transcript was made from (WAV)
    #[arg(long)]
    audio: PathBuf,

    /// Text transcript to write
    #[arg(long)]
    output_txt: PathBuf,

    /// Also write the relabeled JSON transcript
    #[arg(long)]
    output_json: Option<PathBuf>,

    /// Similarity threshold in [0, 1] (overrides the config file)
    #[arg(long)]
    threshold: Option<f32>,

    /// Keep the diarization labels, only convert to text
    #[arg(long)]
    no_match: bool,
}

#[derive(Serialize)]
struct ClusterSummary {
    label: String,
    speaker: String,
    segments: usize,
    used_segments: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    best_profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f32>,
    decision: &'static str,
}

impl From<&ClusterReport> for ClusterSummary {
    fn from(r: &ClusterReport) -> Self {
        Self {
            label: r.label.clone(),
            speaker: r.resolved().to_string(),
            segments: r.segments,
            used_segments: r.extracted,
            best_profile: r.best.as_ref().map(|c| c.profile_id.clone()),
            score: r.best.as_ref().map(|c| c.score),
            decision: decision_name(&r.decision),
        }
    }
}

fn decision_name(d: &Decision) -> &'static str {
    match d {
        Decision::Matched => "matched",
        Decision::BelowThreshold => "below_threshold",
        Decision::NoSelectedSegments => "no_long_segments",
        Decision::ExtractionFailed => "extraction_failed",
        Decision::NoProfiles => "no_profiles",
        Decision::Disabled => "disabled",
    }
}

impl MatchCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let mut match_cfg = match_config(&cfg);
        if let Some(t) = self.threshold {
            match_cfg.threshold = t;
        }
        if self.no_match {
            match_cfg.enabled = false;
        }
        match_cfg.validate()?;

        let transcript = Transcript::load(&self.transcript)?;
        print_verbose(
            cli,
            &format!("Loaded {} segment(s) from {}", transcript.segments.len(), self.transcript.display()),
        );

        let store = open_store(cli, &cfg)?;
        let model = voiceprint_model();

        let audio = if match_cfg.enabled {
            match WavConverter::default().to_canonical(&self.audio) {
                Ok(pcm) => Some(pcm),
                Err(e) => {
                    print_warning(&format!(
                        "cannot read audio {}: {}; keeping original labels",
                        self.audio.display(),
                        e
                    ));
                    None
                }
            }
        } else {
            None
        };

        let outcome = identify(&store, &model, audio.as_ref(), &transcript.segments, &match_cfg)?;

        let text = render_text(&outcome.segments, outcome.header().as_ref());
        std::fs::write(&self.output_txt, text)?;

        if let Some(path) = &self.output_json {
            let relabeled = Transcript {
                segments: outcome.segments.clone(),
                extra: transcript.extra.clone(),
            };
            relabeled.save(path)?;
            print_verbose(cli, &format!("Wrote {}", path.display()));
        }

        print_success(&format!(
            "Identified {} of {} speaker(s), wrote {}",
            outcome.matched(),
            outcome.clusters.len(),
            self.output_txt.display()
        ));

        let summary: Vec<ClusterSummary> = outcome.clusters.iter().map(ClusterSummary::from).collect();
        if wants_structured(cli) {
            output_result(&summary, cli.output.as_deref(), cli.json)?;
        } else {
            for s in &summary {
                match s.score {
                    Some(score) => eprintln!("  {} -> {} ({}, score {:.4})", s.label, s.speaker, s.decision, score),
                    None => eprintln!("  {} -> {} ({})", s.label, s.speaker, s.decision),
                }
            }
        }
        Ok(())
    }
}
