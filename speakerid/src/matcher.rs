//! Cluster-to-profile matching.
//!
//! For every identifiable cluster the matcher embeds each selected segment,
//! averages the embeddings, scores the average against every comparable
//! profile by cosine similarity, and relabels the whole cluster when the
//! best score reaches the threshold. A failure inside one cluster never
//! affects another.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};
use voxid_audio::PcmBuffer;
use voxid_profile::{ProfileStore, SpeakerProfile};
use voxid_voiceprint::{cosine_similarity, mean_embedding, VoiceprintModel};

use crate::cluster::{build_clusters, ClusterPolicy, SpeakerCluster};
use crate::error::{Result, SpeakerIdError};
use crate::render::SpeakerMapping;
use crate::transcript::TranscriptSegment;

/// Default minimum cosine similarity for a match.
pub const DEFAULT_THRESHOLD: f32 = 0.75;

/// Matching parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// When false the transcript is returned unchanged.
    pub enabled: bool,

    /// Inclusive score threshold in `[0, 1]`.
    pub threshold: f32,

    pub policy: ClusterPolicy,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_THRESHOLD,
            policy: ClusterPolicy::default(),
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(SpeakerIdError::Config(format!(
                "threshold {} must lie in [0, 1]",
                self.threshold
            )));
        }
        if !self.policy.min_segment_secs.is_finite() || self.policy.min_segment_secs < 0.0 {
            return Err(SpeakerIdError::Config(format!(
                "min_segment_secs {} must be a non-negative number",
                self.policy.min_segment_secs
            )));
        }
        if self.policy.max_segments == 0 {
            return Err(SpeakerIdError::Config("max_segments must be at least 1".into()));
        }
        Ok(())
    }
}

/// Best-scoring profile for a cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub profile_id: String,
    pub display_name: String,
    pub score: f32,
}

/// Why a cluster ended up with the label it has.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Relabeled with the candidate's display name.
    Matched,
    /// Best score was below the threshold.
    BelowThreshold,
    /// No segment was long enough to embed.
    NoSelectedSegments,
    /// Every selected segment failed extraction.
    ExtractionFailed,
    /// No comparable profile to score against.
    NoProfiles,
    /// Matching was disabled.
    Disabled,
}

/// Per-cluster result of a matching run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterReport {
    pub label: String,
    pub segments: usize,
    pub selected: usize,
    /// Selected segments whose embedding was extracted.
    pub extracted: usize,
    pub best: Option<Candidate>,
    pub decision: Decision,
}

impl ClusterReport {
    /// Display name if matched, otherwise the original label.
    pub fn resolved(&self) -> &str {
        match (&self.decision, &self.best) {
            (Decision::Matched, Some(c)) => &c.display_name,
            _ => &self.label,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.decision == Decision::Matched
    }
}

/// Output of [`Matcher::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    /// The input segments with labels rewritten. Text and timing are untouched.
    pub segments: Vec<TranscriptSegment>,

    /// One report per cluster, in first-seen order.
    pub clusters: Vec<ClusterReport>,

    /// True when there was at least one comparable profile to score against.
    pub scored: bool,
}

impl MatchOutcome {
    /// Original label -> resolved name, for every cluster.
    pub fn mapping(&self) -> BTreeMap<String, String> {
        self.clusters
            .iter()
            .map(|c| (c.label.clone(), c.resolved().to_string()))
            .collect()
    }

    pub fn matched(&self) -> usize {
        self.clusters.iter().filter(|c| c.is_matched()).count()
    }

    /// Mapping header for the rendered transcript; only present when
    /// profiles were actually scored.
    pub fn header(&self) -> Option<SpeakerMapping> {
        self.scored.then(|| SpeakerMapping::from_resolved(&self.mapping()))
    }
}

/// Matcher relabels diarization clusters with enrolled identities.
pub struct Matcher<'a> {
    model: &'a dyn VoiceprintModel,
    config: MatchConfig,
}

impl<'a> Matcher<'a> {
    pub fn new(model: &'a dyn VoiceprintModel, config: MatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { model, config })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Matches every cluster of `segments` against `profiles`.
    ///
    /// `audio` is the canonical recording the segment times refer to; `None`
    /// means it could not be loaded, which leaves every cluster unmatched.
    pub fn run(
        &self,
        segments: &[TranscriptSegment],
        audio: Option<&PcmBuffer>,
        profiles: &[SpeakerProfile],
    ) -> MatchOutcome {
        let mut clusters = build_clusters(segments, &self.config.policy);

        if !self.config.enabled {
            debug!("speaker matching disabled");
            let reports = unscored(&clusters, Decision::Disabled);
            return finish(segments, &clusters, reports, false);
        }

        let comparable = self.comparable(profiles);
        if comparable.is_empty() {
            info!(clusters = clusters.len(), "no speaker profiles to match against");
            let reports = unscored(&clusters, Decision::NoProfiles);
            return finish(segments, &clusters, reports, false);
        }

        let mut reports = Vec::with_capacity(clusters.len());
        for cluster in &mut clusters {
            let report = self.match_cluster(cluster, segments, audio, &comparable);
            if report.is_matched() {
                cluster.identity = Some(report.resolved().to_string());
            }
            reports.push(report);
        }

        finish(segments, &clusters, reports, true)
    }

    /// Profiles produced by the active extractor.
    fn comparable<'p>(&self, profiles: &'p [SpeakerProfile]) -> Vec<&'p SpeakerProfile> {
        let model_id = self.model.model_id();
        profiles
            .iter()
            .filter(|p| {
                if p.model_id != model_id {
                    warn!(
                        profile = %p.id,
                        profile_model = %p.model_id,
                        active_model = %model_id,
                        "skipping profile from a different model"
                    );
                    return false;
                }
                true
            })
            .collect()
    }

    fn match_cluster(
        &self,
        cluster: &SpeakerCluster,
        segments: &[TranscriptSegment],
        audio: Option<&PcmBuffer>,
        profiles: &[&SpeakerProfile],
    ) -> ClusterReport {
        let mut report = ClusterReport {
            label: cluster.label.clone(),
            segments: cluster.segments.len(),
            selected: cluster.selected.len(),
            extracted: 0,
            best: None,
            decision: Decision::NoSelectedSegments,
        };

        if !cluster.is_identifiable() {
            info!(label = %cluster.label, "no segment long enough, label unchanged");
            return report;
        }

        let embeddings = self.extract_cluster(cluster, segments, audio);
        report.extracted = embeddings.len();
        let representative = match mean_embedding(&embeddings) {
            Ok(v) => v,
            Err(e) => {
                warn!(label = %cluster.label, error = %e, "no usable embedding, label unchanged");
                report.decision = Decision::ExtractionFailed;
                return report;
            }
        };

        let mut best: Option<Candidate> = None;
        for profile in profiles {
            let score = cosine_similarity(&representative, &profile.embedding);
            debug!(label = %cluster.label, profile = %profile.id, score, "similarity");
            // strict: the first-listed profile wins a tie
            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(Candidate {
                    profile_id: profile.id.clone(),
                    display_name: profile.display_name.clone(),
                    score,
                });
            }
        }

        report.decision = match &best {
            Some(c) if c.score >= self.config.threshold => {
                info!(label = %cluster.label, name = %c.display_name, score = c.score, "matched");
                Decision::Matched
            }
            Some(c) => {
                info!(
                    label = %cluster.label,
                    best = %c.display_name,
                    score = c.score,
                    threshold = self.config.threshold,
                    "no match"
                );
                Decision::BelowThreshold
            }
            None => Decision::NoProfiles,
        };
        report.best = best;
        report
    }

    /// One extractor call per selected segment; failures are skipped.
    fn extract_cluster(
        &self,
        cluster: &SpeakerCluster,
        segments: &[TranscriptSegment],
        audio: Option<&PcmBuffer>,
    ) -> Vec<Vec<f32>> {
        let Some(audio) = audio else {
            warn!(label = %cluster.label, "no audio available, skipping extraction");
            return Vec::new();
        };

        let mut embeddings = Vec::with_capacity(cluster.selected.len());
        for &i in &cluster.selected {
            let seg = &segments[i];
            let slice = audio.slice_secs(seg.start, seg.end);
            match self.model.extract(slice, audio.sample_rate()) {
                Ok(v) => embeddings.push(v),
                Err(e) => warn!(
                    label = %cluster.label,
                    start = seg.start,
                    end = seg.end,
                    error = %e,
                    "segment extraction failed, skipping"
                ),
            }
        }
        embeddings
    }
}

fn unscored(clusters: &[SpeakerCluster], decision: Decision) -> Vec<ClusterReport> {
    clusters
        .iter()
        .map(|c| ClusterReport {
            label: c.label.clone(),
            segments: c.segments.len(),
            selected: c.selected.len(),
            extracted: 0,
            best: None,
            decision: decision.clone(),
        })
        .collect()
}

/// Rewrites the label of every segment of a resolved cluster.
fn finish(
    segments: &[TranscriptSegment],
    clusters: &[SpeakerCluster],
    reports: Vec<ClusterReport>,
    scored: bool,
) -> MatchOutcome {
    let mut out = segments.to_vec();
    for cluster in clusters {
        if let Some(name) = &cluster.identity {
            for &i in &cluster.segments {
                out[i].speaker = Some(name.clone());
            }
        }
    }
    MatchOutcome {
        segments: out,
        clusters: reports,
        scored,
    }
}

/// Loads the profile set once and runs the matcher.
///
/// A store failure aborts the run; everything after that is isolated per
/// cluster.
pub fn identify(
    store: &dyn ProfileStore,
    model: &dyn VoiceprintModel,
    audio: Option<&PcmBuffer>,
    segments: &[TranscriptSegment],
    config: &MatchConfig,
) -> Result<MatchOutcome> {
    let matcher = Matcher::new(model, config.clone())?;
    let profiles = if config.enabled { store.list()? } else { Vec::new() };
    debug!(profiles = profiles.len(), segments = segments.len(), "identifying speakers");
    Ok(matcher.run(segments, audio, &profiles))
}
