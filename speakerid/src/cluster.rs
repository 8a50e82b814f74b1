//! Grouping of transcript segments by diarization label.

use std::collections::HashMap;

use crate::transcript::TranscriptSegment;

/// Which segments of a cluster are used to identify it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterPolicy {
    /// Segments must be strictly longer than this, in seconds.
    pub min_segment_secs: f64,

    /// At most this many of the longest qualifying segments are used.
    pub max_segments: usize,
}

impl Default for ClusterPolicy {
    fn default() -> Self {
        Self {
            min_segment_secs: 2.0,
            max_segments: 10,
        }
    }
}

/// All segments sharing one diarization label.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerCluster {
    pub label: String,

    /// Indices into the transcript, in transcript order.
    pub segments: Vec<usize>,

    /// Indices used for identification, longest first.
    pub selected: Vec<usize>,

    /// Resolved display name, set when the cluster is matched.
    pub identity: Option<String>,
}

impl SpeakerCluster {
    /// A cluster with no selected segments is never sent to the extractor.
    pub fn is_identifiable(&self) -> bool {
        !self.selected.is_empty()
    }

    /// The name segments of this cluster end up with.
    pub fn resolved_label(&self) -> &str {
        self.identity.as_deref().unwrap_or(&self.label)
    }
}

/// Groups `segments` by label, in order of each label's first appearance.
/// Unlabeled segments belong to no cluster.
pub fn build_clusters(segments: &[TranscriptSegment], policy: &ClusterPolicy) -> Vec<SpeakerCluster> {
    let mut clusters: Vec<SpeakerCluster> = Vec::new();
    let mut by_label: HashMap<&str, usize> = HashMap::new();

    for (i, seg) in segments.iter().enumerate() {
        let Some(label) = seg.label() else {
            continue;
        };
        let slot = *by_label.entry(label).or_insert_with(|| {
            clusters.push(SpeakerCluster {
                label: label.to_string(),
                segments: Vec::new(),
                selected: Vec::new(),
                identity: None,
            });
            clusters.len() - 1
        });
        clusters[slot].segments.push(i);
    }

    for cluster in &mut clusters {
        cluster.selected = select(segments, &cluster.segments, policy);
    }
    clusters
}

fn select(segments: &[TranscriptSegment], members: &[usize], policy: &ClusterPolicy) -> Vec<usize> {
    let mut selected: Vec<usize> = members
        .iter()
        .copied()
        .filter(|&i| segments[i].duration() > policy.min_segment_secs)
        .collect();
    // stable: equal durations keep transcript order
    selected.sort_by(|&a, &b| segments[b].duration().total_cmp(&segments[a].duration()));
    selected.truncate(policy.max_segments);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, speaker: Option<&str>) -> TranscriptSegment {
        TranscriptSegment::new(start, end, speaker, "")
    }

    #[test]
    fn groups_in_first_seen_order() {
        let segs = vec![
            seg(0.0, 3.0, Some("SPEAKER_01")),
            seg(3.0, 6.0, Some("SPEAKER_00")),
            seg(6.0, 7.0, None),
            seg(7.0, 10.0, Some("SPEAKER_01")),
        ];
        let clusters = build_clusters(&segs, &ClusterPolicy::default());
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].label, "SPEAKER_01");
        assert_eq!(clusters[0].segments, vec![0, 3]);
        assert_eq!(clusters[1].label, "SPEAKER_00");
        assert_eq!(clusters[1].segments, vec![1]);
    }

    #[test]
    fn short_segments_are_not_selected() {
        let segs = vec![
            seg(0.0, 1.5, Some("A")),
            seg(2.0, 3.8, Some("A")),
            seg(4.0, 5.9, Some("A")),
        ];
        let clusters = build_clusters(&segs, &ClusterPolicy::default());
        assert!(clusters[0].selected.is_empty());
        assert!(!clusters[0].is_identifiable());
        assert_eq!(clusters[0].resolved_label(), "A");
    }

    #[test]
    fn exactly_min_duration_is_excluded() {
        let segs = vec![seg(0.0, 2.0, Some("A")), seg(2.0, 4.5, Some("A"))];
        let clusters = build_clusters(&segs, &ClusterPolicy::default());
        assert_eq!(clusters[0].selected, vec![1]);
    }

    #[test]
    fn longest_first_capped() {
        let mut segs = Vec::new();
        let mut t = 0.0;
        for i in 0..15 {
            let d = 2.5 + i as f64;
            segs.push(seg(t, t + d, Some("A")));
            t += d;
        }
        let clusters = build_clusters(&segs, &ClusterPolicy::default());
        let selected = &clusters[0].selected;
        assert_eq!(selected.len(), 10);
        assert_eq!(selected[0], 14);
        assert_eq!(selected[9], 5);
    }

    #[test]
    fn ties_keep_transcript_order() {
        let segs = vec![
            seg(0.0, 3.0, Some("A")),
            seg(3.0, 8.0, Some("A")),
            seg(8.0, 11.0, Some("A")),
        ];
        let policy = ClusterPolicy {
            max_segments: 2,
            ..Default::default()
        };
        let clusters = build_clusters(&segs, &policy);
        assert_eq!(clusters[0].selected, vec![1, 0]);
    }

    #[test]
    fn empty_transcript() {
        assert!(build_clusters(&[], &ClusterPolicy::default()).is_empty());
    }
}
