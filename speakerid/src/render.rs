//! Plain-text transcript rendering.
//!
//! ```text
//! ## Speaker Mapping:
//! - SPEAKER_00 → John Doe
//! - SPEAKER_01 → [Not Matched]
//!
//! ---
//!
//! [00:01.50] John Doe: Hello there.
//! [00:04.20] SPEAKER_01: Hi.
//! ```

use std::collections::BTreeMap;

use crate::transcript::TranscriptSegment;

/// Speaker shown for segments without a label.
pub const UNKNOWN_SPEAKER: &str = "UNKNOWN";

const NOT_MATCHED: &str = "[Not Matched]";
const UNKNOWN_DISPLAY: &str = "[Unknown Speaker]";

/// Label -> display text of the mapping header, sorted by label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeakerMapping {
    entries: BTreeMap<String, String>,
}

impl SpeakerMapping {
    /// Builds the header from original label -> resolved name.
    ///
    /// `UNKNOWN` shows as `[Unknown Speaker]`; a `SPEAKER_*` label that
    /// resolved to itself shows as `[Not Matched]`; any other label is shown
    /// as resolved.
    pub fn from_resolved(resolved: &BTreeMap<String, String>) -> Self {
        let entries = resolved
            .iter()
            .map(|(label, name)| {
                let shown = if label == UNKNOWN_SPEAKER {
                    UNKNOWN_DISPLAY.to_string()
                } else if label == name && label.starts_with("SPEAKER_") {
                    NOT_MATCHED.to_string()
                } else {
                    name.clone()
                };
                (label.clone(), shown)
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Formats seconds as `[MM:SS.ss]`.
pub fn format_timestamp(secs: f64) -> String {
    let secs = secs.max(0.0);
    let minutes = (secs / 60.0).floor();
    let rest = secs - minutes * 60.0;
    format!("[{:02}:{:05.2}]", minutes as u64, rest)
}

/// Formats one transcript line.
pub fn render_line(seg: &TranscriptSegment) -> String {
    let speaker = seg.speaker.as_deref().unwrap_or(UNKNOWN_SPEAKER);
    format!("{} {}: {}", format_timestamp(seg.start), speaker, seg.text.trim())
}

/// Renders segments one per line, preceded by the mapping header if given.
pub fn render_text(segments: &[TranscriptSegment], header: Option<&SpeakerMapping>) -> String {
    let mut lines = Vec::with_capacity(segments.len() + 8);

    if let Some(mapping) = header.filter(|m| !m.is_empty()) {
        lines.push("## Speaker Mapping:".to_string());
        for (label, shown) in mapping.entries() {
            lines.push(format!("- {label} → {shown}"));
        }
        lines.push(String::new());
        lines.push("---".to_string());
        lines.push(String::new());
    }

    lines.extend(segments.iter().map(render_line));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps() {
        assert_eq!(format_timestamp(0.0), "[00:00.00]");
        assert_eq!(format_timestamp(1.5), "[00:01.50]");
        assert_eq!(format_timestamp(65.25), "[01:05.25]");
        assert_eq!(format_timestamp(3725.0), "[62:05.00]");
        assert_eq!(format_timestamp(-3.0), "[00:00.00]");
    }

    #[test]
    fn lines() {
        let segs = vec![
            TranscriptSegment::new(1.5, 4.0, Some("John Doe"), "  Hello there. "),
            TranscriptSegment::new(4.2, 5.0, None, "Hi."),
        ];
        assert_eq!(
            render_text(&segs, None),
            "[00:01.50] John Doe: Hello there.\n[00:04.20] UNKNOWN: Hi."
        );
    }

    #[test]
    fn header_rules() {
        let resolved: BTreeMap<String, String> = [
            ("SPEAKER_01", "SPEAKER_01"),
            ("SPEAKER_00", "Arthur"),
            ("UNKNOWN", "UNKNOWN"),
            ("host", "host"),
        ]
        .into_iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();
        let mapping = SpeakerMapping::from_resolved(&resolved);

        let segs = vec![TranscriptSegment::new(0.0, 1.0, Some("Arthur"), "Hey")];
        let text = render_text(&segs, Some(&mapping));
        let expected = "## Speaker Mapping:\n\
                        - SPEAKER_00 → Arthur\n\
                        - SPEAKER_01 → [Not Matched]\n\
                        - UNKNOWN → [Unknown Speaker]\n\
                        - host → host\n\
                        \n\
                        ---\n\
                        \n\
                        [00:00.00] Arthur: Hey";
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_header_is_omitted() {
        let segs = vec![TranscriptSegment::new(0.0, 1.0, Some("A"), "x")];
        let text = render_text(&segs, Some(&SpeakerMapping::default()));
        assert_eq!(text, "[00:00.00] A: x");
    }
}
