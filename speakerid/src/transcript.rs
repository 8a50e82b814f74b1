//! Diarized transcripts in WhisperX JSON form.
//!
//! ```json
//! {"segments": [{"start": 0.0, "end": 4.2, "speaker": "SPEAKER_00", "text": "Hi."}], "language": "en"}
//! ```
//!
//! Fields the matcher does not use (`words`, `language`, ...) are kept so a
//! relabeled transcript can be written back without losing data.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SpeakerIdError};

/// One diarized utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds.
    #[serde(default)]
    pub start: f64,

    /// End time in seconds.
    #[serde(default)]
    pub end: f64,

    /// Diarization label (`SPEAKER_00`), or a resolved name after matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,

    #[serde(default)]
    pub text: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TranscriptSegment {
    pub fn new(start: f64, end: f64, speaker: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            speaker: speaker.map(str::to_string),
            text: text.into(),
            extra: Map::new(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// The diarization label, treating an empty string as unlabeled.
    pub fn label(&self) -> Option<&str> {
        self.speaker.as_deref().filter(|s| !s.is_empty())
    }
}

/// A whole transcript document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Transcript {
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        Self {
            segments,
            extra: Map::new(),
        }
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SpeakerIdError::NotFound(format!(
                "transcript {}",
                path.display()
            )));
        }
        let data = fs::read_to_string(path).map_err(|e| {
            SpeakerIdError::Transcript(format!("read {}: {e}", path.display()))
        })?;
        Self::from_json(&data)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?).map_err(|e| {
            SpeakerIdError::Transcript(format!("write {}: {e}", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHISPERX: &str = r#"{
        "segments": [
            {"start": 0.5, "end": 3.25, "speaker": "SPEAKER_00", "text": " Hello there.",
             "words": [{"word": "Hello", "start": 0.5}]},
            {"start": 3.3, "end": 4.0, "text": "unlabeled"},
            {"start": 4.0, "end": 9.0, "speaker": "", "text": "empty label"}
        ],
        "language": "en"
    }"#;

    #[test]
    fn parses_whisperx() {
        let t = Transcript::from_json(WHISPERX).unwrap();
        assert_eq!(t.segments.len(), 3);
        assert_eq!(t.segments[0].label(), Some("SPEAKER_00"));
        assert!((t.segments[0].duration() - 2.75).abs() < 1e-9);
        assert_eq!(t.segments[1].label(), None);
        assert_eq!(t.segments[2].label(), None);
        assert_eq!(t.extra["language"], "en");
    }

    #[test]
    fn preserves_unknown_fields() {
        let mut t = Transcript::from_json(WHISPERX).unwrap();
        t.segments[0].speaker = Some("John Doe".into());

        let back: Value = serde_json::from_str(&t.to_json().unwrap()).unwrap();
        assert_eq!(back["language"], "en");
        assert_eq!(back["segments"][0]["speaker"], "John Doe");
        assert_eq!(back["segments"][0]["words"][0]["word"], "Hello");
        assert!(back["segments"][1].get("speaker").is_none());
    }

    #[test]
    fn missing_segments_is_empty() {
        let t = Transcript::from_json(r#"{"text": "x"}"#).unwrap();
        assert!(t.segments.is_empty());
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Transcript::load(&dir.path().join("none.json")).unwrap_err();
        assert!(matches!(err, SpeakerIdError::NotFound(_)));
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(
            Transcript::from_json("{not json"),
            Err(SpeakerIdError::Transcript(_))
        ));
    }
}
