//! Speaker identification for diarized transcripts.
//!
//! Diarization labels segments with anonymous ids (`SPEAKER_00`). This crate
//! replaces those ids with the names of enrolled speakers:
//!
//! 1. [`Enroller`]: voice sample -> stored [`voxid_profile::SpeakerProfile`]
//! 2. [`build_clusters`]: transcript -> one [`SpeakerCluster`] per label
//! 3. [`Matcher`]: cluster audio -> averaged embedding -> best profile
//! 4. [`render_text`]: relabeled segments -> plain text
//!
//! # Example
//!
//! ```ignore
//! use voxid_speakerid::{identify, render_text, MatchConfig, Transcript};
//!
//! let transcript = Transcript::load(Path::new("meeting.json"))?;
//! let audio = WavConverter::default().to_canonical(Path::new("meeting.wav"))?;
//! let outcome = identify(&store, &model, Some(&audio), &transcript.segments, &MatchConfig::default())?;
//! println!("{}", render_text(&outcome.segments, outcome.header().as_ref()));
//! ```

mod cluster;
mod enroll;
mod error;
mod matcher;
mod render;
mod transcript;

pub use cluster::{build_clusters, ClusterPolicy, SpeakerCluster};
pub use enroll::{EnrollConfig, EnrollOutcome, Enroller};
pub use error::{Result, SpeakerIdError};
pub use matcher::{identify, Candidate, ClusterReport, Decision, MatchConfig, MatchOutcome, Matcher, DEFAULT_THRESHOLD};
pub use render::{format_timestamp, render_line, render_text, SpeakerMapping, UNKNOWN_SPEAKER};
pub use transcript::{Transcript, TranscriptSegment};
