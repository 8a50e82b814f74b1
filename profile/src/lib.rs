//! Enrolled speaker profiles and their persistence.
//!
//! A [`SpeakerProfile`] pairs a display name with a voice embedding. Stores
//! implement [`ProfileStore`]: [`DirStore`] keeps one binary vector file per
//! profile plus a JSON registry, [`MemoryStore`] keeps everything in process.
//!
//! # Example
//!
//! ```ignore
//! use voxid_profile::{DirStore, NewProfile, ProfileMetadata, ProfileStore};
//!
//! let store = DirStore::open("/tmp/speakers")?;
//! store.create(NewProfile::new("john_doe", "John Doe", embedding, ProfileMetadata::default()), false)?;
//! for p in store.list()? {
//!     println!("{} {}", p.id, p.display_name);
//! }
//! ```

mod archive;
mod dir;
mod error;
mod memory;
mod profile;
mod registry;
mod slug;
mod store;
pub mod vecfile;

pub use archive::{SampleArchive, SAMPLES_DIR};
pub use dir::{DimensionMismatch, DirStore, StoreReport, REGISTRY_FILE, VECTOR_EXT};
pub use error::{ProfileError, ProfileResult};
pub use memory::MemoryStore;
pub use profile::{NewProfile, ProfileMetadata, SpeakerProfile};
pub use slug::{derive_id, is_valid_id};
pub use store::ProfileStore;
