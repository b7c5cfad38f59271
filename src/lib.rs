//! Core library surface for the Guitar Repertoire TUI application.
//!
//! The modules exposed here keep the API intentionally small so the `bin`
//! target as well as potential external tooling can reuse the same pieces:
//! the URL extractor, the in-memory store behind its trait, the query
//! transform, and the controller that ties them together.
pub mod extract;
pub mod models;
pub mod query;
pub mod repertoire;
pub mod store;
pub mod ui;

/// URL parsing surface: the validated identifier type and its extractor.
pub use extract::{extract_video_id, InvalidUrl, VideoId};

/// The domain types every other layer manipulates.
pub use models::{Category, CategoryFilter, Song, GENRE_OPTIONS, MAX_GENRES};

/// Controller and the draft/change-set types the forms assemble.
pub use repertoire::{Repertoire, RepertoireError, SongChanges, SongDraft};

/// Storage seam, its in-memory implementation, and the starter collection.
pub use store::{seed_repertoire, MemoryStore, SongStore, StoreError};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
