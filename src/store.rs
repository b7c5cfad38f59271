//! The live song collection and the storage seam in front of it. The whole
//! collection is process-lifetime state: it starts from the seeded repertoire
//! and is gone when the program exits. That gap is deliberate; the trait
//! below is the slot a persisted implementation would fill without the
//! controller noticing.

use anyhow::{Context, Result};
use thiserror::Error;

use crate::extract::VideoId;
use crate::models::{Category, Song};

/// Failures surfaced by [`SongStore`] implementations. Every failure leaves
/// the collection exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// An add collided with an id already in the collection. The controller's
    /// counter makes this unreachable in practice, but the contract keeps it.
    #[error("a song with id {0} already exists")]
    DuplicateId(u64),
    /// An update targeted an id that is not in the collection.
    #[error("song not found")]
    NotFound,
}

/// Storage capability set for the repertoire: add, update, remove, read.
pub trait SongStore {
    /// Insert at the head of the collection, so the newest entry leads before
    /// any explicit sorting. Fails with [`StoreError::DuplicateId`] when the
    /// id is already taken.
    fn add(&mut self, song: Song) -> Result<(), StoreError>;

    /// Replace the record with the matching id in place, preserving its
    /// position. Fails with [`StoreError::NotFound`] when there is none.
    fn update(&mut self, song: Song) -> Result<(), StoreError>;

    /// Delete by id. Removing an id that is not present is a no-op, so a
    /// double-tap on delete never surfaces an error.
    fn remove(&mut self, id: u64);

    /// Read-only view of the full collection.
    fn all(&self) -> &[Song];
}

/// The in-memory store. A plain `Vec` is plenty at repertoire scale.
#[derive(Debug, Default)]
pub struct MemoryStore {
    songs: Vec<Song>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing collection, e.g. the seeded repertoire.
    pub fn with_songs(songs: Vec<Song>) -> Self {
        Self { songs }
    }
}

impl SongStore for MemoryStore {
    fn add(&mut self, song: Song) -> Result<(), StoreError> {
        if self.songs.iter().any(|existing| existing.id == song.id) {
            return Err(StoreError::DuplicateId(song.id));
        }
        self.songs.insert(0, song);
        Ok(())
    }

    fn update(&mut self, song: Song) -> Result<(), StoreError> {
        match self.songs.iter_mut().find(|existing| existing.id == song.id) {
            Some(slot) => {
                *slot = song;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn remove(&mut self, id: u64) {
        self.songs.retain(|song| song.id != id);
    }

    fn all(&self) -> &[Song] {
        &self.songs
    }
}

/// The starter collection shown on first launch.
pub fn seed_repertoire() -> Result<Vec<Song>> {
    Ok(vec![
        Song {
            id: 1,
            title: "Wonderwall".to_string(),
            artist: "Oasis".to_string(),
            youtube_id: VideoId::new("6hzrDeceEKc")?,
            category: Category::Band,
            date: seed_date("2024-03-15")?,
            period: Some("Weekly on Tuesdays".to_string()),
            genres: vec!["Rock".to_string(), "Pop Rock".to_string()],
        },
        Song {
            id: 2,
            title: "Sweet Child O' Mine".to_string(),
            artist: "Guns N' Roses".to_string(),
            youtube_id: VideoId::new("1w7OgIMMRc4")?,
            category: Category::Practice,
            date: seed_date("2024-03-10")?,
            period: None,
            genres: vec!["Hard Rock".to_string(), "Classic Rock".to_string()],
        },
        Song {
            id: 3,
            title: "Stairway to Heaven".to_string(),
            artist: "Led Zeppelin".to_string(),
            youtube_id: VideoId::new("QkF3oxziUI4")?,
            category: Category::Wishlist,
            date: seed_date("2024-03-05")?,
            period: None,
            genres: vec!["Rock".to_string(), "Classic Rock".to_string()],
        },
    ])
}

fn seed_date(iso: &str) -> Result<chrono::NaiveDate> {
    iso.parse().context("invalid seed date")
}
