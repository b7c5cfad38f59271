//! Orchestrates user intents against the song store: draft validation, id
//! minting, merge-edits, deletion, and list derivation. Every failure path
//! returns a typed error and leaves the store exactly as it was, so the
//! presentation layer can show a message and carry on.

use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::extract::{extract_video_id, InvalidUrl};
use crate::models::{Category, CategoryFilter, Song, GENRE_OPTIONS, MAX_GENRES};
use crate::query;
use crate::store::{SongStore, StoreError};

/// Unvalidated field values collected by an add form, exactly as the user
/// typed them. Validation happens in [`Repertoire::add_song`].
#[derive(Debug, Clone, Default)]
pub struct SongDraft {
    pub title: String,
    pub artist: String,
    /// The URL the user pasted; only the extracted video identifier is kept.
    pub youtube_url: String,
    pub category: Option<Category>,
    /// ISO `YYYY-MM-DD`; blank means "today".
    pub date: String,
    pub period: String,
    pub genres: Vec<String>,
}

/// Partial record for edits. A field left `None` keeps its stored value.
/// There is deliberately no video identifier here: it is fixed at creation
/// and edits never re-derive it.
#[derive(Debug, Clone, Default)]
pub struct SongChanges {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
    /// `Some` replaces the stored period; a blank string clears it.
    pub period: Option<String>,
    pub genres: Option<Vec<String>>,
}

/// Failures surfaced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepertoireError {
    #[error(transparent)]
    InvalidUrl(#[from] InvalidUrl),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("the date must look like 2024-03-15")]
    InvalidDate,
    #[error("a song can carry at most {MAX_GENRES} genre tags")]
    TooManyGenres,
    #[error("unknown genre: {0}")]
    UnknownGenre(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Front door for every mutation of the repertoire, generic over the store
/// seam so a persisted implementation can slot in unchanged.
pub struct Repertoire<S: SongStore> {
    store: S,
    next_id: u64,
}

impl<S: SongStore> Repertoire<S> {
    /// Wrap a store, continuing id assignment after the highest id already
    /// present so seeded collections and fresh ones behave the same.
    pub fn new(store: S) -> Self {
        let next_id = store
            .all()
            .iter()
            .map(|song| song.id)
            .max()
            .map_or(1, |id| id + 1);
        Self { store, next_id }
    }

    /// Validate a draft, mint an id, and insert the new song. Returns the
    /// id so the caller can focus the new entry.
    pub fn add_song(&mut self, draft: SongDraft) -> Result<u64, RepertoireError> {
        let title = required(&draft.title, "title")?;
        let artist = required(&draft.artist, "artist")?;
        let category = draft
            .category
            .ok_or(RepertoireError::MissingField("category"))?;
        let youtube_id = extract_video_id(&draft.youtube_url)?;
        let date = parse_date_or_today(&draft.date)?;
        let genres = check_genres(draft.genres)?;
        let period = normalize_period(category, &draft.period);

        let id = self.next_id;
        self.store.add(Song {
            id,
            title,
            artist,
            youtube_id,
            category,
            date,
            period,
            genres,
        })?;
        self.next_id += 1;
        Ok(id)
    }

    /// Merge a change set into an existing song and write it back. Fields
    /// the change set leaves out keep their stored values; the video
    /// identifier always survives.
    pub fn edit_song(&mut self, id: u64, changes: SongChanges) -> Result<(), RepertoireError> {
        let existing = self
            .store
            .all()
            .iter()
            .find(|song| song.id == id)
            .ok_or(StoreError::NotFound)?
            .clone();

        let category = changes.category.unwrap_or(existing.category);
        let genres = match changes.genres {
            Some(genres) => check_genres(genres)?,
            None => existing.genres,
        };
        // Re-normalize even an untouched period: a category change away from
        // Band drops the cadence.
        let period = match &changes.period {
            Some(period) => normalize_period(category, period),
            None => normalize_period(category, existing.period.as_deref().unwrap_or("")),
        };

        let merged = Song {
            id,
            title: match changes.title {
                Some(title) => required(&title, "title")?,
                None => existing.title,
            },
            artist: match changes.artist {
                Some(artist) => required(&artist, "artist")?,
                None => existing.artist,
            },
            youtube_id: existing.youtube_id,
            category,
            date: changes.date.unwrap_or(existing.date),
            period,
            genres,
        };

        self.store.update(merged)?;
        Ok(())
    }

    /// Drop a song by id. Unconditional and idempotent: deleting something
    /// already gone is fine.
    pub fn delete_song(&mut self, id: u64) {
        self.store.remove(id);
    }

    /// Current display sequence for a tab and search term.
    pub fn list_for(&self, filter: CategoryFilter, search_term: &str) -> Vec<Song> {
        query::query(self.store.all(), search_term, filter)
    }

    /// Unfiltered view of the underlying collection.
    pub fn songs(&self) -> &[Song] {
        self.store.all()
    }

    /// Look up one song by id.
    pub fn song(&self, id: u64) -> Option<&Song> {
        self.store.all().iter().find(|song| song.id == id)
    }
}

/// Presence check shared by the add and edit paths.
fn required(value: &str, field: &'static str) -> Result<String, RepertoireError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(RepertoireError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// A blank draft date means "today"; anything else must parse as ISO
/// `YYYY-MM-DD`.
fn parse_date_or_today(raw: &str) -> Result<NaiveDate, RepertoireError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Ok(Local::now().date_naive())
    } else {
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| RepertoireError::InvalidDate)
    }
}

/// Require vocabulary membership, collapse duplicates while keeping
/// insertion order, and cap the count.
fn check_genres(genres: Vec<String>) -> Result<Vec<String>, RepertoireError> {
    let mut kept: Vec<String> = Vec::with_capacity(genres.len());
    for genre in genres {
        if !GENRE_OPTIONS.contains(&genre.as_str()) {
            return Err(RepertoireError::UnknownGenre(genre));
        }
        if !kept.contains(&genre) {
            kept.push(genre);
        }
    }
    if kept.len() > MAX_GENRES {
        return Err(RepertoireError::TooManyGenres);
    }
    Ok(kept)
}

/// The rehearsal cadence only means something for band songs; every other
/// shelf stores no period at all. Blank input normalizes to `None`.
fn normalize_period(category: Category, period: &str) -> Option<String> {
    if category != Category::Band {
        return None;
    }
    let trimmed = period.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{seed_repertoire, MemoryStore};

    fn seeded() -> Repertoire<MemoryStore> {
        Repertoire::new(MemoryStore::with_songs(seed_repertoire().unwrap()))
    }

    fn draft(title: &str, url: &str) -> SongDraft {
        SongDraft {
            title: title.to_string(),
            artist: "Some Artist".to_string(),
            youtube_url: url.to_string(),
            category: Some(Category::Practice),
            date: "2024-04-01".to_string(),
            period: String::new(),
            genres: vec!["Rock".to_string()],
        }
    }

    #[test]
    fn add_song_extracts_video_id() {
        let mut repertoire = seeded();
        let id = repertoire
            .add_song(draft(
                "Creep",
                "https://www.youtube.com/watch?v=6hzrDeceEKc",
            ))
            .unwrap();

        let stored = repertoire.song(id).unwrap();
        assert_eq!(stored.youtube_id.as_str(), "6hzrDeceEKc");
        assert_eq!(stored.title, "Creep");
    }

    #[test]
    fn add_song_rejects_bad_url_without_mutating() {
        let mut repertoire = seeded();
        let before = repertoire.songs().len();

        let result = repertoire.add_song(draft("Creep", "not a url"));
        assert_eq!(result, Err(RepertoireError::InvalidUrl(InvalidUrl)));
        assert_eq!(repertoire.songs().len(), before);
    }

    #[test]
    fn add_song_requires_presence() {
        let mut repertoire = seeded();

        let mut missing_title = draft("", "https://youtu.be/6hzrDeceEKc");
        missing_title.title = "   ".to_string();
        assert_eq!(
            repertoire.add_song(missing_title),
            Err(RepertoireError::MissingField("title"))
        );

        let mut missing_category = draft("Creep", "https://youtu.be/6hzrDeceEKc");
        missing_category.category = None;
        assert_eq!(
            repertoire.add_song(missing_category),
            Err(RepertoireError::MissingField("category"))
        );
    }

    #[test]
    fn add_song_defaults_blank_date_to_today() {
        let mut repertoire = seeded();
        let mut blank_date = draft("Creep", "https://youtu.be/6hzrDeceEKc");
        blank_date.date = String::new();

        let id = repertoire.add_song(blank_date).unwrap();
        assert_eq!(
            repertoire.song(id).unwrap().date,
            Local::now().date_naive()
        );
    }

    #[test]
    fn add_song_rejects_malformed_date() {
        let mut repertoire = seeded();
        let mut bad_date = draft("Creep", "https://youtu.be/6hzrDeceEKc");
        bad_date.date = "03/15/2024".to_string();
        assert_eq!(
            repertoire.add_song(bad_date),
            Err(RepertoireError::InvalidDate)
        );
    }

    #[test]
    fn add_song_caps_genres_and_checks_vocabulary() {
        let mut repertoire = seeded();

        let mut too_many = draft("Creep", "https://youtu.be/6hzrDeceEKc");
        too_many.genres = vec![
            "Rock".to_string(),
            "Blues".to_string(),
            "Jazz".to_string(),
            "Metal".to_string(),
        ];
        assert_eq!(
            repertoire.add_song(too_many),
            Err(RepertoireError::TooManyGenres)
        );

        let mut unknown = draft("Creep", "https://youtu.be/6hzrDeceEKc");
        unknown.genres = vec!["Vaporwave".to_string()];
        assert_eq!(
            repertoire.add_song(unknown),
            Err(RepertoireError::UnknownGenre("Vaporwave".to_string()))
        );

        let mut duplicated = draft("Creep", "https://youtu.be/6hzrDeceEKc");
        duplicated.genres = vec!["Rock".to_string(), "Rock".to_string()];
        let id = repertoire.add_song(duplicated).unwrap();
        assert_eq!(repertoire.song(id).unwrap().genres, ["Rock"]);
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut repertoire = seeded();
        let first = repertoire
            .add_song(draft("One", "https://youtu.be/6hzrDeceEKc"))
            .unwrap();
        let second = repertoire
            .add_song(draft("Two", "https://youtu.be/6hzrDeceEKc"))
            .unwrap();
        assert!(second > first);
        assert!(first > 3, "seeded ids are 1..=3");
    }

    #[test]
    fn edit_preserves_unspecified_fields_and_video_id() {
        let mut repertoire = seeded();
        repertoire
            .edit_song(
                1,
                SongChanges {
                    title: Some("Wonderwall (acoustic)".to_string()),
                    ..SongChanges::default()
                },
            )
            .unwrap();

        let song = repertoire.song(1).unwrap();
        assert_eq!(song.title, "Wonderwall (acoustic)");
        assert_eq!(song.artist, "Oasis");
        assert_eq!(song.youtube_id.as_str(), "6hzrDeceEKc");
        assert_eq!(song.period.as_deref(), Some("Weekly on Tuesdays"));
        assert_eq!(song.genres, ["Rock", "Pop Rock"]);
    }

    #[test]
    fn edit_missing_id_is_not_found() {
        let mut repertoire = seeded();
        assert_eq!(
            repertoire.edit_song(99, SongChanges::default()),
            Err(RepertoireError::Store(StoreError::NotFound))
        );
    }

    #[test]
    fn edit_genre_overrun_leaves_record_untouched() {
        let mut repertoire = seeded();
        let result = repertoire.edit_song(
            1,
            SongChanges {
                genres: Some(vec![
                    "Rock".to_string(),
                    "Blues".to_string(),
                    "Jazz".to_string(),
                    "Metal".to_string(),
                ]),
                ..SongChanges::default()
            },
        );
        assert_eq!(result, Err(RepertoireError::TooManyGenres));
        assert_eq!(repertoire.song(1).unwrap().genres, ["Rock", "Pop Rock"]);
    }

    #[test]
    fn leaving_the_band_shelf_drops_the_period() {
        let mut repertoire = seeded();
        repertoire
            .edit_song(
                1,
                SongChanges {
                    category: Some(Category::Wishlist),
                    ..SongChanges::default()
                },
            )
            .unwrap();
        assert_eq!(repertoire.song(1).unwrap().period, None);
    }

    #[test]
    fn blank_period_clears_the_stored_one() {
        let mut repertoire = seeded();
        repertoire
            .edit_song(
                1,
                SongChanges {
                    period: Some("  ".to_string()),
                    ..SongChanges::default()
                },
            )
            .unwrap();
        assert_eq!(repertoire.song(1).unwrap().period, None);
    }

    #[test]
    fn delete_is_idempotent() {
        let mut repertoire = seeded();
        repertoire.delete_song(2);
        assert!(repertoire.song(2).is_none());
        let len = repertoire.songs().len();
        repertoire.delete_song(2);
        assert_eq!(repertoire.songs().len(), len);
    }

    #[test]
    fn list_for_runs_the_seeded_scenario() {
        let repertoire = seeded();

        let matches = repertoire.list_for(CategoryFilter::All, "child");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, 2);

        let band = repertoire.list_for(CategoryFilter::Only(Category::Band), "");
        assert!(band.iter().all(|song| song.category == Category::Band));
        assert_eq!(band.len(), 1);
    }
}
