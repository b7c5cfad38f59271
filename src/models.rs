//! Domain models shared between the repertoire core and the TUI. These types
//! stay light-weight data holders so other layers can focus on validation and
//! presentation logic; the flows that construct them (see `repertoire`) are
//! responsible for upholding the invariants documented on each field.

use std::fmt;

use chrono::NaiveDate;

use crate::extract::VideoId;

/// Fixed vocabulary offered by the genre picker. The presentation layer may
/// grow this list; the validation path only ever checks membership.
pub const GENRE_OPTIONS: &[&str] = &[
    "Rock",
    "Classic Rock",
    "Hard Rock",
    "Blues",
    "Jazz",
    "Metal",
    "Pop Rock",
    "Alternative",
    "Indie",
    "Folk",
    "Acoustic",
];

/// Upper bound on genre tags per song.
pub const MAX_GENRES: usize = 3;

/// Closed set of shelves a song can live on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Band,
    Practice,
    Wishlist,
}

impl Category {
    /// Every category, in the order the tab row presents them.
    pub const ALL: [Category; 3] = [Category::Band, Category::Practice, Category::Wishlist];

    /// Stable machine name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Band => "band",
            Category::Practice => "practice",
            Category::Wishlist => "wishlist",
        }
    }

    /// Human-facing label shown on tabs and in the form.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Band => "Band Rehearsal",
            Category::Practice => "Personal Practice",
            Category::Wishlist => "Wishlist",
        }
    }
}

impl fmt::Display for Category {
    /// Write the human-facing label so the type plays nicely with widgets
    /// that consume strings implicitly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Tab selection for list views: either the whole collection or one shelf.
/// Kept separate from [`Category`] so a stored song can never hold "all".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Whether a song on the given shelf passes this filter.
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(only) => *only == category,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(category) => category.label(),
        }
    }
}

/// In-memory representation of one repertoire entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    /// Unique within the live collection; minted by the controller from a
    /// monotonic counter. Edit/delete flows bubble it back to the store.
    pub id: u64,
    /// Title displayed on cards and matched by search.
    pub title: String,
    /// Artist, also matched by search.
    pub artist: String,
    /// Canonical video identifier, derived once from the URL the user pasted
    /// when the song was added. Edits never re-derive it.
    pub youtube_id: VideoId,
    /// Which shelf the song lives on.
    pub category: Category,
    /// When the song entered the repertoire. Drives the list ordering.
    pub date: NaiveDate,
    /// Rehearsal cadence, e.g. "Weekly on Tuesdays". Only band songs carry
    /// one; the validation path strips it everywhere else.
    pub period: Option<String>,
    /// At most [`MAX_GENRES`] entries in insertion order, no duplicates.
    pub genres: Vec<String>,
}

impl Song {
    /// Compose a `Title - Artist` string for status messages and logs.
    pub fn display_title(&self) -> String {
        format!("{} - {}", self.title, self.artist)
    }
}
