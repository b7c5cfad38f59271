//! Read-only view derivation for list screens: search filter, then date
//! ordering, then the category tab restriction. Pure transform over a
//! snapshot; calling it twice with the same inputs gives the same output.

use crate::models::{CategoryFilter, Song};

/// Derive the display sequence for a list view.
///
/// The steps run in a fixed order: case-insensitive substring filter against
/// title or artist (a blank term matches everything), stable sort by date
/// descending, then the tab restriction.
pub fn query(songs: &[Song], search_term: &str, filter: CategoryFilter) -> Vec<Song> {
    let needle = search_term.to_lowercase();

    let mut matched: Vec<Song> = if needle.trim().is_empty() {
        songs.to_vec()
    } else {
        songs
            .iter()
            .filter(|song| {
                song.title.to_lowercase().contains(&needle)
                    || song.artist.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    };

    // sort_by is stable, so songs sharing a date keep their collection order
    // and the rendered list never jitters across redraws.
    matched.sort_by(|a, b| b.date.cmp(&a.date));

    matched
        .into_iter()
        .filter(|song| filter.matches(song.category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::VideoId;
    use crate::models::Category;

    fn song(id: u64, title: &str, artist: &str, category: Category, date: &str) -> Song {
        Song {
            id,
            title: title.to_string(),
            artist: artist.to_string(),
            youtube_id: VideoId::new("6hzrDeceEKc").unwrap(),
            category,
            date: date.parse().unwrap(),
            period: None,
            genres: Vec::new(),
        }
    }

    fn sample() -> Vec<Song> {
        vec![
            song(1, "Wonderwall", "Oasis", Category::Band, "2024-03-15"),
            song(
                2,
                "Sweet Child O' Mine",
                "Guns N' Roses",
                Category::Practice,
                "2024-03-10",
            ),
            song(
                3,
                "Stairway to Heaven",
                "Led Zeppelin",
                Category::Wishlist,
                "2024-03-05",
            ),
        ]
    }

    #[test]
    fn blank_term_returns_everything_date_descending() {
        let result = query(&sample(), "", CategoryFilter::All);
        let ids: Vec<u64> = result.iter().map(|s| s.id).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[test]
    fn search_matches_title_case_insensitively() {
        let result = query(&sample(), "child", CategoryFilter::All);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 2);
    }

    #[test]
    fn search_matches_artist_too() {
        let result = query(&sample(), "zeppelin", CategoryFilter::All);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 3);
    }

    #[test]
    fn category_filter_restricts_after_search() {
        let result = query(&sample(), "", CategoryFilter::Only(Category::Band));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 1);

        let result = query(&sample(), "child", CategoryFilter::Only(Category::Band));
        assert!(result.is_empty());
    }

    #[test]
    fn equal_dates_keep_collection_order() {
        let songs = vec![
            song(10, "Alpha", "A", Category::Practice, "2024-03-10"),
            song(11, "Beta", "B", Category::Practice, "2024-03-10"),
            song(12, "Gamma", "C", Category::Practice, "2024-03-10"),
        ];
        let result = query(&songs, "", CategoryFilter::All);
        let ids: Vec<u64> = result.iter().map(|s| s.id).collect();
        assert_eq!(ids, [10, 11, 12]);
    }

    #[test]
    fn repeated_calls_agree() {
        let songs = sample();
        let first = query(&songs, "o", CategoryFilter::All);
        let second = query(&songs, "o", CategoryFilter::All);
        assert_eq!(first, second);
    }
}
