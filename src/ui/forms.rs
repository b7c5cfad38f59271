use chrono::{Local, NaiveDate};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Category, Song, GENRE_OPTIONS, MAX_GENRES};
use crate::repertoire::{RepertoireError, SongChanges, SongDraft};

use super::helpers::{genre_chip_spans, genre_count_label};

/// Enumerates the fields within the song form to drive focus management.
/// Not every field is reachable in every state: the URL only exists while
/// adding (the video identifier is fixed afterwards) and the period only
/// exists for band songs.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum SongField {
    Title,
    Artist,
    Url,
    Category,
    Date,
    Period,
    Genres,
}

impl Default for SongField {
    fn default() -> Self {
        SongField::Title
    }
}

/// Form state for song creation and editing.
#[derive(Default, Clone)]
pub(crate) struct SongForm {
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) url: String,
    pub(crate) category: Option<Category>,
    pub(crate) date: String,
    pub(crate) period: String,
    pub(crate) genres: Vec<String>,
    pub(crate) genre_cursor: usize,
    pub(crate) active: SongField,
    pub(crate) error: Option<String>,
    editing: bool,
}

impl SongForm {
    /// Fresh form for the add flow, with the date prefilled to today the way
    /// the user would usually want it.
    pub(crate) fn for_add() -> Self {
        Self {
            date: Local::now().date_naive().to_string(),
            ..Self::default()
        }
    }

    /// Populate the form from an existing song when entering edit mode. The
    /// URL field stays empty and hidden: edits never re-derive the video
    /// identifier.
    pub(crate) fn from_song(song: &Song) -> Self {
        Self {
            title: song.title.clone(),
            artist: song.artist.clone(),
            url: String::new(),
            category: Some(song.category),
            date: song.date.to_string(),
            period: song.period.clone().unwrap_or_default(),
            genres: song.genres.clone(),
            genre_cursor: 0,
            active: SongField::Title,
            error: None,
            editing: true,
        }
    }

    /// The fields currently reachable, in visual order.
    pub(crate) fn fields(&self) -> Vec<SongField> {
        let mut fields = vec![SongField::Title, SongField::Artist];
        if !self.editing {
            fields.push(SongField::Url);
        }
        fields.push(SongField::Category);
        fields.push(SongField::Date);
        if self.category == Some(Category::Band) {
            fields.push(SongField::Period);
        }
        fields.push(SongField::Genres);
        fields
    }

    /// Cycle focus forward.
    pub(crate) fn next_field(&mut self) {
        self.cycle_field(1);
    }

    /// Cycle focus backward.
    pub(crate) fn prev_field(&mut self) {
        self.cycle_field(-1);
    }

    fn cycle_field(&mut self, offset: isize) {
        let fields = self.fields();
        let len = fields.len() as isize;
        let current = fields
            .iter()
            .position(|field| *field == self.active)
            .unwrap_or(0) as isize;
        let next = (current + offset).rem_euclid(len) as usize;
        if let Some(field) = fields.get(next) {
            self.active = *field;
        }
    }

    /// Insert a character into the active field, enforcing per-field input
    /// rules. The date only accepts digits and dashes; the pickers accept
    /// no text at all.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            SongField::Title => self.title.push(ch),
            SongField::Artist => self.artist.push(ch),
            SongField::Url => self.url.push(ch),
            SongField::Date => {
                if !ch.is_ascii_digit() && ch != '-' {
                    return false;
                }
                self.date.push(ch);
            }
            SongField::Period => self.period.push(ch),
            SongField::Category | SongField::Genres => return false,
        }
        true
    }

    /// Remove a character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            SongField::Title => {
                self.title.pop();
            }
            SongField::Artist => {
                self.artist.pop();
            }
            SongField::Url => {
                self.url.pop();
            }
            SongField::Date => {
                self.date.pop();
            }
            SongField::Period => {
                self.period.pop();
            }
            SongField::Category | SongField::Genres => {}
        }
    }

    /// Left/right adjusts the pickers: the category cycles through the
    /// closed set, the genre cursor walks the vocabulary. Returns whether
    /// the key was consumed.
    pub(crate) fn handle_horizontal(&mut self, offset: isize) -> bool {
        match self.active {
            SongField::Category => {
                let len = Category::ALL.len() as isize;
                let current = self
                    .category
                    .and_then(|chosen| Category::ALL.iter().position(|c| *c == chosen))
                    .map(|idx| idx as isize);
                let next = match current {
                    Some(idx) => (idx + offset).rem_euclid(len) as usize,
                    None => 0,
                };
                self.category = Category::ALL.get(next).copied();
                true
            }
            SongField::Genres => {
                let len = GENRE_OPTIONS.len() as isize;
                let next = (self.genre_cursor as isize + offset).rem_euclid(len) as usize;
                self.genre_cursor = next;
                true
            }
            _ => false,
        }
    }

    /// Toggle the genre under the cursor. A toggle that would exceed the cap
    /// is ignored, mirroring a disabled chip.
    pub(crate) fn toggle_genre(&mut self) -> bool {
        let option = match GENRE_OPTIONS.get(self.genre_cursor) {
            Some(option) => option,
            None => return false,
        };
        if let Some(pos) = self.genres.iter().position(|genre| genre == option) {
            self.genres.remove(pos);
            true
        } else if self.genres.len() < MAX_GENRES {
            self.genres.push(option.to_string());
            true
        } else {
            false
        }
    }

    /// Assemble the raw draft for the add flow. No validation happens here;
    /// the controller owns it and its errors land back in `self.error`.
    pub(crate) fn to_draft(&self) -> SongDraft {
        SongDraft {
            title: self.title.clone(),
            artist: self.artist.clone(),
            youtube_url: self.url.clone(),
            category: self.category,
            date: self.date.clone(),
            period: self.period.clone(),
            genres: self.genres.clone(),
        }
    }

    /// Assemble the change set for the edit flow. The date is parsed here
    /// because `SongChanges` carries a typed date; a blank field keeps the
    /// stored one.
    pub(crate) fn to_changes(&self) -> Result<SongChanges, RepertoireError> {
        let date = {
            let trimmed = self.date.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(
                    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                        .map_err(|_| RepertoireError::InvalidDate)?,
                )
            }
        };

        Ok(SongChanges {
            title: Some(self.title.clone()),
            artist: Some(self.artist.clone()),
            category: self.category,
            date,
            period: Some(self.period.clone()),
            genres: Some(self.genres.clone()),
        })
    }

    /// Render a styled line for the modal form.
    pub(crate) fn build_line(&self, field_name: &str, field: SongField) -> Line<'static> {
        let is_active = self.active == field;
        let (value, placeholder) = match field {
            SongField::Title => (self.title.clone(), "<required>"),
            SongField::Artist => (self.artist.clone(), "<required>"),
            SongField::Url => (self.url.clone(), "<required>"),
            SongField::Category => (
                self.category
                    .map(|category| category.label().to_string())
                    .unwrap_or_default(),
                "<left/right to choose>",
            ),
            SongField::Date => (self.date.clone(), "<today>"),
            SongField::Period => (self.period.clone(), "<optional>"),
            SongField::Genres => (String::new(), ""),
        };

        let display = if value.is_empty() {
            placeholder.to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Render the genre picker row: label with a counter, then the chips.
    pub(crate) fn build_genre_line(&self) -> Line<'static> {
        let is_active = self.active == SongField::Genres;
        let label_style = if is_active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        let mut spans = vec![Span::styled(
            format!("Genres ({}): ", genre_count_label(&self.genres)),
            label_style,
        )];
        spans.extend(genre_chip_spans(
            &self.genres,
            is_active.then_some(self.genre_cursor),
        ));
        Line::from(spans)
    }

    /// Character length of the requested field, for cursor placement.
    pub(crate) fn value_len(&self, field: SongField) -> usize {
        match field {
            SongField::Title => self.title.chars().count(),
            SongField::Artist => self.artist.chars().count(),
            SongField::Url => self.url.chars().count(),
            SongField::Date => self.date.chars().count(),
            SongField::Period => self.period.chars().count(),
            SongField::Category | SongField::Genres => 0,
        }
    }

    /// Whether the terminal cursor should be shown for the active field.
    pub(crate) fn active_is_text(&self) -> bool {
        !matches!(self.active, SongField::Category | SongField::Genres)
    }
}

/// State for confirming permanent song deletion.
pub(crate) struct ConfirmSongDelete {
    pub(crate) song: Song,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_form_cycles_through_url_but_skips_period() {
        let mut form = SongForm::for_add();
        assert!(form.fields().contains(&SongField::Url));
        assert!(!form.fields().contains(&SongField::Period));

        // Walk all the way around.
        let count = form.fields().len();
        for _ in 0..count {
            form.next_field();
        }
        assert!(form.active == SongField::Title);
    }

    #[test]
    fn period_appears_only_for_band() {
        let mut form = SongForm::for_add();
        form.active = SongField::Category;
        form.handle_horizontal(1);
        assert_eq!(form.category, Some(Category::Band));
        assert!(form.fields().contains(&SongField::Period));

        form.handle_horizontal(1);
        assert_eq!(form.category, Some(Category::Practice));
        assert!(!form.fields().contains(&SongField::Period));
    }

    #[test]
    fn edit_form_hides_the_url_field() {
        let song = crate::store::seed_repertoire().unwrap().remove(0);
        let form = SongForm::from_song(&song);
        assert!(!form.fields().contains(&SongField::Url));
        assert_eq!(form.title, "Wonderwall");
        assert_eq!(form.period, "Weekly on Tuesdays");
    }

    #[test]
    fn genre_toggle_respects_the_cap() {
        let mut form = SongForm::for_add();
        form.active = SongField::Genres;

        for _ in 0..MAX_GENRES {
            assert!(form.toggle_genre());
            form.handle_horizontal(1);
        }
        assert_eq!(form.genres.len(), MAX_GENRES);

        // A fourth toggle is ignored outright.
        assert!(!form.toggle_genre());
        assert_eq!(form.genres.len(), MAX_GENRES);

        // Untoggling the chip under the cursor works again.
        form.handle_horizontal(-1);
        assert!(form.toggle_genre());
        assert_eq!(form.genres.len(), MAX_GENRES - 1);
    }

    #[test]
    fn date_field_accepts_only_digits_and_dashes() {
        let mut form = SongForm::for_add();
        form.date.clear();
        form.active = SongField::Date;
        assert!(form.push_char('2'));
        assert!(form.push_char('-'));
        assert!(!form.push_char('x'));
        assert_eq!(form.date, "2-");
    }

    #[test]
    fn to_changes_rejects_a_malformed_date() {
        let mut form = SongForm::for_add();
        form.date = "yesterday".to_string();
        assert!(matches!(
            form.to_changes(),
            Err(RepertoireError::InvalidDate)
        ));
    }
}
