use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use crate::models::Song;
use crate::repertoire::Repertoire;
use crate::store::MemoryStore;

use super::forms::{ConfirmSongDelete, SongField, SongForm};
use super::helpers::{centered_rect, song_detail_spans};
use super::screens::{LibraryScreen, TABS};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows taken by the header block above the tab row.
const HEADER_HEIGHT: u16 = 4;
/// Rows taken by the tab row including its border.
const TAB_HEIGHT: u16 = 3;
/// Height allocation per song card in the list.
const SONG_CARD_HEIGHT: u16 = 5;

/// Fine-grained modes layered over the single list screen. Dialog and draft
/// state lives here and nowhere else; the store never sees it.
enum Mode {
    Normal,
    AddingSong(SongForm),
    EditingSong { id: u64, form: SongForm },
    ConfirmDelete(ConfirmSongDelete),
    Searching(SearchState),
}

/// State for an active inline search.
struct SearchState {
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    repertoire: Repertoire<MemoryStore>,
    screen: LibraryScreen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(repertoire: Repertoire<MemoryStore>) -> Self {
        let mut app = Self {
            repertoire,
            screen: LibraryScreen::new(),
            mode: Mode::Normal,
            status: None,
        };
        app.refresh_library(None);
        app
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::AddingSong(form) => self.handle_add_song(code, form),
            Mode::EditingSong { id, form } => self.handle_edit_song(code, id, form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
            Mode::Searching(state) => self.handle_search(code, state),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc => {
                // Esc first sheds an active filter; a second press quits.
                if self.screen.has_search() {
                    self.screen.set_search(None);
                    self.refresh_library(None);
                    self.set_status("Search cleared.", StatusKind::Info);
                } else {
                    *exit = true;
                }
            }
            KeyCode::Up => self.screen.move_selection(-1),
            KeyCode::Down => self.screen.move_selection(1),
            KeyCode::PageUp => self.screen.move_selection(-5),
            KeyCode::PageDown => self.screen.move_selection(5),
            KeyCode::Home => self.screen.select_first(),
            KeyCode::End => self.screen.select_last(),
            KeyCode::Tab | KeyCode::Right => {
                self.clear_status();
                self.screen.cycle_tab(1);
                self.refresh_library(None);
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.clear_status();
                self.screen.cycle_tab(-1);
                self.refresh_library(None);
            }
            KeyCode::Char('f') => {
                self.clear_status();
                return Mode::Searching(SearchState {
                    query: self.screen.search_term().to_string(),
                });
            }
            KeyCode::Enter => {
                if let Some(song) = self.screen.current_song().cloned() {
                    self.open_song(&song);
                }
            }
            KeyCode::Char('+') | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.clear_status();
                return Mode::AddingSong(SongForm::for_add());
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(song) = self.screen.current_song().cloned() {
                    self.clear_status();
                    return Mode::EditingSong {
                        id: song.id,
                        form: SongForm::from_song(&song),
                    };
                } else {
                    self.set_status("No song selected to edit.", StatusKind::Error);
                }
            }
            KeyCode::Char('-') | KeyCode::Delete => {
                if let Some(song) = self.screen.current_song().cloned() {
                    self.clear_status();
                    return Mode::ConfirmDelete(ConfirmSongDelete { song });
                } else {
                    self.set_status("No song selected to delete.", StatusKind::Error);
                }
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_add_song(&mut self, code: KeyCode, mut form: SongForm) -> Mode {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add song cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left => {
                form.handle_horizontal(-1);
            }
            KeyCode::Right => {
                form.handle_horizontal(1);
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(' ') if form.active == SongField::Genres => {
                form.toggle_genre();
            }
            KeyCode::Enter => match self.repertoire.add_song(form.to_draft()) {
                Ok(id) => {
                    self.refresh_library(Some(id));
                    let title = self
                        .repertoire
                        .song(id)
                        .map(Song::display_title)
                        .unwrap_or_default();
                    self.set_status(format!("Added {title}."), StatusKind::Info);
                    keep_open = false;
                }
                Err(err) => {
                    let message = err.to_string();
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Mode::AddingSong(form)
        } else {
            Mode::Normal
        }
    }

    fn handle_edit_song(&mut self, code: KeyCode, id: u64, mut form: SongForm) -> Mode {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left => {
                form.handle_horizontal(-1);
            }
            KeyCode::Right => {
                form.handle_horizontal(1);
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(' ') if form.active == SongField::Genres => {
                form.toggle_genre();
            }
            KeyCode::Enter => {
                let outcome = form
                    .to_changes()
                    .and_then(|changes| self.repertoire.edit_song(id, changes));
                match outcome {
                    Ok(()) => {
                        self.refresh_library(Some(id));
                        self.set_status("Song updated.", StatusKind::Info);
                        keep_open = false;
                    }
                    Err(err) => {
                        let message = err.to_string();
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Mode::EditingSong { id, form }
        } else {
            Mode::Normal
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmSongDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.repertoire.delete_song(confirm.song.id);
                self.refresh_library(None);
                self.set_status(
                    format!("Deleted {}.", confirm.song.display_title()),
                    StatusKind::Info,
                );
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Mode {
        match code {
            KeyCode::Esc => {
                self.screen.set_search(None);
                self.refresh_library(None);
                return Mode::Normal;
            }
            KeyCode::Enter => {
                // Keep the filter and drop back to the list.
                return Mode::Normal;
            }
            KeyCode::Up => {
                self.screen.move_selection(-1);
                return Mode::Searching(state);
            }
            KeyCode::Down => {
                self.screen.move_selection(1);
                return Mode::Searching(state);
            }
            KeyCode::PageUp => {
                self.screen.move_selection(-5);
                return Mode::Searching(state);
            }
            KeyCode::PageDown => {
                self.screen.move_selection(5);
                return Mode::Searching(state);
            }
            KeyCode::Home => {
                self.screen.select_first();
                return Mode::Searching(state);
            }
            KeyCode::End => {
                self.screen.select_last();
                return Mode::Searching(state);
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    state.query.push(ch);
                }
            }
            _ => {}
        }

        if state.query.trim().is_empty() {
            self.screen.set_search(None);
        } else {
            self.screen.set_search(Some(state.query.clone()));
        }
        self.refresh_library(None);

        Mode::Searching(state)
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Length(TAB_HEIGHT),
                Constraint::Min(1),
            ])
            .split(content_area);

        self.draw_header(frame, sections[0]);
        self.draw_tabs(frame, sections[1]);
        self.draw_song_list(frame, sections[2]);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingSong(form) => self.draw_song_form(frame, area, "Add Song", form),
            Mode::EditingSong { form, .. } => self.draw_song_form(frame, area, "Edit Song", form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let total = self.repertoire.songs().len();
        let shown = self.screen.visible.len();

        let count_line = if self.screen.has_search() {
            format!("{shown} of {total} songs shown")
        } else if total == 1 {
            "1 song in the collection".to_string()
        } else {
            format!("{total} songs in the collection")
        };

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                "Guitar Repertoire",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(count_line, Style::default().fg(Color::Gray))),
        ])
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, area);
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = TABS.iter().map(|tab| Line::from(tab.label())).collect();
        let tabs = Tabs::new(titles)
            .select(self.screen.tab_index())
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_song_list(&self, frame: &mut Frame, area: Rect) {
        if self.repertoire.songs().is_empty() {
            let message = Paragraph::new("No songs yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::NONE));
            frame.render_widget(message, area);
            return;
        }

        if self.screen.visible.is_empty() {
            let message_text = if self.screen.has_search() {
                "No songs match the current search."
            } else {
                "Nothing on this shelf yet."
            };
            let message = Paragraph::new(message_text)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::NONE));
            frame.render_widget(message, area);
            return;
        }

        self.render_song_cards(frame, area, &self.screen.visible, self.screen.selected);
    }

    fn render_song_cards(&self, frame: &mut Frame, area: Rect, songs: &[Song], selected: usize) {
        if songs.is_empty() || area.height == 0 {
            return;
        }

        let card_height = SONG_CARD_HEIGHT as usize;
        let capacity = ((area.height as usize) / card_height).max(1);
        let len = songs.len();
        let mut start = if selected >= capacity {
            selected + 1 - capacity
        } else {
            0
        };
        if start + capacity > len {
            start = len.saturating_sub(capacity);
        }
        let end = (start + capacity).min(len);
        let visible_len = end.saturating_sub(start);
        if visible_len == 0 {
            return;
        }

        let constraints: Vec<Constraint> = (0..visible_len)
            .map(|_| Constraint::Length(SONG_CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (idx, chunk) in rows.iter().enumerate() {
            if chunk.height == 0 {
                continue;
            }

            let song_index = start + idx;
            if song_index >= len {
                break;
            }

            let song = &songs[song_index];
            let mut block = Block::default().borders(Borders::ALL);
            let mut paragraph_style = Style::default();
            if song_index == selected {
                block = block.style(Style::default().fg(Color::Yellow));
                paragraph_style = Style::default().fg(Color::Yellow);
            }

            let mut lines = Vec::new();
            let title = if song_index == selected {
                format!("▶ {}", song.title)
            } else {
                song.title.clone()
            };
            lines.push(Line::from(Span::styled(
                title,
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                song.artist.clone(),
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::from(song_detail_spans(song)));

            let paragraph = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Left)
                .style(paragraph_style);

            frame.render_widget(paragraph, *chunk);
        }
    }

    fn draw_song_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &SongForm) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let fields = form.fields();
        let mut lines: Vec<Line> = fields
            .iter()
            .map(|field| match field {
                SongField::Title => form.build_line("Title", SongField::Title),
                SongField::Artist => form.build_line("Artist", SongField::Artist),
                SongField::Url => form.build_line("YouTube URL", SongField::Url),
                SongField::Category => form.build_line("Category", SongField::Category),
                SongField::Date => form.build_line("Date", SongField::Date),
                SongField::Period => form.build_line("Period", SongField::Period),
                SongField::Genres => form.build_genre_line(),
            })
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • ←/→ to adjust • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if form.active_is_text() {
            if let Some(row) = fields.iter().position(|field| *field == form.active) {
                let prefix = match form.active {
                    SongField::Title => "Title: ".len(),
                    SongField::Artist => "Artist: ".len(),
                    SongField::Url => "YouTube URL: ".len(),
                    SongField::Date => "Date: ".len(),
                    SongField::Period => "Period: ".len(),
                    SongField::Category | SongField::Genres => 0,
                };
                let cursor_x = inner.x + (prefix + form.value_len(form.active)) as u16;
                let cursor_y = inner.y + row as u16;
                frame.set_cursor_position((cursor_x, cursor_y));
            }
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmSongDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Delete Song").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Delete '{}' permanently?",
                confirm.song.display_title()
            )),
            Line::from("The song disappears from every tab."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Search: ".len() as u16 + state.query.chars().count() as u16;
        let cursor_y = inner.y;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::AddingSong(_) | Mode::EditingSong { .. } => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[←→]", key_style),
                Span::raw(" Adjust   "),
                Span::styled("[Space]", key_style),
                Span::raw(" Toggle Genre   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::ConfirmDelete(_) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Confirm   "),
                Span::styled("[N/Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::Searching(_) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Keep Filter   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Clear"),
            ]),
            Mode::Normal => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[←→]", key_style),
                Span::raw(" Tabs   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Open   "),
                Span::styled("[f]", key_style),
                Span::raw(" Search   "),
                Span::styled("[+]", key_style),
                Span::raw(" Add   "),
                Span::styled("[e]", key_style),
                Span::raw(" Edit   "),
                Span::styled("[-]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    /// Launch the selected song's watch URL in the system browser and report
    /// the outcome in the footer.
    fn open_song(&mut self, song: &Song) {
        let url = song.youtube_id.watch_url();
        if let Err(err) = open_link(&url) {
            self.set_status(format!("Failed to open video: {err}"), StatusKind::Error);
        } else {
            self.set_status(
                format!("Opened {}.", song.display_title()),
                StatusKind::Info,
            );
        }
    }

    /// Re-derive the visible list from the store, optionally focusing a
    /// specific song (used after add/edit so the entry stays under the
    /// cursor).
    fn refresh_library(&mut self, focus_id: Option<u64>) {
        self.screen.refresh(self.repertoire.songs());
        if let Some(id) = focus_id {
            self.screen.focus_id(id);
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}
