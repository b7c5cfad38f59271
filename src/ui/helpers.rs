use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::models::{Song, GENRE_OPTIONS, MAX_GENRES};

/// Build the chip row for the genre picker. Chosen genres render as checked
/// chips; when `cursor` is set (the picker has focus) the chip under it is
/// highlighted so the user can see what Space would toggle.
pub(crate) fn genre_chip_spans(chosen: &[String], cursor: Option<usize>) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(GENRE_OPTIONS.len() * 2);
    for (idx, option) in GENRE_OPTIONS.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" "));
        }

        let chosen_chip = chosen.iter().any(|genre| genre == option);
        let text = if chosen_chip {
            format!("[x] {option}")
        } else {
            format!("[ ] {option}")
        };

        let mut style = if chosen_chip {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if cursor == Some(idx) {
            style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
        }

        spans.push(Span::styled(text, style));
    }
    spans
}

/// Counter text shown next to the genre picker label, e.g. `2/3`.
pub(crate) fn genre_count_label(chosen: &[String]) -> String {
    format!("{}/{MAX_GENRES}", chosen.len())
}

/// The detail line of a song card: genre chips, the date, and the rehearsal
/// cadence when the song carries one.
pub(crate) fn song_detail_spans(song: &Song) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (idx, genre) in song.genres.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(
            format!("[{genre}]"),
            Style::default().fg(Color::Green),
        ));
    }

    if !song.genres.is_empty() {
        spans.push(Span::raw("  •  "));
    }
    spans.push(Span::styled(
        song.date.to_string(),
        Style::default().fg(Color::Gray),
    ));

    if let Some(period) = &song.period {
        spans.push(Span::raw("  •  "));
        spans.push(Span::styled(
            period.clone(),
            Style::default().fg(Color::Cyan),
        ));
    }

    spans
}

/// Produce a rectangle centered within `area` that spans the requested
/// percent of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}
