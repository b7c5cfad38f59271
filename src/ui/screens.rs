use crate::models::{Category, CategoryFilter, Song};
use crate::query;

/// Tab order shown across the top of the list, mirroring the shelves plus
/// the catch-all first tab.
pub(crate) const TABS: [CategoryFilter; 4] = [
    CategoryFilter::All,
    CategoryFilter::Only(Category::Band),
    CategoryFilter::Only(Category::Practice),
    CategoryFilter::Only(Category::Wishlist),
];

/// View state for the main song list: the active tab, the live search term,
/// and the derived sequence actually on screen. The screen never owns the
/// collection; it is re-derived from a store snapshot on every refresh.
pub(crate) struct LibraryScreen {
    pub(crate) tab: CategoryFilter,
    pub(crate) search: Option<String>,
    pub(crate) visible: Vec<Song>,
    pub(crate) selected: usize,
}

impl LibraryScreen {
    pub(crate) fn new() -> Self {
        Self {
            tab: CategoryFilter::All,
            search: None,
            visible: Vec::new(),
            selected: 0,
        }
    }

    /// Re-derive the visible sequence from a fresh snapshot of the
    /// collection, keeping the selection in bounds.
    pub(crate) fn refresh(&mut self, songs: &[Song]) {
        self.visible = query::query(songs, self.search_term(), self.tab);
        self.ensure_in_bounds();
    }

    /// The effective search term; an inactive search matches everything.
    pub(crate) fn search_term(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }

    pub(crate) fn set_search(&mut self, search: Option<String>) {
        self.search = search;
    }

    /// Whether a non-blank search is currently narrowing the list.
    pub(crate) fn has_search(&self) -> bool {
        self.search
            .as_ref()
            .map(|term| !term.trim().is_empty())
            .unwrap_or(false)
    }

    pub(crate) fn tab_index(&self) -> usize {
        TABS.iter().position(|tab| *tab == self.tab).unwrap_or(0)
    }

    /// Step to the adjacent tab, wrapping at both ends.
    pub(crate) fn cycle_tab(&mut self, offset: isize) {
        let len = TABS.len() as isize;
        let current = self.tab_index() as isize;
        let next = (current + offset).rem_euclid(len) as usize;
        self.tab = TABS[next];
        self.selected = 0;
    }

    pub(crate) fn current_song(&self) -> Option<&Song> {
        self.visible.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.visible.is_empty() {
            return;
        }
        let len = self.visible.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        if !self.visible.is_empty() {
            self.selected = 0;
        }
    }

    pub(crate) fn select_last(&mut self) {
        if !self.visible.is_empty() {
            self.selected = self.visible.len() - 1;
        }
    }

    /// Focus the entry with the given id, if it is on screen.
    pub(crate) fn focus_id(&mut self, id: u64) {
        if let Some(idx) = self.visible.iter().position(|song| song.id == id) {
            self.selected = idx;
        }
    }

    pub(crate) fn ensure_in_bounds(&mut self) {
        if self.visible.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.visible.len() {
            self.selected = self.visible.len() - 1;
        }
    }
}
