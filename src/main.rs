//! Binary entry point that glues the in-memory repertoire to the TUI. The
//! bootstrapping pipeline is short: build the starter collection, wrap it in
//! the controller, and drive the Ratatui event loop until the user exits.
use anyhow::{Context, Result};
use guitar_repertoire::{run_app, seed_repertoire, App, MemoryStore, Repertoire};

/// Seed the collection, hydrate the initial app state, and launch the event
/// loop. Returning a `Result` bubbles fatal initialization problems up to
/// the terminal instead of crashing silently.
fn main() -> Result<()> {
    let songs = seed_repertoire().context("failed to build the starter repertoire")?;
    let repertoire = Repertoire::new(MemoryStore::with_songs(songs));

    let mut app = App::new(repertoire);
    run_app(&mut app)
}
