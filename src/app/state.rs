//! Central application state for the interactive view.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use tokio::task::JoinHandle;

use crate::ui::columns::content_size;
use crate::ui::surface::Surface;

/// Top-level application state.
pub struct AppState {
    /// Display surface holding the mounted tree (or the fallback message).
    pub surface: Surface,
    /// Mount point the tree is attached to.
    pub mount: String,
    /// Scroll position as `(column, row)` in content cells.
    pub scroll: (usize, usize),
    /// Size of the visible tree pane, updated on every draw.
    pub viewport: (usize, usize),
    /// Set by input handling; the main loop starts a fresh build.
    pub needs_rebuild: bool,
    /// The fetch currently in flight, aborted when a newer build starts.
    pub in_flight: Option<JoinHandle<()>>,
    /// Drives the fetch spinner.
    pub tick: u64,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Controls the main event loop.
    pub should_quit: bool,
}

impl AppState {
    pub fn new(surface: Surface, mount: String) -> Self {
        Self {
            surface,
            mount,
            scroll: (0, 0),
            viewport: (0, 0),
            needs_rebuild: true,
            in_flight: None,
            tick: 0,
            status_message: None,
            should_quit: false,
        }
    }

    pub fn fetching(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Largest scroll position that still keeps content on screen.
    pub fn max_scroll(&self) -> (usize, usize) {
        let (w, h) = self
            .surface
            .mount(&self.mount)
            .map_or((0, 0), content_size);
        (
            w.saturating_sub(self.viewport.0),
            h.saturating_sub(self.viewport.1),
        )
    }

    /// Resize the visible pane, pulling the scroll back inside the content.
    pub fn set_viewport(&mut self, viewport: (usize, usize)) {
        self.viewport = viewport;
        self.scroll_by(0, 0);
    }

    pub fn scroll_by(&mut self, dx: isize, dy: isize) {
        let (max_x, max_y) = self.max_scroll();
        self.scroll.0 = self.scroll.0.saturating_add_signed(dx).min(max_x);
        self.scroll.1 = self.scroll.1.saturating_add_signed(dy).min(max_y);
    }

    /// Cancel whatever fetch is outstanding.
    pub fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
