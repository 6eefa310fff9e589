//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};

/// Primary screen layout: the tree mount and a bottom status bar.
pub struct AppLayout {
    pub tree_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // tree pane (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            tree_area: chunks[0],
            status_area: chunks[1],
        }
    }

    /// Cells left for tree content inside the bordered pane.
    pub fn tree_viewport(&self) -> (usize, usize) {
        let inner = self.tree_area.inner(Margin::new(1, 1));
        (usize::from(inner.width), usize::from(inner.height))
    }
}
