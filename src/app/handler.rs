//! Input handling — maps key/mouse events to state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

use ratatui::layout::Rect;

use super::state::AppState;
use crate::ui::layout::AppLayout;

/// Rows / columns moved per mouse-wheel notch.
const WHEEL_STEP: isize = 3;

/// Key hints for the status bar.
pub const STATUS_HINT: &str = "←↓↑→/hjkl: scroll | r: rebuild | q: quit";

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let page = state.viewport.1.max(1) as isize;
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => state.should_quit = true,
        KeyCode::Char('r') => {
            state.needs_rebuild = true;
            state.status_message = Some("Rebuilding…".into());
        }
        KeyCode::Up | KeyCode::Char('k') => state.scroll_by(0, -1),
        KeyCode::Down | KeyCode::Char('j') => state.scroll_by(0, 1),
        KeyCode::Left | KeyCode::Char('h') => state.scroll_by(-1, 0),
        KeyCode::Right | KeyCode::Char('l') => state.scroll_by(1, 0),
        KeyCode::PageUp => state.scroll_by(0, -page),
        KeyCode::PageDown => state.scroll_by(0, page),
        KeyCode::Home => state.scroll = (0, 0),
        KeyCode::End => state.scroll = state.max_scroll(),
        _ => {}
    }
}

/// Process a mouse event (wheel scrolling only).
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => state.scroll_by(0, -WHEEL_STEP),
        MouseEventKind::ScrollDown => state.scroll_by(0, WHEEL_STEP),
        MouseEventKind::ScrollLeft => state.scroll_by(-WHEEL_STEP, 0),
        MouseEventKind::ScrollRight => state.scroll_by(WHEEL_STEP, 0),
        _ => {}
    }
}

/// Process a terminal resize to `width` x `height` cells.
pub fn handle_resize(state: &mut AppState, width: u16, height: u16) {
    let layout = AppLayout::from_area(Rect::new(0, 0, width, height));
    state.set_viewport(layout.tree_viewport());
}
