//! Custom Ratatui widget that draws a mounted tree as nested columns.
//!
//! Each element sits in its depth's column; its children are stacked
//! vertically in the next column, starting on the element's own row.  After
//! width normalization every column lines up.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::surface::{ElementId, Mount};
use super::theme::Theme;

/// Rows an element occupies: one, or the sum of its children's rows.
fn subtree_height(mount: &Mount, id: ElementId) -> usize {
    let el = mount.get(id);
    let children: usize = el.children.iter().map(|&c| subtree_height(mount, c)).sum();
    children.max(1)
}

/// Columns an element and its widest descendant chain occupy.
fn subtree_width(mount: &Mount, id: ElementId) -> usize {
    let el = mount.get(id);
    let widest_child = el
        .children
        .iter()
        .map(|&c| subtree_width(mount, c))
        .max()
        .unwrap_or(0);
    usize::from(el.rendered_width()) + widest_child
}

/// Full size of the laid-out mount as `(width, height)` in cells.
pub fn content_size(mount: &Mount) -> (usize, usize) {
    let width = mount
        .roots
        .iter()
        .map(|&r| subtree_width(mount, r))
        .max()
        .unwrap_or(0);
    let height = mount.roots.iter().map(|&r| subtree_height(mount, r)).sum();
    (width, height)
}

// ───────────────────────────────────────── widget ────────────

pub struct ColumnsWidget<'a> {
    mount: &'a Mount,
    /// Top-left content cell shown at the widget origin.
    offset: (usize, usize),
    block: Option<Block<'a>>,
    styled: bool,
}

impl<'a> ColumnsWidget<'a> {
    pub fn new(mount: &'a Mount) -> Self {
        Self {
            mount,
            offset: (0, 0),
            block: None,
            styled: true,
        }
    }

    pub fn offset(mut self, x: usize, y: usize) -> Self {
        self.offset = (x, y);
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Draw without colours (for piping to a file).
    pub fn plain(mut self) -> Self {
        self.styled = false;
        self
    }

    fn draw_element(&self, id: ElementId, x: usize, y: usize, area: Rect, buf: &mut Buffer) -> usize {
        let el = self.mount.get(id);
        let style = match (self.styled, el.is_branch) {
            (false, _) => Style::default(),
            (true, true) => Theme::dir_style(),
            (true, false) => Theme::file_style(),
        };
        let width = usize::from(el.rendered_width());
        let at = Placement {
            x,
            y,
            max_width: width,
            style,
        };
        self.put_label(&el.label, at, area, buf);

        let mut row = y;
        for &child in &el.children {
            row += self.draw_element(child, x + width, row, area, buf);
        }
        (row - y).max(1)
    }

    /// Write `text` at its placement, clipped to the visible window.
    fn put_label(&self, text: &str, at: Placement, area: Rect, buf: &mut Buffer) {
        let (off_x, off_y) = self.offset;
        if at.y < off_y || at.y - off_y >= usize::from(area.height) {
            return;
        }
        let screen_y = area.y + (at.y - off_y) as u16;

        let mut col = at.x;
        for (ch, w) in clipped_chars(text, at.max_width) {
            if col < off_x {
                col += w;
                continue;
            }
            if col + w - off_x > usize::from(area.width) {
                break;
            }
            let screen_x = area.x + (col - off_x) as u16;
            if let Some(cell) = buf.cell_mut((screen_x, screen_y)) {
                cell.set_char(ch).set_style(at.style);
            }
            col += w;
        }
    }
}

/// Where a label goes, in content cells.
#[derive(Debug, Clone, Copy)]
struct Placement {
    x: usize,
    y: usize,
    max_width: usize,
    style: Style,
}

/// Printable chars of `text` with their widths, up to `max_width` cells.
fn clipped_chars(text: &str, max_width: usize) -> impl Iterator<Item = (char, usize)> + '_ {
    text.chars()
        .filter_map(|ch| ch.width().filter(|&w| w > 0).map(|w| (ch, w)))
        .scan(0, move |used, (ch, w)| {
            *used += w;
            (*used <= max_width).then_some((ch, w))
        })
}

impl<'a> Widget for ColumnsWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let mut row = 0;
        for &root in &self.mount.roots {
            if row >= self.offset.1 + usize::from(inner.height) {
                break;
            }
            row += self.draw_element(root, 0, row, inner, buf);
        }
    }
}

/// Lay the mount out as text, one string per content row.
///
/// Walks the layout directly instead of going through a `Buffer`, so there
/// is no limit on how many rows or columns the tree may span.
pub fn to_plain_lines(mount: &Mount) -> Vec<String> {
    let (_, height) = content_size(mount);
    let mut lines = vec![String::new(); height];
    let mut row = 0;
    for &root in &mount.roots {
        row += write_plain(mount, root, 0, row, &mut lines);
    }
    for line in &mut lines {
        line.truncate(line.trim_end().len());
    }
    lines
}

/// Labels on a row are always written left to right, so padding the line
/// out to `x` is enough to place each one.
fn write_plain(mount: &Mount, id: ElementId, x: usize, y: usize, lines: &mut [String]) -> usize {
    let el = mount.get(id);
    let width = usize::from(el.rendered_width());

    let line = &mut lines[y];
    let used = line.width();
    line.extend(std::iter::repeat(' ').take(x.saturating_sub(used)));
    line.extend(clipped_chars(&el.label, width).map(|(ch, _)| ch));

    let mut row = y;
    for &child in &el.children {
        row += write_plain(mount, child, x + width, row, lines);
    }
    (row - y).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::render_forest;
    use crate::core::tree::parse;
    use crate::ui::normalize::normalize_widths;
    use crate::ui::surface::{Surface, DEFAULT_MOUNT};

    fn laid_out(text: &str) -> Surface {
        let rendered = render_forest(&parse(text));
        let mut surface = Surface::new([DEFAULT_MOUNT]);
        surface.attach(DEFAULT_MOUNT, &rendered).unwrap();
        normalize_widths(&mut surface, rendered.max_depth);
        surface
    }

    #[test]
    fn draws_home_directories_as_columns() {
        let surface = laid_out("/home/alice/notes.txt\n/home/bob/todo.spell");
        let lines = to_plain_lines(surface.mount(DEFAULT_MOUNT).unwrap());
        assert_eq!(
            lines,
            ["home/ alice/ notes.txt", "      bob/   todo.spell"]
        );
    }

    #[test]
    fn content_size_counts_rows_and_columns() {
        let surface = laid_out("a/b\na/c\nd");
        let mount = surface.mount(DEFAULT_MOUNT).unwrap();
        // "a/" + pad = 3, "b" + pad = 2
        assert_eq!(content_size(mount), (5, 3));
    }

    #[test]
    fn sibling_subtrees_stack_vertically() {
        let surface = laid_out("b/x\nb/y\na");
        let lines = to_plain_lines(surface.mount(DEFAULT_MOUNT).unwrap());
        assert_eq!(lines, ["a", "b/ x", "   y"]);
    }

    #[test]
    fn plain_lines_cover_trees_taller_than_a_buffer() {
        let paths: Vec<String> = (0..70_000).map(|i| format!("dir/file{i:06}")).collect();
        let surface = laid_out(&paths.join("\n"));
        let mount = surface.mount(DEFAULT_MOUNT).unwrap();

        let lines = to_plain_lines(mount);

        assert_eq!(lines.len(), content_size(mount).1);
        assert_eq!(lines.len(), 70_000);
        assert_eq!(lines[0], "dir/ file000000");
        assert_eq!(lines[69_999], "     file069999");
    }

    #[test]
    fn plain_lines_match_the_widget() {
        let surface = laid_out("b/x/日本\nb/y\na\nc/d/e");
        let mount = surface.mount(DEFAULT_MOUNT).unwrap();
        let (w, h) = content_size(mount);
        let area = Rect::new(0, 0, w as u16, h as u16);
        let mut buf = Buffer::empty(area);
        ColumnsWidget::new(mount).plain().render(area, &mut buf);

        let mut expected = Vec::new();
        for y in 0..area.height {
            let mut line = String::new();
            let mut x = 0;
            while x < area.width {
                let symbol = buf[(x, y)].symbol();
                line.push_str(symbol);
                x += symbol.width().max(1) as u16;
            }
            expected.push(line.trim_end().to_string());
        }
        assert_eq!(to_plain_lines(mount), expected);
    }

    #[test]
    fn labels_are_clipped_to_their_width() {
        let clipped: String = clipped_chars("abcdef", 3).map(|(ch, _)| ch).collect();
        assert_eq!(clipped, "abc");
        let wide: String = clipped_chars("日本語", 5).map(|(ch, _)| ch).collect();
        assert_eq!(wide, "日本");
    }

    #[test]
    fn empty_mount_draws_nothing() {
        let surface = laid_out("");
        assert!(to_plain_lines(surface.mount(DEFAULT_MOUNT).unwrap()).is_empty());
    }

    #[test]
    fn offset_scrolls_the_view() {
        let surface = laid_out("a/b\na/c\nd");
        let mount = surface.mount(DEFAULT_MOUNT).unwrap();
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        ColumnsWidget::new(mount).plain().offset(1, 1).render(area, &mut buf);
        // `d` sits in the scrolled-off first column.
        assert_eq!(buf, Buffer::with_lines(["  c ", "    "]));
    }

    #[test]
    fn branches_use_directory_style() {
        let surface = laid_out("a/b");
        let mount = surface.mount(DEFAULT_MOUNT).unwrap();
        let area = Rect::new(0, 0, 5, 1);
        let mut buf = Buffer::empty(area);
        ColumnsWidget::new(mount).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].fg, Theme::dir_style().fg.unwrap());
        assert_eq!(buf[(3, 0)].fg, Theme::file_style().fg.unwrap());
    }
}
