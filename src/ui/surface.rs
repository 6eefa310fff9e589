//! The display surface that rendered trees are attached to.
//!
//! A [`Surface`] owns a fixed set of named mount points.  Attaching a
//! [`RenderedTree`] materializes it into [`Element`]s that know their depth
//! and rendered width; after that the tree can be queried and resized by
//! depth level, the way a laid-out page is.

use thiserror::Error;
use unicode_width::UnicodeWidthStr;

use crate::core::render::{RenderedTree, VisualNode};

/// Mount point the terminal layout registers for the tree.
pub const DEFAULT_MOUNT: &str = "tree-root";

/// Blank cells kept after every label.
pub const LABEL_PADDING: u16 = 1;

/// Index into [`Mount::elements`].
pub type ElementId = usize;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttachError {
    #[error("no mount point named `{0}`")]
    MountNotFound(String),
}

// ───────────────────────────────────────── element ───────────

/// One materialized visual node.
#[derive(Debug, Clone)]
pub struct Element {
    pub label: String,
    pub depth: usize,
    pub is_branch: bool,
    pub children: Vec<ElementId>,
    /// Explicit width; `None` means "as wide as the label needs".
    width: Option<u16>,
}

impl Element {
    fn intrinsic_width(&self) -> u16 {
        let cells = u16::try_from(self.label.width()).unwrap_or(u16::MAX);
        cells.saturating_add(LABEL_PADDING)
    }

    /// Width the element currently occupies on screen.
    pub fn rendered_width(&self) -> u16 {
        self.width.unwrap_or_else(|| self.intrinsic_width())
    }
}

// ───────────────────────────────────────── mount ─────────────

#[derive(Debug, Clone)]
pub struct Mount {
    pub name: String,
    pub elements: Vec<Element>,
    pub roots: Vec<ElementId>,
}

impl Mount {
    fn new(name: String) -> Self {
        Self {
            name,
            elements: Vec::new(),
            roots: Vec::new(),
        }
    }

    pub fn get(&self, id: ElementId) -> &Element {
        &self.elements[id]
    }

    fn clear(&mut self) {
        self.elements.clear();
        self.roots.clear();
    }

    fn materialize(elements: &mut Vec<Element>, node: &VisualNode) -> ElementId {
        let id = elements.len();
        elements.push(Element {
            label: node.label.clone(),
            depth: node.depth,
            is_branch: node.is_branch(),
            children: Vec::new(),
            width: None,
        });
        let children: Vec<ElementId> = node
            .children
            .iter()
            .map(|child| Self::materialize(elements, child))
            .collect();
        elements[id].children = children;
        id
    }
}

/// Address of an element anywhere on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementRef {
    pub mount: usize,
    pub id: ElementId,
}

// ───────────────────────────────────────── surface ───────────

#[derive(Debug, Clone)]
pub struct Surface {
    mounts: Vec<Mount>,
    fallback: Option<String>,
}

impl Surface {
    pub fn new<I, S>(mount_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mounts: mount_names.into_iter().map(|n| Mount::new(n.into())).collect(),
            fallback: None,
        }
    }

    pub fn mount(&self, name: &str) -> Option<&Mount> {
        self.mounts.iter().find(|m| m.name == name)
    }

    /// Replace the contents of `mount` with `tree`.
    ///
    /// The new elements are built off to the side and swapped in, so a
    /// failed attach leaves the surface exactly as it was.
    pub fn attach(&mut self, mount: &str, tree: &RenderedTree) -> Result<(), AttachError> {
        let target = self
            .mounts
            .iter_mut()
            .find(|m| m.name == mount)
            .ok_or_else(|| AttachError::MountNotFound(mount.to_string()))?;

        let mut elements = Vec::new();
        let roots = tree
            .roots
            .iter()
            .map(|node| Mount::materialize(&mut elements, node))
            .collect();

        target.elements = elements;
        target.roots = roots;
        self.fallback = None;
        Ok(())
    }

    /// Wipe every mount and show a single message instead.
    pub fn show_fallback(&mut self, message: impl Into<String>) {
        for mount in &mut self.mounts {
            mount.clear();
        }
        self.fallback = Some(message.into());
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    /// All elements at `depth`, across every mount, in document order.
    pub fn select_depth(&self, depth: usize) -> Vec<ElementRef> {
        self.mounts
            .iter()
            .enumerate()
            .flat_map(|(mount, m)| {
                m.elements
                    .iter()
                    .enumerate()
                    .filter(move |(_, e)| e.depth == depth)
                    .map(move |(id, _)| ElementRef { mount, id })
            })
            .collect()
    }

    pub fn element(&self, at: ElementRef) -> &Element {
        &self.mounts[at.mount].elements[at.id]
    }

    pub fn set_width(&mut self, at: ElementRef, width: u16) {
        self.mounts[at.mount].elements[at.id].width = Some(width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::render_forest;
    use crate::core::tree::parse;

    fn surface_with(text: &str) -> Surface {
        let mut surface = Surface::new([DEFAULT_MOUNT]);
        surface
            .attach(DEFAULT_MOUNT, &render_forest(&parse(text)))
            .unwrap();
        surface
    }

    #[test]
    fn attach_materializes_every_node() {
        let surface = surface_with("a/b\na/c\nd");
        let mount = surface.mount(DEFAULT_MOUNT).unwrap();
        assert_eq!(mount.elements.len(), 4);
        assert_eq!(mount.roots.len(), 2);
        let a = mount.get(mount.roots[0]);
        assert_eq!(a.label, "a/");
        assert!(a.is_branch);
        assert_eq!(a.children.len(), 2);
    }

    #[test]
    fn unknown_mount_is_an_error() {
        let mut surface = Surface::new([DEFAULT_MOUNT]);
        let err = surface
            .attach(".missing", &render_forest(&parse("a")))
            .unwrap_err();
        assert_eq!(err, AttachError::MountNotFound(".missing".into()));
    }

    #[test]
    fn reattach_replaces_old_contents() {
        let mut surface = surface_with("a/b/c\nx");
        surface
            .attach(DEFAULT_MOUNT, &render_forest(&parse("z")))
            .unwrap();
        let mount = surface.mount(DEFAULT_MOUNT).unwrap();
        assert_eq!(mount.elements.len(), 1);
        assert!(surface.select_depth(1).is_empty());
    }

    #[test]
    fn fallback_clears_the_tree() {
        let mut surface = surface_with("a/b");
        surface.show_fallback("Unable to create tree");
        assert!(surface.mount(DEFAULT_MOUNT).unwrap().roots.is_empty());
        assert_eq!(surface.fallback(), Some("Unable to create tree"));

        surface
            .attach(DEFAULT_MOUNT, &render_forest(&parse("a")))
            .unwrap();
        assert_eq!(surface.fallback(), None);
    }

    #[test]
    fn widths_follow_label_display_width() {
        let surface = surface_with("abc\n日本");
        let widths: Vec<u16> = surface
            .select_depth(0)
            .into_iter()
            .map(|r| surface.element(r).rendered_width())
            .collect();
        assert_eq!(widths, [3 + LABEL_PADDING, 4 + LABEL_PADDING]);
    }

    #[test]
    fn select_depth_spans_mounts() {
        let mut surface = Surface::new(["left", "right"]);
        surface.attach("left", &render_forest(&parse("a/b"))).unwrap();
        surface.attach("right", &render_forest(&parse("c/d/e"))).unwrap();
        assert_eq!(surface.select_depth(1).len(), 2);
        assert_eq!(surface.select_depth(2).len(), 1);
    }
}
