//! Logical tree → visual tree.
//!
//! Children are ordered alphabetically, ignoring case, at render time so the
//! [`TreeNode`] forest keeps its first-seen order.  The sort is stable: names
//! that compare equal once upper-cased stay in insertion order.

use super::tree::TreeNode;

/// Appended to the label of every node that has children.
pub const SEPARATOR: char = '/';

/// One rendered node.  `depth` is 0 for top-level entries and grows by one
/// per nesting level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualNode {
    pub label: String,
    pub depth: usize,
    pub children: Vec<VisualNode>,
}

impl VisualNode {
    /// Non-leaf nodes carry a nested container, even when drawn empty.
    pub fn is_branch(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Deepest level seen during one render cycle.  Create a fresh one per build.
#[derive(Debug, Default)]
pub struct DepthTracker {
    max_depth: Option<usize>,
}

impl DepthTracker {
    pub fn record(&mut self, depth: usize) {
        self.max_depth = Some(self.max_depth.map_or(depth, |d| d.max(depth)));
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }
}

/// Output of a full render cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedTree {
    /// Children of the implicit root, sorted.
    pub roots: Vec<VisualNode>,
    /// `None` when there was nothing to render.
    pub max_depth: Option<usize>,
}

/// Render `node` at `depth`, recursing into its (sorted) children.
pub fn render(node: &TreeNode, depth: usize, tracker: &mut DepthTracker) -> VisualNode {
    tracker.record(depth);

    let label = if node.is_leaf() {
        node.name.clone()
    } else {
        format!("{}{SEPARATOR}", node.name)
    };

    let children = sorted(&node.children)
        .into_iter()
        .map(|child| render(child, depth + 1, tracker))
        .collect();

    VisualNode {
        label,
        depth,
        children,
    }
}

/// Render the children of the implicit root, top-level entries at depth 0.
pub fn render_forest(forest: &[TreeNode]) -> RenderedTree {
    let mut tracker = DepthTracker::default();
    let roots = sorted(forest)
        .into_iter()
        .map(|node| render(node, 0, &mut tracker))
        .collect();
    RenderedTree {
        roots,
        max_depth: tracker.max_depth(),
    }
}

fn sorted(nodes: &[TreeNode]) -> Vec<&TreeNode> {
    let mut refs: Vec<&TreeNode> = nodes.iter().collect();
    refs.sort_by_cached_key(|n| n.name.to_uppercase());
    refs
}
