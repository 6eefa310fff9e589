//! Path-list parsing — turn newline-delimited `/` paths into a nested tree.
//!
//! Construction goes through an arena ([`PathArena`]) so every segment lookup
//! is keyed by an explicit parent [`NodeId`]; the finished arena is then
//! folded into the owned [`TreeNode`] forest the renderer consumes.

use std::collections::HashMap;

use tracing::warn;

/// Paths are truncated after this many segments.  Keeps the recursive
/// renderer and layout passes bounded no matter what the input looks like.
pub const MAX_PATH_DEPTH: usize = 256;

// ───────────────────────────────────────── tree node ─────────

/// A logical node: a path segment and the segments seen beneath it.
///
/// Children are kept in first-seen order.  Sorting is the renderer's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

// ───────────────────────────────────────── arena ─────────────

/// Index into [`PathArena::nodes`].
pub type NodeId = usize;

#[derive(Debug)]
struct ArenaNode {
    name: String,
    children: Vec<NodeId>,
    /// Child name → id, so repeated segments merge instead of duplicating.
    by_name: HashMap<String, NodeId>,
}

/// Build-time tree.  Node 0 is the synthetic, unnamed root.
#[derive(Debug)]
pub struct PathArena {
    nodes: Vec<ArenaNode>,
}

impl Default for PathArena {
    fn default() -> Self {
        Self::new()
    }
}

impl PathArena {
    pub const ROOT: NodeId = 0;

    pub fn new() -> Self {
        Self {
            nodes: vec![ArenaNode {
                name: String::new(),
                children: Vec::new(),
                by_name: HashMap::new(),
            }],
        }
    }

    /// Return the child of `parent` called `name`, creating it if needed.
    pub fn child_or_insert(&mut self, parent: NodeId, name: &str) -> NodeId {
        if let Some(&id) = self.nodes[parent].by_name.get(name) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(ArenaNode {
            name: name.to_string(),
            children: Vec::new(),
            by_name: HashMap::new(),
        });
        let parent_node = &mut self.nodes[parent];
        parent_node.children.push(id);
        parent_node.by_name.insert(name.to_string(), id);
        id
    }

    /// Walk one line's segments from the root, creating nodes as needed.
    /// Empty segments leave the current position untouched.
    pub fn insert_path(&mut self, line: &str) {
        let mut current = Self::ROOT;
        let mut depth = 0;
        for segment in line.split('/').filter(|s| !s.is_empty()) {
            if depth == MAX_PATH_DEPTH {
                warn!(path = line, max = MAX_PATH_DEPTH, "path too deep, truncating");
                break;
            }
            current = self.child_or_insert(current, segment);
            depth += 1;
        }
    }

    /// Fold the arena into the owned forest under the synthetic root.
    pub fn into_forest(self) -> Vec<TreeNode> {
        let mut slots: Vec<Option<ArenaNode>> = self.nodes.into_iter().map(Some).collect();
        take_children(&mut slots, PathArena::ROOT)
    }
}

fn take_children(slots: &mut [Option<ArenaNode>], id: NodeId) -> Vec<TreeNode> {
    let Some(node) = slots[id].take() else {
        return Vec::new();
    };
    node.children
        .into_iter()
        .filter_map(|child_id| {
            let name = slots[child_id].as_ref()?.name.clone();
            Some(TreeNode {
                name,
                children: take_children(slots, child_id),
            })
        })
        .collect()
}

// ───────────────────────────────────────── parsing ───────────

/// Parse a path list into its top-level siblings.
///
/// Never fails: empty input gives an empty forest, lines made only of
/// slashes contribute nothing.
pub fn parse(text: &str) -> Vec<TreeNode> {
    let mut arena = PathArena::new();
    for line in text.split('\n') {
        arena.insert_path(line.strip_suffix('\r').unwrap_or(line));
    }
    arena.into_forest()
}
