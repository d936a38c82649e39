//! Renders a history as an indented ASCII tree, one line per node.
//!
//! Siblings appear in creation order. A node reachable through several parents, such as a
//! merge commit, is printed once, under the first parent that reaches it in pre-order.

use std::fmt;

use bit_vec::BitVec;

use crate::node::{HistoryNode, NodeRef};
use crate::store::NodeStore;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// Marker appended to the head commit of a commit graph.
pub const HEAD_MARKER: &str = "  <-- HEAD";
/// Marker appended to the current node of an undo tree.
pub const CURRENT_MARKER: &str = "  <-- CURRENT";

/// Options for rendering.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenderOptions {
    /// Suffix for the highlighted line.
    pub marker: String,
}

impl RenderOptions {
    /// Options with the given highlight marker.
    pub fn with_marker(marker: impl Into<String>) -> Self {
        RenderOptions {
            marker: marker.into(),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::with_marker(HEAD_MARKER)
    }
}

/// Rendered lines, each paired with the node it shows.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Rendering {
    lines: Vec<String>,
    nodes: Vec<NodeRef>,
}

impl Rendering {
    pub fn lines(&self) -> &[String] {
        &self.lines[..]
    }

    /// Nodes in display order.
    pub fn nodes(&self) -> &[NodeRef] {
        &self.nodes[..]
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Maps a display line back to its node.
    pub fn node_at(&self, index: usize) -> Option<NodeRef> {
        self.nodes.get(index).copied()
    }

    /// Returns the display line of a node.
    pub fn line_of(&self, node: NodeRef) -> Option<usize> {
        self.nodes.iter().position(|&n| n == node)
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl fmt::Display for Rendering {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

struct Frame {
    node: NodeRef,
    prefix: String,
    is_last: bool,
}

/// Renders the subtree under `root`. The line of `highlight` gets the marker from `options`.
/// The store is only read.
pub fn render<P, F>(
    store: &NodeStore<P>,
    root: NodeRef,
    highlight: Option<NodeRef>,
    options: &RenderOptions,
    mut label: F,
) -> Rendering
where
    F: FnMut(NodeRef, &HistoryNode<P>) -> String,
{
    let mut rendering = Rendering::default();
    let mut visited = BitVec::from_elem(store.len(), false);
    let mut stack = vec![Frame {
        node: root,
        prefix: String::new(),
        is_last: true,
    }];

    while let Some(Frame {
        node,
        prefix,
        is_last,
    }) = stack.pop()
    {
        let history_node = match store.get(node) {
            Some(history_node) => history_node,
            None => continue,
        };
        if visited.get(node.usize()) == Some(true) {
            continue;
        }
        visited.set(node.usize(), true);

        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        let mut line = format!("{}{}{}", prefix, connector, label(node, history_node));
        if highlight == Some(node) {
            line.push_str(&options.marker);
        }
        rendering.lines.push(line);
        rendering.nodes.push(node);

        let child_prefix = format!("{}{}", prefix, if is_last { SPACE } else { PIPE });
        let children = history_node.children();
        // Reversed, so that the first child is popped first.
        for (i, &child) in children.iter().enumerate().rev() {
            stack.push(Frame {
                node: child,
                prefix: child_prefix.clone(),
                is_last: i + 1 == children.len(),
            });
        }
    }
    rendering
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_label(_: NodeRef, node: &HistoryNode<&'static str>) -> String {
        node.payload().to_string()
    }

    #[test]
    fn test_render_nested_prefixes() {
        let mut store = NodeStore::tree();
        let root = store.create_root("root", None).unwrap();
        let a = store.append_child(root, "a", None).unwrap();
        let b = store.append_child(root, "b", None).unwrap();
        store.append_child(a, "a1", None).unwrap();
        store.append_child(a, "a2", None).unwrap();
        store.append_child(b, "b1", None).unwrap();

        let rendering = render(
            &store,
            root,
            Some(b),
            &RenderOptions::with_marker(" *"),
            text_label,
        );
        let expected = [
            "└── root",
            "    ├── a",
            "    │   ├── a1",
            "    │   └── a2",
            "    └── b *",
            "        └── b1",
        ];
        assert_eq!(rendering.lines(), &expected[..]);
        assert_eq!(rendering.node_at(4), Some(b));
        assert_eq!(rendering.line_of(a), Some(1));
        assert_eq!(rendering.node_at(6), None);
    }

    #[test]
    fn test_render_unknown_root_is_empty() {
        let store: NodeStore<&'static str> = NodeStore::tree();
        let foreign = NodeRef::from_usize(3).unwrap();
        let rendering = render(&store, foreign, None, &RenderOptions::default(), text_label);
        assert!(rendering.is_empty());
        assert_eq!(rendering.to_string(), "");
    }
}
