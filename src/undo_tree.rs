//! An undo tree over snapshots of a text buffer.
//!
//! Editing after an undo does not discard the undone states: the new snapshot becomes another
//! child of the current node, and every state stays reachable through `jump_to`.

use log::debug;

use crate::error::{HistoryError, Result};
use crate::node::{HistoryNode, NodeRef};
use crate::render::{self, RenderOptions, Rendering, CURRENT_MARKER};
use crate::store::{NodeStore, Parentage};

/// Text snapshots, the node currently shown, and the undone nodes that can be redone.
#[derive(Clone, Debug)]
pub struct UndoTree {
    store: NodeStore<String>,
    root: NodeRef,
    current: NodeRef,
    redo_stack: Vec<NodeRef>,
    render_options: RenderOptions,
}

impl UndoTree {
    /// Creates a tree whose root holds the empty text.
    pub fn new() -> Self {
        Self::with_text(String::new())
    }

    /// Creates a tree whose root holds `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        let (store, root) = NodeStore::with_root(Parentage::Single, text.into(), None);
        UndoTree {
            store,
            root,
            current: root,
            redo_stack: vec![],
            render_options: RenderOptions::with_marker(CURRENT_MARKER),
        }
    }

    /// Records `text` as a child of the current node, unless it equals the current text.
    /// Returns the new node, or `None` when nothing changed.
    ///
    /// Recording clears the redo stack.
    pub fn record_if_changed(&mut self, text: &str) -> Result<Option<NodeRef>> {
        if self.current_text() == text {
            return Ok(None);
        }
        let node = self
            .store
            .append_child(self.current, text.to_string(), None)?;
        debug!(
            "recorded node {} under {}",
            node.usize(),
            self.current.usize()
        );
        self.current = node;
        self.redo_stack.clear();
        Ok(Some(node))
    }

    /// Moves to the parent of the current node, remembering the current node for `redo`.
    pub fn undo(&mut self) -> Result<NodeRef> {
        let parent = self
            .store
            .node(self.current)?
            .first_parent()
            .ok_or(HistoryError::AtRoot)?;
        self.redo_stack.push(self.current);
        self.current = parent;
        debug!("undo to node {}", parent.usize());
        Ok(parent)
    }

    /// Moves back to the most recently undone node.
    ///
    /// # Errors
    ///
    /// `NothingToRedo` when the stack is empty. `StaleRedoPath` when the undone node is no
    /// longer a child of the current node; that entry is dropped.
    pub fn redo(&mut self) -> Result<NodeRef> {
        let node = self.redo_stack.pop().ok_or(HistoryError::NothingToRedo)?;
        if self.store.node(node)?.first_parent() != Some(self.current) {
            debug!("dropping stale redo entry {}", node.usize());
            return Err(HistoryError::StaleRedoPath);
        }
        self.current = node;
        debug!("redo to node {}", node.usize());
        Ok(node)
    }

    /// Makes `node` current and clears the redo stack.
    pub fn jump_to(&mut self, node: NodeRef) -> Result<()> {
        self.store.node(node)?;
        self.current = node;
        self.redo_stack.clear();
        debug!("jumped to node {}", node.usize());
        Ok(())
    }

    /// Jumps to the node shown on a line of `render`.
    pub fn jump_to_line(&mut self, index: usize) -> Result<NodeRef> {
        let node = self
            .render()
            .node_at(index)
            .ok_or(HistoryError::UnknownLine(index))?;
        self.jump_to(node)?;
        Ok(node)
    }

    pub fn current(&self) -> NodeRef {
        self.current
    }

    /// The text of the current node.
    pub fn current_text(&self) -> &str {
        self.store
            .payload(self.current)
            .map_or("", |text| &text[..])
    }

    pub fn root(&self) -> NodeRef {
        self.root
    }

    /// Undone nodes, most recently undone last.
    pub fn redo_stack(&self) -> &[NodeRef] {
        &self.redo_stack[..]
    }

    pub fn can_undo(&self) -> bool {
        self.current != self.root
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn store(&self) -> &NodeStore<String> {
        &self.store
    }

    pub fn set_render_options(&mut self, options: RenderOptions) {
        self.render_options = options;
    }

    /// Renders the whole tree, marking the current node.
    pub fn render(&self) -> Rendering {
        render::render(
            &self.store,
            self.root,
            Some(self.current),
            &self.render_options,
            snapshot_label,
        )
    }
}

impl Default for UndoTree {
    fn default() -> Self {
        Self::new()
    }
}

fn snapshot_label(_: NodeRef, node: &HistoryNode<String>) -> String {
    quote(node.payload())
}

/// Quotes a snapshot for display: single quotes, unless the text holds a single quote and no
/// double quote. Backslashes, the chosen quote and control characters are escaped.
fn quote(text: &str) -> String {
    let delimiter = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push(delimiter);
    for c in text.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c == delimiter => {
                quoted.push('\\');
                quoted.push(c);
            }
            c if c.is_control() => quoted.push_str(&format!("\\x{:02x}", u32::from(c))),
            c => quoted.push(c),
        }
    }
    quoted.push(delimiter);
    quoted
}

#[test]
fn test_undo_at_root_keeps_state() {
    let mut tree = UndoTree::new();
    assert_eq!(tree.undo(), Err(HistoryError::AtRoot));
    assert_eq!(tree.current(), tree.root());
    assert!(tree.redo_stack().is_empty());
}

#[test]
fn test_record_same_text_is_noop() {
    let mut tree = UndoTree::with_text("abc");
    assert_eq!(tree.record_if_changed("abc"), Ok(None));
    assert_eq!(tree.store().len(), 1);
}

#[test]
fn test_redo_of_detached_node_is_stale() {
    let mut tree = UndoTree::new();
    let a = tree.record_if_changed("a").unwrap().unwrap();
    tree.jump_to(tree.root()).unwrap();
    let b = tree.record_if_changed("b").unwrap().unwrap();
    // `a` hangs off the root, not off `b`.
    tree.redo_stack.push(a);
    assert_eq!(tree.redo(), Err(HistoryError::StaleRedoPath));
    assert_eq!(tree.current(), b);
    assert!(tree.redo_stack().is_empty());
}

#[test]
fn test_quote_snapshots() {
    assert_eq!(quote(""), "''");
    assert_eq!(quote("hi there"), "'hi there'");
    assert_eq!(quote("it's"), "\"it's\"");
    assert_eq!(quote("say \"it's\""), "'say \"it\\'s\"'");
    assert_eq!(quote("a\nb\\"), "'a\\nb\\\\'");
    assert_eq!(quote("\u{7}"), "'\\x07'");
}
