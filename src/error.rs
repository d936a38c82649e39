//! Errors reported by history operations.

use std::fmt;

use crate::node::NodeRef;

/// Result of a history operation.
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Represents a rejected history operation. Every error leaves the history in the state it
/// had before the operation was attempted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum HistoryError {
    /// The store already holds a root node.
    RootExists,
    /// The reference does not belong to this store.
    UnknownNode(NodeRef),
    /// The store cannot address any more nodes.
    CapacityExceeded,
    /// No rendered line has this index.
    UnknownLine(usize),
    /// A merge would give a node the same parent twice.
    InvalidMerge,
    /// Merges need a store that allows multiple parents.
    MergeUnsupported,
    /// A branch with this name already exists.
    DuplicateBranch(String),
    /// No branch has this name.
    UnknownBranch(String),
    /// A branch cannot be merged into itself.
    SelfMerge(String),
    /// Branch names must be non-empty.
    EmptyBranchName,
    /// Commit messages must be non-empty.
    EmptyMessage,
    /// The current node is the root.
    AtRoot,
    /// The redo stack is empty.
    NothingToRedo,
    /// The node on top of the redo stack is no longer a child of the current node.
    StaleRedoPath,
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HistoryError::RootExists => write!(f, "history already has a root"),
            HistoryError::UnknownNode(node) => write!(f, "node {} does not exist", node.usize()),
            HistoryError::CapacityExceeded => write!(f, "history is full"),
            HistoryError::UnknownLine(index) => write!(f, "no node is rendered at line {}", index),
            HistoryError::InvalidMerge => write!(f, "cannot merge a commit with itself"),
            HistoryError::MergeUnsupported => write!(f, "this history does not allow merges"),
            HistoryError::DuplicateBranch(name) => write!(f, "branch '{}' already exists", name),
            HistoryError::UnknownBranch(name) => write!(f, "branch '{}' does not exist", name),
            HistoryError::SelfMerge(name) => {
                write!(f, "cannot merge branch '{}' into itself", name)
            }
            HistoryError::EmptyBranchName => write!(f, "branch name is empty"),
            HistoryError::EmptyMessage => write!(f, "commit message is empty"),
            HistoryError::AtRoot => write!(f, "already at the root node"),
            HistoryError::NothingToRedo => write!(f, "nothing to redo"),
            HistoryError::StaleRedoPath => write!(f, "redo path no longer valid"),
        }
    }
}

impl std::error::Error for HistoryError {}
