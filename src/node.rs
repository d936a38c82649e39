//! Nodes of a history graph. Each node records one state: a commit or a text snapshot.

use std::num::NonZeroU32;

use smallvec::SmallVec;

use crate::id::{CommitHash, CreationOrder};

/// A reference to a node, distinguished by its position in the owning store.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
pub struct NodeRef {
    n: NonZeroU32,
}

impl NodeRef {
    /// The reference to the root, which always sits at index zero.
    pub(crate) fn first() -> Self {
        NodeRef { n: NonZeroU32::MIN }
    }

    pub(crate) fn from_usize(index: usize) -> Option<Self> {
        let n = u32::try_from(index).ok()?.checked_add(1)?;
        NonZeroU32::new(n).map(|n| NodeRef { n })
    }

    /// Returns the zero-based index of this node in its store.
    pub fn usize(self) -> usize {
        self.n.get() as usize - 1
    }
}

/// Predecessors of a node. Two inline slots cover roots, appends and merges.
pub type Parents = SmallVec<[NodeRef; 2]>;

/// One recorded state.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct HistoryNode<P> {
    pub(crate) payload: P,
    pub(crate) parents: Parents,
    pub(crate) children: Vec<NodeRef>,
    pub(crate) branch: Option<String>,
    pub(crate) order: CreationOrder,
}

impl<P> HistoryNode<P> {
    /// The recorded content.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Parents in recording order. For a merge, the receiving tip comes first.
    pub fn parents(&self) -> &[NodeRef] {
        &self.parents[..]
    }

    /// The first parent, or `None` for the root.
    pub fn first_parent(&self) -> Option<NodeRef> {
        self.parents.first().copied()
    }

    /// Children in ascending creation order.
    pub fn children(&self) -> &[NodeRef] {
        &self.children[..]
    }

    /// Name of the branch this node was created on, if any.
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Position in the global creation sequence.
    pub fn order(&self) -> CreationOrder {
        self.order
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// Payload of a commit graph node.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Commit {
    pub hash: CommitHash,
    pub message: String,
}

#[test]
fn test_node_ref_index_round_trip() {
    let node = NodeRef::from_usize(41).unwrap();
    assert_eq!(node.usize(), 41);
    assert!(NodeRef::from_usize(u32::MAX as usize).is_none());
}
