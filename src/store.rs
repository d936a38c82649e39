//! The node store owns every node of one history. Nodes live in an arena and refer to each
//! other through `NodeRef` indices, so parent and child links never form ownership cycles.

use log::trace;
use smallvec::smallvec;

use crate::error::{HistoryError, Result};
use crate::id::OrderSource;
use crate::node::{HistoryNode, NodeRef, Parents};

/// How many parents a node may have. Chosen once, when the store is created.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Parentage {
    /// At most one parent. Parent links form a strict tree.
    Single,
    /// Merge nodes may have two parents. Parent links form a DAG.
    Multiple,
}

/// Append-only arena of history nodes.
#[derive(Clone, Debug)]
pub struct NodeStore<P> {
    nodes: Vec<HistoryNode<P>>,
    orders: OrderSource,
    parentage: Parentage,
}

impl<P> NodeStore<P> {
    /// Creates an empty store.
    pub fn new(parentage: Parentage) -> Self {
        NodeStore {
            nodes: vec![],
            orders: OrderSource::new(),
            parentage,
        }
    }

    /// Creates an empty store where every node has at most one parent.
    pub fn tree() -> Self {
        Self::new(Parentage::Single)
    }

    /// Creates an empty store that accepts merges.
    pub fn dag() -> Self {
        Self::new(Parentage::Multiple)
    }

    /// Creates a store holding only a root node.
    pub fn with_root(parentage: Parentage, payload: P, branch: Option<String>) -> (Self, NodeRef) {
        let mut orders = OrderSource::new();
        let root = NodeRef::first();
        let store = NodeStore {
            nodes: vec![HistoryNode {
                payload,
                parents: Parents::new(),
                children: vec![],
                branch,
                order: orders.next_order(),
            }],
            orders,
            parentage,
        };
        (store, root)
    }

    pub fn parentage(&self) -> Parentage {
        self.parentage
    }

    /// Creates the root node. A store has exactly one root.
    pub fn create_root(&mut self, payload: P, branch: Option<String>) -> Result<NodeRef> {
        if !self.nodes.is_empty() {
            return Err(HistoryError::RootExists);
        }
        self.push(payload, Parents::new(), branch)
    }

    /// Creates a node with a single parent.
    pub fn append_child(
        &mut self,
        parent: NodeRef,
        payload: P,
        branch: Option<String>,
    ) -> Result<NodeRef> {
        self.check(parent)?;
        self.push(payload, smallvec![parent], branch)
    }

    /// Creates a merge node with parents `[a, b]`, in that order.
    pub fn record_merge(
        &mut self,
        a: NodeRef,
        b: NodeRef,
        payload: P,
        branch: Option<String>,
    ) -> Result<NodeRef> {
        if self.parentage == Parentage::Single {
            return Err(HistoryError::MergeUnsupported);
        }
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Err(HistoryError::InvalidMerge);
        }
        self.push(payload, smallvec![a, b], branch)
    }

    fn push(&mut self, payload: P, parents: Parents, branch: Option<String>) -> Result<NodeRef> {
        let node = NodeRef::from_usize(self.nodes.len()).ok_or(HistoryError::CapacityExceeded)?;
        let order = self.orders.next_order();
        trace!(
            "node {} created with parents {:?} at order {}",
            node.usize(),
            parents.iter().map(|p| p.usize()).collect::<Vec<_>>(),
            order.get()
        );
        for &parent in &parents {
            // Orders only grow, so pushing keeps the children sorted.
            self.nodes[parent.usize()].children.push(node);
        }
        self.nodes.push(HistoryNode {
            payload,
            parents,
            children: vec![],
            branch,
            order,
        });
        Ok(node)
    }

    fn check(&self, node: NodeRef) -> Result<()> {
        if node.usize() < self.nodes.len() {
            Ok(())
        } else {
            Err(HistoryError::UnknownNode(node))
        }
    }

    /// Returns the node, or `None` for a reference from another store.
    pub fn get(&self, node: NodeRef) -> Option<&HistoryNode<P>> {
        self.nodes.get(node.usize())
    }

    /// Returns the node.
    ///
    /// # Errors
    ///
    /// Returns `UnknownNode` for a reference that does not belong to this store.
    pub fn node(&self, node: NodeRef) -> Result<&HistoryNode<P>> {
        self.get(node).ok_or(HistoryError::UnknownNode(node))
    }

    /// Returns the payload of a node.
    pub fn payload(&self, node: NodeRef) -> Option<&P> {
        self.get(node).map(|n| n.payload())
    }

    /// Children in ascending creation order. Empty for unknown nodes.
    pub fn children_of(&self, node: NodeRef) -> &[NodeRef] {
        self.get(node).map_or(&[][..], |n| n.children())
    }

    /// Parents in recording order. Empty for the root and for unknown nodes.
    pub fn parents_of(&self, node: NodeRef) -> &[NodeRef] {
        self.get(node).map_or(&[][..], |n| n.parents())
    }

    /// The root node, if it was created.
    pub fn root(&self) -> Option<NodeRef> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(NodeRef::first())
        }
    }

    /// Returns `true` if `node` belongs to this store.
    pub fn contains(&self, node: NodeRef) -> bool {
        node.usize() < self.nodes.len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeRef, &HistoryNode<P>)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| NodeRef::from_usize(i).map(|r| (r, node)))
    }
}
