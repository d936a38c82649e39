#![allow(dead_code)]

use std::collections::HashSet;

use history_graph::{NodeRef, NodeStore, Parentage, Rendering};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Checks the structural invariants every store must keep after any mutation.
pub fn assert_consistent<P>(store: &NodeStore<P>) {
    let mut orders = HashSet::new();
    let mut previous = None;
    for (node, history_node) in store.iter() {
        assert!(orders.insert(history_node.order()), "duplicate order at {:?}", node);
        if let Some(previous) = previous {
            assert!(previous < history_node.order(), "order does not grow at {:?}", node);
        }
        previous = Some(history_node.order());

        if Some(node) == store.root() {
            assert!(history_node.parents().is_empty());
        } else {
            assert!(!history_node.parents().is_empty(), "{:?} has no parent", node);
        }
        if store.parentage() == Parentage::Single {
            assert!(history_node.parents().len() <= 1);
        }
        if history_node.is_merge() {
            assert_eq!(history_node.parents().len(), 2);
            assert_ne!(history_node.parents()[0], history_node.parents()[1]);
        }
        for &parent in history_node.parents() {
            assert!(parent < node, "parent {:?} is newer than {:?}", parent, node);
            let siblings = store.children_of(parent);
            assert_eq!(siblings.iter().filter(|&&c| c == node).count(), 1);
        }
        let children = store.children_of(node);
        for &child in children {
            assert!(store.parents_of(child).contains(&node));
        }
        let child_orders: Vec<_> = children
            .iter()
            .map(|&c| store.get(c).unwrap().order())
            .collect();
        let mut sorted = child_orders.clone();
        sorted.sort();
        assert_eq!(child_orders, sorted, "children of {:?} are out of order", node);
    }
}

/// Counts distinct nodes reachable from `root` along child links.
pub fn reachable<P>(store: &NodeStore<P>, root: NodeRef) -> usize {
    let mut seen = HashSet::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if seen.insert(node) {
            stack.extend(store.children_of(node).iter().copied());
        }
    }
    seen.len()
}

/// Asserts every rendered node appears exactly once.
pub fn assert_nodes_unique(rendering: &Rendering) {
    let unique: HashSet<_> = rendering.nodes().iter().collect();
    assert_eq!(unique.len(), rendering.len());
}
