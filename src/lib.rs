//! In-memory version histories. A history is an append-only graph of recorded states, kept
//! in a `NodeStore`. Two front ends drive it:
//!
//! * `CommitGraph`, a simulated version-control graph with branches and merges;
//! * `UndoTree`, an undo/redo tree over text snapshots.
//!
//! Both render to an indented text tree through the `render` module.

#![deny(unsafe_code)]
#![deny(
    trivial_casts,
    unused_import_braces
)]

pub mod commit_graph;
pub mod error;
pub mod id;
pub mod node;
pub mod render;
pub mod store;
pub mod undo_tree;

pub use crate::commit_graph::{CommitGraph, CommitGraphOptions};
pub use crate::error::{HistoryError, Result};
pub use crate::id::{CommitHash, CreationOrder};
pub use crate::node::{Commit, HistoryNode, NodeRef};
pub use crate::render::{RenderOptions, Rendering};
pub use crate::store::{NodeStore, Parentage};
pub use crate::undo_tree::UndoTree;
