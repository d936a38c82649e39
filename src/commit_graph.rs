//! A simulated version-control graph: commits on named branches, with merges.

use std::collections::HashMap;

use log::{debug, info};

use crate::error::{HistoryError, Result};
use crate::id::HashSource;
use crate::node::{Commit, HistoryNode, NodeRef};
use crate::render::{self, RenderOptions, Rendering, HEAD_MARKER};
use crate::store::{NodeStore, Parentage};

/// Options for a new commit graph.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommitGraphOptions {
    /// Branch holding the root commit.
    pub root_branch: String,
    /// Message of the root commit.
    pub root_message: String,
    /// Seed for commit hashes. `None` draws from system entropy.
    pub seed: Option<u64>,
}

impl Default for CommitGraphOptions {
    fn default() -> Self {
        CommitGraphOptions {
            root_branch: "main".to_string(),
            root_message: "Initial commit".to_string(),
            seed: None,
        }
    }
}

#[derive(Clone, Debug)]
struct Branch {
    name: String,
    nodes: Vec<NodeRef>,
}

impl Branch {
    fn tip(&self) -> NodeRef {
        // Branches are created with their first node.
        self.nodes[self.nodes.len() - 1]
    }
}

/// Commits, branches and the head of the current branch.
#[derive(Clone, Debug)]
pub struct CommitGraph {
    store: NodeStore<Commit>,
    hashes: HashSource,
    branches: Vec<Branch>,
    by_name: HashMap<String, usize>,
    current: usize,
    head: NodeRef,
    render_options: RenderOptions,
}

impl CommitGraph {
    /// Creates a graph holding only the initial commit on `main`.
    pub fn init() -> Self {
        Self::build(CommitGraphOptions::default())
    }

    /// Creates a graph holding only the root commit, as configured.
    ///
    /// # Errors
    ///
    /// `EmptyBranchName` or `EmptyMessage` when the root branch or root message is empty.
    pub fn with_options(options: CommitGraphOptions) -> Result<Self> {
        if options.root_branch.is_empty() {
            return Err(HistoryError::EmptyBranchName);
        }
        if options.root_message.is_empty() {
            return Err(HistoryError::EmptyMessage);
        }
        Ok(Self::build(options))
    }

    fn build(options: CommitGraphOptions) -> Self {
        let mut hashes = match options.seed {
            Some(seed) => HashSource::with_seed(seed),
            None => HashSource::new(),
        };
        let root_commit = Commit {
            hash: hashes.first_hash(),
            message: options.root_message,
        };
        let (store, root) = NodeStore::with_root(
            Parentage::Multiple,
            root_commit,
            Some(options.root_branch.clone()),
        );
        let mut by_name = HashMap::new();
        by_name.insert(options.root_branch.clone(), 0);
        CommitGraph {
            store,
            hashes,
            branches: vec![Branch {
                name: options.root_branch,
                nodes: vec![root],
            }],
            by_name,
            current: 0,
            head: root,
            render_options: RenderOptions::with_marker(HEAD_MARKER),
        }
    }

    /// Records a commit on the current branch and moves the head to it.
    pub fn commit(&mut self, message: &str) -> Result<NodeRef> {
        if message.is_empty() {
            return Err(HistoryError::EmptyMessage);
        }
        let commit = Commit {
            hash: self.hashes.next_hash()?,
            message: message.to_string(),
        };
        let branch = self.branches[self.current].name.clone();
        let node = self.store.append_child(self.head, commit, Some(branch))?;
        self.advance(node);
        debug!("committed {} on '{}'", self.hash_of(node), self.current_branch());
        Ok(node)
    }

    /// Creates a branch starting at the head. No commit is created.
    pub fn create_branch(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(HistoryError::EmptyBranchName);
        }
        if self.by_name.contains_key(name) {
            return Err(HistoryError::DuplicateBranch(name.to_string()));
        }
        self.by_name.insert(name.to_string(), self.branches.len());
        self.branches.push(Branch {
            name: name.to_string(),
            nodes: vec![self.head],
        });
        info!("Branch '{}' created at commit {}", name, self.hash_of(self.head));
        Ok(())
    }

    /// Makes `name` the current branch and moves the head to its tip.
    pub fn switch_branch(&mut self, name: &str) -> Result<()> {
        let index = self.branch_index(name)?;
        self.current = index;
        self.head = self.branches[index].tip();
        info!("Switched to branch '{}'", name);
        Ok(())
    }

    /// Merges the tip of `name` into the current branch with a two-parent commit.
    ///
    /// # Errors
    ///
    /// `UnknownBranch` and `SelfMerge` for a bad name, `InvalidMerge` when both branches
    /// point at the same commit. Nothing changes on error.
    pub fn merge_branch(&mut self, name: &str) -> Result<NodeRef> {
        let other = self.branch_index(name)?;
        if other == self.current {
            return Err(HistoryError::SelfMerge(name.to_string()));
        }
        let other_tip = self.branches[other].tip();
        if other_tip == self.head {
            return Err(HistoryError::InvalidMerge);
        }
        let into = self.branches[self.current].name.clone();
        let commit = Commit {
            hash: self.hashes.next_hash()?,
            message: format!("Merge {} into {}", name, into),
        };
        let node = self
            .store
            .record_merge(self.head, other_tip, commit, Some(into.clone()))?;
        self.advance(node);
        info!("Merged branch '{}' into '{}'", name, into);
        Ok(node)
    }

    fn advance(&mut self, node: NodeRef) {
        self.branches[self.current].nodes.push(node);
        self.head = node;
    }

    fn branch_index(&self, name: &str) -> Result<usize> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| HistoryError::UnknownBranch(name.to_string()))
    }

    fn hash_of(&self, node: NodeRef) -> String {
        self.store
            .payload(node)
            .map(|commit| commit.hash.to_string())
            .unwrap_or_default()
    }

    pub fn head(&self) -> NodeRef {
        self.head
    }

    pub fn current_branch(&self) -> &str {
        &self.branches[self.current].name
    }

    /// The root commit.
    pub fn root(&self) -> NodeRef {
        self.branches[0].nodes[0]
    }

    /// Branch names in creation order, each flagged if it is current.
    pub fn list_branches(&self) -> Vec<(&str, bool)> {
        self.branches
            .iter()
            .enumerate()
            .map(|(i, branch)| (&branch.name[..], i == self.current))
            .collect()
    }

    /// The last commit of a branch.
    pub fn branch_tip(&self, name: &str) -> Result<NodeRef> {
        Ok(self.branches[self.branch_index(name)?].tip())
    }

    /// Commits recorded on a branch, starting with the commit it was created at.
    pub fn branch_nodes(&self, name: &str) -> Result<&[NodeRef]> {
        Ok(&self.branches[self.branch_index(name)?].nodes[..])
    }

    /// The commit behind a node reference.
    pub fn commit_at(&self, node: NodeRef) -> Option<&Commit> {
        self.store.payload(node)
    }

    pub fn store(&self) -> &NodeStore<Commit> {
        &self.store
    }

    /// Replaces the options used by `render`.
    pub fn set_render_options(&mut self, options: RenderOptions) {
        self.render_options = options;
    }

    /// Renders every commit reachable from the root, marking the head.
    pub fn render(&self) -> Rendering {
        render::render(
            &self.store,
            self.root(),
            Some(self.head),
            &self.render_options,
            commit_label,
        )
    }

    /// One line per branch, the current one marked.
    pub fn render_branches(&self) -> Vec<String> {
        self.list_branches()
            .into_iter()
            .map(|(name, is_current)| {
                if is_current {
                    format!("{}{}", name, HEAD_MARKER)
                } else {
                    name.to_string()
                }
            })
            .collect()
    }
}

impl Default for CommitGraph {
    fn default() -> Self {
        Self::init()
    }
}

fn commit_label(_: NodeRef, node: &HistoryNode<Commit>) -> String {
    let commit = node.payload();
    format!(
        "[{}] {}: {}",
        node.branch().unwrap_or_default(),
        commit.hash,
        commit.message
    )
}
