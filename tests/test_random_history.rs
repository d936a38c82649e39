mod support;

use history_graph::{CommitGraph, CommitGraphOptions, HistoryError, UndoTree};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use test_case::test_case;

#[test_case(1)]
#[test_case(42)]
#[test_case(1234)]
fn test_random_undo_tree(seed: u64) {
    support::init_logger();
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut tree = UndoTree::new();

    for step in 0..500 {
        let before = tree.current();
        let stack_before = tree.redo_stack().to_vec();
        match rng.gen_range(0..5) {
            0 | 1 => {
                let text = format!("{}{}", tree.current_text(), rng.gen_range(0..3));
                let node = tree.record_if_changed(&text).unwrap().unwrap();
                assert_eq!(tree.current(), node);
                assert!(tree.redo_stack().is_empty());
            }
            2 => match tree.undo() {
                Ok(parent) => {
                    assert_eq!(tree.store().parents_of(before), &[parent]);
                    // An undo followed by a redo restores the node.
                    assert_eq!(tree.redo(), Ok(before));
                    assert_eq!(tree.redo_stack(), &stack_before[..]);
                    tree.undo().unwrap();
                }
                Err(err) => {
                    assert_eq!(err, HistoryError::AtRoot);
                    assert_eq!(before, tree.root());
                }
            },
            3 => match tree.redo() {
                Ok(node) => assert_eq!(tree.store().parents_of(node), &[before]),
                Err(err) => {
                    assert_eq!(err, HistoryError::NothingToRedo, "step {}", step);
                    assert_eq!(tree.current(), before);
                }
            },
            _ => {
                let line = rng.gen_range(0..tree.store().len());
                tree.jump_to_line(line).unwrap();
                assert!(tree.redo_stack().is_empty());
            }
        }
        support::assert_consistent(tree.store());
    }
    let rendering = tree.render();
    assert_eq!(rendering.len(), tree.store().len());
    assert!(rendering.line_of(tree.current()).is_some());
    support::assert_nodes_unique(&rendering);
}

#[test_case(7)]
#[test_case(99)]
fn test_random_commit_graph(seed: u64) {
    support::init_logger();
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut graph = CommitGraph::with_options(CommitGraphOptions {
        seed: Some(seed),
        ..CommitGraphOptions::default()
    })
    .unwrap();
    let names = ["main", "a", "b", "c"];

    for step in 0..300 {
        let name = names[rng.gen_range(0..names.len())];
        let len_before = graph.store().len();
        let head_before = graph.head();
        match rng.gen_range(0..4) {
            0 => {
                let node = graph.commit(&format!("step {}", step)).unwrap();
                assert_eq!(graph.store().parents_of(node), &[head_before]);
            }
            1 => {
                let existed = graph.branch_tip(name).is_ok();
                assert_eq!(graph.create_branch(name).is_err(), existed);
            }
            2 => {
                if graph.switch_branch(name).is_ok() {
                    assert_eq!(graph.current_branch(), name);
                    assert_eq!(Ok(graph.head()), graph.branch_tip(name));
                }
            }
            _ => match graph.merge_branch(name) {
                Ok(merge) => {
                    assert_eq!(graph.store().parents_of(merge)[0], head_before);
                    assert_eq!(graph.store().len(), len_before + 1);
                }
                Err(_) => {
                    assert_eq!(graph.head(), head_before);
                    assert_eq!(graph.store().len(), len_before);
                }
            },
        }
        support::assert_consistent(graph.store());
    }
    let rendering = graph.render();
    assert_eq!(rendering.len(), support::reachable(graph.store(), graph.root()));
    assert_eq!(rendering.len(), graph.store().len());
    support::assert_nodes_unique(&rendering);
}
