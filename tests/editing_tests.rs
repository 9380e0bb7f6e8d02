//! Tree-editing tests: growing, splicing, pruning, copying and moving
//! subtrees, and keeping child lists in step with action lists.

use rust_efg::core::{EfgError, GameConfig, NodeId, PlayerId};
use rust_efg::tree::{traverse, GameTree};

const P1: PlayerId = PlayerId::new(1);
const P2: PlayerId = PlayerId::new(2);

fn two_player_game() -> GameTree {
    GameTree::from_config(GameConfig::default().with_player("A").with_player("B"))
}

fn child(game: &GameTree, node: NodeId, i: usize) -> NodeId {
    game.node(node).unwrap().child(i).unwrap()
}

/// Every interior node has as many children as its infoset has actions.
fn assert_consistent(game: &GameTree) {
    for n in traverse::nodes(game) {
        let node = game.node(n).unwrap();
        match node.infoset() {
            Some(s) => {
                let infoset = game.infoset(s).unwrap();
                assert_eq!(infoset.num_actions(), node.num_children());
                assert!(infoset.members().contains(&n));
            }
            None => assert!(node.is_terminal()),
        }
        for &c in node.children() {
            assert_eq!(game.node(c).unwrap().parent(), Some(n));
        }
    }
}

// =============================================================================
// Append and insert
// =============================================================================

#[test]
fn test_append_grows_terminal_children() {
    let mut game = two_player_game();
    let root = game.root();

    let infoset = game.append_node(root, P1, 3).unwrap();

    assert_eq!(game.num_nodes(), 4);
    assert_eq!(game.node(root).unwrap().infoset(), Some(infoset));
    assert!(game.node(root).unwrap().children().iter().all(|&c| game.node(c).unwrap().is_terminal()));
    assert_eq!(game.revision(), 1);
    assert!(game.is_dirty());
    assert_consistent(&game);
}

#[test]
fn test_append_zero_count_fails_without_mutation() {
    let mut game = two_player_game();
    let root = game.root();

    assert!(matches!(game.append_node(root, P1, 0), Err(EfgError::InvalidCount)));
    assert_eq!(game.revision(), 0);
    assert_eq!(game.num_nodes(), 1);
}

#[test]
fn test_append_unknown_player_fails() {
    let mut game = two_player_game();
    let root = game.root();
    assert!(matches!(game.append_node(root, PlayerId::new(3), 2), Err(EfgError::InvalidPlayer(_))));
}

#[test]
fn test_append_to_other_subgame_is_rejected() {
    let mut game = two_player_game();
    let root = game.root();
    game.append_node(root, P1, 2).unwrap();
    let left = child(&game, root, 1);
    let right = child(&game, root, 2);
    let inner = game.append_node(left, P2, 2).unwrap();
    assert!(game.mark_subgame(left).unwrap());
    let revision = game.revision();

    assert_eq!(game.append_node_to(right, inner).unwrap(), None);
    assert_eq!(game.revision(), revision);
    assert!(game.node(right).unwrap().is_terminal());
}

#[test]
fn test_insert_node_splices_above() {
    let mut game = two_player_game();
    let root = game.root();
    game.append_node(root, P1, 2).unwrap();
    let left = child(&game, root, 1);

    let infoset = game.insert_node(left, P2, 3).unwrap();

    let spliced = child(&game, root, 1);
    assert_ne!(spliced, left);
    assert_eq!(game.node(spliced).unwrap().infoset(), Some(infoset));
    assert_eq!(child(&game, spliced, 1), left);
    assert_eq!(game.node(left).unwrap().parent(), Some(spliced));
    assert_eq!(game.num_nodes(), 6);
    assert_consistent(&game);
}

#[test]
fn test_insert_node_to_shares_infoset() {
    let mut game = two_player_game();
    let root = game.root();
    game.append_node(root, P1, 2).unwrap();
    let left = child(&game, root, 1);
    let right = child(&game, root, 2);
    let shared = game.append_node(left, P2, 2).unwrap();

    assert_eq!(game.insert_node_to(right, shared).unwrap(), Some(shared));

    assert_eq!(game.infoset(shared).unwrap().num_members(), 2);
    assert_eq!(game.profile_length(), 4);
    assert_consistent(&game);
}

// =============================================================================
// Delete
// =============================================================================

#[test]
fn test_delete_node_keeps_one_child() {
    let mut game = two_player_game();
    let root = game.root();
    game.append_node(root, P1, 2).unwrap();
    let left = child(&game, root, 1);
    game.append_node(left, P2, 2).unwrap();
    let kept = child(&game, left, 2);

    assert_eq!(game.delete_node(left, kept).unwrap(), kept);

    assert_eq!(child(&game, root, 1), kept);
    assert!(game.node(left).is_none());
    assert_eq!(game.num_nodes(), 3);
    assert_eq!(game.num_infosets()[P2], 1);
    assert_eq!(game.infoset(game.player(P2).unwrap().infosets()[0]).unwrap().num_members(), 0);
    assert_consistent(&game);
}

#[test]
fn test_delete_node_with_foreign_keep_fails() {
    let mut game = two_player_game();
    let root = game.root();
    game.append_node(root, P1, 2).unwrap();
    let left = child(&game, root, 1);
    let revision = game.revision();

    assert!(matches!(game.delete_node(root, root), Err(EfgError::NotAChild)));
    assert!(matches!(game.delete_node(left, root), Err(EfgError::NotAChild)));
    assert_eq!(game.revision(), revision);
}

#[test]
fn test_delete_root_promotes_child() {
    let mut game = two_player_game();
    let root = game.root();
    game.append_node(root, P1, 2).unwrap();
    let left = child(&game, root, 1);
    game.append_node(left, P2, 2).unwrap();

    game.delete_node(root, left).unwrap();

    assert_eq!(game.root(), left);
    assert_eq!(game.node(left).unwrap().parent(), None);
    assert_eq!(game.node(left).unwrap().subgame_root(), left);
    assert_eq!(game.node(left).unwrap().number(), 1);
    assert_consistent(&game);
}

#[test]
fn test_delete_tree() {
    let mut game = two_player_game();
    let root = game.root();
    let infoset = game.append_node(root, P1, 2).unwrap();
    game.set_node_name(root, "start").unwrap();

    game.delete_tree(root).unwrap();

    assert_eq!(game.num_nodes(), 1);
    assert!(game.node(root).unwrap().is_terminal());
    assert_eq!(game.node(root).unwrap().name(), "");
    assert_eq!(game.infoset(infoset).unwrap().num_members(), 0);
}

#[test]
fn test_invalid_handle_after_delete() {
    let mut game = two_player_game();
    let root = game.root();
    game.append_node(root, P1, 2).unwrap();
    let left = child(&game, root, 1);
    game.delete_tree(root).unwrap();

    assert!(matches!(
        game.append_node(left, P1, 2),
        Err(EfgError::InvalidHandle { kind: "node" })
    ));
}

// =============================================================================
// Copy and move
// =============================================================================

#[test]
fn test_copy_tree_shares_infosets() {
    let mut game = two_player_game();
    let root = game.root();
    game.append_node(root, P1, 2).unwrap();
    let left = child(&game, root, 1);
    let right = child(&game, root, 2);
    let inner = game.append_node(left, P2, 2).unwrap();
    let o = game.new_outcome();
    game.set_outcome(child(&game, left, 1), Some(o)).unwrap();

    assert_eq!(game.copy_tree(left, right).unwrap(), right);

    assert_eq!(game.node(right).unwrap().infoset(), Some(inner));
    assert_eq!(game.infoset(inner).unwrap().num_members(), 2);
    assert_eq!(game.node(child(&game, right, 1)).unwrap().outcome(), Some(o));
    assert_eq!(game.num_nodes(), 7);
    assert_consistent(&game);
}

#[test]
fn test_copy_tree_onto_interior_is_noop() {
    let mut game = two_player_game();
    let root = game.root();
    game.append_node(root, P1, 2).unwrap();
    let left = child(&game, root, 1);
    let revision = game.revision();

    assert_eq!(game.copy_tree(left, root).unwrap(), left);
    assert_eq!(game.revision(), revision);
}

#[test]
fn test_copy_tree_into_own_subtree_terminates() {
    let mut game = two_player_game();
    let root = game.root();
    game.append_node(root, P1, 2).unwrap();
    let leaf = child(&game, root, 2);

    assert_eq!(game.copy_tree(root, leaf).unwrap(), leaf);

    assert_eq!(game.num_nodes(), 5);
    assert!(game.node(child(&game, leaf, 2)).unwrap().is_terminal());
    assert_consistent(&game);
}

#[test]
fn test_move_tree_swaps_positions() {
    let mut game = two_player_game();
    let root = game.root();
    game.append_node(root, P1, 2).unwrap();
    let left = child(&game, root, 1);
    let right = child(&game, root, 2);
    game.append_node(left, P2, 2).unwrap();

    assert_eq!(game.move_tree(left, right).unwrap(), right);

    assert_eq!(child(&game, root, 1), right);
    assert_eq!(child(&game, root, 2), left);
    assert!(game.node(right).unwrap().is_terminal());
    assert_eq!(game.node(left).unwrap().number(), 3);
    assert_consistent(&game);
}

// =============================================================================
// Actions
// =============================================================================

#[test]
fn test_insert_action_grows_every_member() {
    let mut game = two_player_game();
    let root = game.root();
    game.append_node(root, P1, 2).unwrap();
    let shared = game.append_node(child(&game, root, 1), P2, 2).unwrap();
    game.append_node_to(child(&game, root, 2), shared).unwrap();

    let first = game.infoset(shared).unwrap().action(1).unwrap();
    let added = game.insert_action_before(shared, first).unwrap();

    assert_eq!(game.infoset(shared).unwrap().action(1), Some(added));
    for &m in game.infoset(shared).unwrap().members() {
        assert_eq!(game.node(m).unwrap().num_children(), 3);
    }
    assert_consistent(&game);
}

#[test]
fn test_delete_action_prunes_every_member() {
    let mut game = two_player_game();
    let root = game.root();
    game.append_node(root, P1, 2).unwrap();
    let left = child(&game, root, 1);
    let right = child(&game, root, 2);
    let shared = game.append_node(left, P2, 3).unwrap();
    game.append_node_to(right, shared).unwrap();
    let doomed = game.infoset(shared).unwrap().action(2).unwrap();
    let lost = child(&game, left, 2);

    game.delete_action(shared, doomed).unwrap();

    assert_eq!(game.infoset(shared).unwrap().num_actions(), 2);
    assert!(game.action(doomed).is_none());
    assert!(game.node(lost).is_none());
    assert_eq!(game.num_nodes(), 7);
    assert_consistent(&game);
}

#[test]
fn test_delete_last_action_is_noop() {
    let mut game = two_player_game();
    let root = game.root();
    let infoset = game.append_node(root, P1, 1).unwrap();
    let only = game.infoset(infoset).unwrap().action(1).unwrap();
    let revision = game.revision();

    assert_eq!(game.delete_action(infoset, only).unwrap(), infoset);

    assert_eq!(game.infoset(infoset).unwrap().num_actions(), 1);
    assert_eq!(game.revision(), revision);
}

#[test]
fn test_delete_action_of_other_infoset_fails() {
    let mut game = two_player_game();
    let root = game.root();
    let top = game.append_node(root, P1, 2).unwrap();
    let inner = game.append_node(child(&game, root, 1), P2, 2).unwrap();
    let foreign = game.infoset(inner).unwrap().action(1).unwrap();

    assert!(matches!(game.delete_action(top, foreign), Err(EfgError::ForeignAction)));
}

// =============================================================================
// Whole-game copies
// =============================================================================

#[test]
fn test_clone_keeps_handles() {
    let mut game = two_player_game();
    let root = game.root();
    let infoset = game.append_node(root, P1, 2).unwrap();

    let mut copy = game.clone();
    copy.delete_tree(root).unwrap();

    assert_eq!(game.infoset(infoset).unwrap().num_members(), 1);
    assert_eq!(copy.infoset(infoset).unwrap().num_members(), 0);
}

#[test]
fn test_from_subtree() {
    let mut game = two_player_game();
    let root = game.root();
    game.append_node(root, P1, 2).unwrap();
    let left = child(&game, root, 1);
    let inner = game.append_node(left, P2, 2).unwrap();
    game.set_infoset_label(inner, "guess").unwrap();

    let sub = GameTree::from_subtree(&game, left).unwrap();

    assert_eq!(sub.num_players(), 2);
    assert_eq!(sub.num_nodes(), 3);
    assert_eq!(sub.num_infosets()[P1], 0);
    let copied = sub.node(sub.root()).unwrap().infoset().unwrap();
    assert_eq!(sub.infoset(copied).unwrap().label(), "guess");
    assert_consistent(&sub);
}
