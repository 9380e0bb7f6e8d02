//! Infoset lifecycle: creating, joining, leaving, splitting, merging and
//! reassigning information sets, and refining them by public revelation.

use rustc_hash::FxHashSet;

use super::game::GameTree;
use super::traverse;
use crate::core::{EfgError, EfgResult, InfosetId, NodeId, PlayerId};

impl GameTree {
    /// Create an empty infoset for `player` with `count` actions.
    pub fn create_infoset(&mut self, player: PlayerId, count: usize) -> EfgResult<InfosetId> {
        self.check_player(player)?;
        if count == 0 {
            return Err(EfgError::InvalidCount);
        }
        let infoset = self.new_infoset(player, count);
        self.touch();
        log::debug!("created {} for {}", infoset, player);
        Ok(infoset)
    }

    /// Delete `infoset` if it has no members. Returns whether it was deleted.
    pub fn delete_empty_infoset(&mut self, infoset: InfosetId) -> EfgResult<bool> {
        if self.check_infoset(infoset)?.num_members() > 0 {
            return Ok(false);
        }
        self.remove_infoset(infoset);
        self.reindex();
        self.touch();
        log::debug!("deleted empty {}", infoset);
        Ok(true)
    }

    /// Delete every infoset without members. Returns how many were deleted.
    pub fn delete_empty_infosets(&mut self) -> usize {
        let empty: Vec<InfosetId> = std::iter::once(PlayerId::CHANCE)
            .chain(self.player_ids())
            .flat_map(|p| self.player_data(p).infosets.clone())
            .filter(|&s| self.infosets[s].members.is_empty())
            .collect();
        for &s in &empty {
            self.remove_infoset(s);
        }
        if !empty.is_empty() {
            self.reindex();
            self.touch();
            log::debug!("deleted {} empty infosets", empty.len());
        }
        empty.len()
    }

    /// Move `node` into `infoset`.
    ///
    /// Returns `None` when `node` is terminal or `infoset` lies in another
    /// subgame, `infoset` when `node` is already a member, and the node's
    /// current infoset when the action counts differ.
    pub fn join_infoset(&mut self, infoset: InfosetId, node: NodeId) -> EfgResult<Option<InfosetId>> {
        self.check_infoset(infoset)?;
        self.check_node(node)?;

        if self.bridges_subgames(node, infoset) {
            return Ok(None);
        }
        let Some(current) = self.nodes[node].infoset else {
            return Ok(None);
        };
        if current == infoset {
            return Ok(Some(infoset));
        }
        if self.infosets[infoset].num_actions() != self.nodes[node].num_children() {
            return Ok(Some(current));
        }

        self.move_member(node, infoset);
        self.touch();
        self.sort_infosets();
        log::debug!("{} joined {}", node, infoset);
        Ok(Some(infoset))
    }

    /// Move `node` out of its infoset into a fresh one of the same player,
    /// copying labels and chance probabilities.
    ///
    /// Returns `None` for terminal nodes and the unchanged infoset when
    /// `node` is its only member.
    pub fn leave_infoset(&mut self, node: NodeId) -> EfgResult<Option<InfosetId>> {
        self.check_node(node)?;
        let Some(current) = self.nodes[node].infoset else {
            return Ok(None);
        };
        if self.infosets[current].num_members() == 1 {
            return Ok(Some(current));
        }

        let player = self.infosets[current].player;
        let fresh = self.new_infoset(player, self.infosets[current].num_actions());
        self.copy_labels(current, fresh);
        self.move_member(node, fresh);
        self.touch();
        self.sort_infosets();
        log::debug!("{} left {} for {}", node, current, fresh);
        Ok(Some(fresh))
    }

    /// Carve `node` and every member after it off into a fresh infoset of
    /// the same player, copying labels and chance probabilities.
    ///
    /// Returns `None` for terminal nodes and the unchanged infoset when
    /// `node` is its only member. Splitting at the first member moves every
    /// member and leaves the old infoset empty.
    pub fn split_infoset(&mut self, node: NodeId) -> EfgResult<Option<InfosetId>> {
        self.check_node(node)?;
        let Some(current) = self.nodes[node].infoset else {
            return Ok(None);
        };
        if self.infosets[current].num_members() == 1 {
            return Ok(Some(current));
        }
        let position = self.infosets[current]
            .members
            .iter()
            .position(|&m| m == node)
            .expect("member list contains node");

        let player = self.infosets[current].player;
        let fresh = self.new_infoset(player, self.infosets[current].num_actions());
        self.copy_labels(current, fresh);
        let moved = self.infosets[current].members.split_off(position);
        for &m in &moved {
            self.nodes[m].infoset = Some(fresh);
        }
        self.infosets[fresh].members = moved;
        self.touch();
        self.sort_infosets();
        log::debug!("split {} at {} into {}", current, node, fresh);
        Ok(Some(fresh))
    }

    /// Move every member of `from` into `to`, leaving `from` empty.
    ///
    /// Returns `from` unchanged when the two are the same, have different
    /// action counts or lie in different subgames.
    pub fn merge_infoset(&mut self, to: InfosetId, from: InfosetId) -> EfgResult<InfosetId> {
        self.check_infoset(to)?;
        self.check_infoset(from)?;

        if to == from || self.infosets[to].num_actions() != self.infosets[from].num_actions() {
            return Ok(from);
        }
        if let (Some(&a), Some(&b)) = (self.infosets[to].members.first(), self.infosets[from].members.first()) {
            if self.nodes[a].gameroot != self.nodes[b].gameroot {
                return Ok(from);
            }
        }

        let moved = std::mem::take(&mut self.infosets[from].members);
        for &m in &moved {
            self.nodes[m].infoset = Some(to);
        }
        self.infosets[to].members.extend(moved);
        self.touch();
        self.sort_infosets();
        log::debug!("merged {} into {}", from, to);
        Ok(to)
    }

    /// Give `infoset` to another personal player.
    pub fn switch_player(&mut self, infoset: InfosetId, player: PlayerId) -> EfgResult<InfosetId> {
        self.check_infoset(infoset)?;
        self.check_player(player)?;
        let owner = self.infosets[infoset].player;
        if owner.is_chance() || player.is_chance() {
            return Err(EfgError::ChanceSwitch);
        }
        if owner == player {
            return Ok(infoset);
        }

        self.player_data_mut(owner).infosets.retain(|&s| s != infoset);
        self.player_data_mut(player).infosets.push(infoset);
        self.infosets[infoset].player = player;
        self.touch();
        self.sort_infosets();
        log::debug!("moved {} from {} to {}", infoset, owner, player);
        Ok(infoset)
    }

    /// Reveal the action taken at `infoset` to `player`.
    ///
    /// Every infoset of `player` is refined so that its members below
    /// different actions of `infoset` no longer share an infoset. Nothing
    /// happens when `infoset` has a single action.
    pub fn reveal(&mut self, infoset: InfosetId, player: PlayerId) -> EfgResult<()> {
        self.check_infoset(infoset)?;
        self.check_player(player)?;
        let count = self.infosets[infoset].num_actions();
        if count <= 1 {
            return Ok(());
        }

        self.batch(|game| -> EfgResult<()> {
            for index in 1..=count {
                let mut marked: FxHashSet<NodeId> = FxHashSet::default();
                for member in game.infosets[infoset].members.clone() {
                    let child = game.nodes[member].children[index - 1];
                    marked.extend(traverse::subtree(game, child));
                }

                for target in game.player_data(player).infosets.clone() {
                    let members = game.infosets[target].members.clone();
                    let mut refined: Option<InfosetId> = None;
                    for n in members.into_iter().filter(|n| marked.contains(n)) {
                        refined = match refined {
                            None => game.leave_infoset(n)?,
                            Some(s) => {
                                game.join_infoset(s, n)?;
                                Some(s)
                            }
                        };
                    }
                }
            }
            game.touch();
            Ok(())
        })?;
        self.reindex();
        log::debug!("revealed {} to {}", infoset, player);
        Ok(())
    }
}
