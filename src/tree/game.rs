//! The game coordinator: arenas, players, outcomes and bookkeeping.
//!
//! `GameTree` exclusively owns every node, infoset, action and outcome.
//! All edits go through it; each applied edit bumps the revision counter,
//! sets the dirty flag and restores the numbering invariants before
//! returning.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::infoset::{Action, Infoset, Outcome, Player};
use super::node::Node;
use crate::core::{
    ActionId, Arena, EfgError, EfgResult, GameConfig, Handle, InfosetId, NodeId, OutcomeId,
    PlayerId, PlayerMap,
};

/// An editable extensive-form game.
///
/// ## Usage
///
/// ```
/// use rust_efg::tree::GameTree;
/// use rust_efg::core::GameConfig;
///
/// let mut game = GameTree::from_config(GameConfig::default().with_player("Alice"));
/// let alice = game.player_ids().next().unwrap();
/// let root = game.root();
///
/// let infoset = game.append_node(root, alice, 2).unwrap();
/// assert_eq!(game.infoset(infoset).unwrap().num_actions(), 2);
/// assert_eq!(game.num_nodes(), 3);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameTree {
    pub(crate) title: String,
    pub(crate) comment: String,

    pub(crate) nodes: Arena<NodeId, Node>,
    pub(crate) infosets: Arena<InfosetId, Infoset>,
    pub(crate) actions: Arena<ActionId, Action>,
    pub(crate) outcomes: Arena<OutcomeId, Outcome>,

    /// Outcomes in number order.
    pub(crate) outcome_order: Vec<OutcomeId>,

    /// Personal players; `players[i]` is `PlayerId(i + 1)`.
    pub(crate) players: Vec<Player>,
    pub(crate) chance: Player,

    pub(crate) root: NodeId,

    pub(crate) revision: u64,
    pub(crate) dirty: bool,

    /// Depth of nested `batch` scopes; reindexing is skipped while > 0.
    #[serde(skip)]
    pub(crate) suppress_reindex: u32,
}

impl Default for GameTree {
    fn default() -> Self {
        Self::from_config(GameConfig::default())
    }
}

impl GameTree {
    /// Create a game with no players and a single terminal root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a game from a configuration.
    #[must_use]
    pub fn from_config(config: GameConfig) -> Self {
        let mut nodes = Arena::new();
        let root = nodes.alloc(Node::new(None, NodeId::from_parts(0, 0)));
        nodes[root].gameroot = root;

        let mut game = Self {
            title: config.title,
            comment: config.comment,
            nodes,
            infosets: Arena::new(),
            actions: Arena::new(),
            outcomes: Arena::new(),
            outcome_order: Vec::new(),
            players: config.players.into_iter().map(Player::new).collect(),
            chance: Player::new(""),
            root,
            revision: 0,
            dirty: false,
            suppress_reindex: 0,
        };
        game.sort_infosets();
        game
    }

    /// Copy the part of `source` rooted at `node` into a new game.
    ///
    /// Players, infosets (with labels and chance probabilities) and outcomes
    /// are copied; when `node` is not the root, infosets left without
    /// members are dropped.
    pub fn from_subtree(source: &GameTree, node: NodeId) -> EfgResult<Self> {
        source.check_node(node)?;

        let mut game = Self {
            title: source.title.clone(),
            comment: source.comment.clone(),
            ..Self::from_config(GameConfig::default())
        };
        game.players = source
            .players
            .iter()
            .map(|p| Player::new(p.label.clone()))
            .collect();
        game.suppress_reindex += 1;

        let mut infoset_map: FxHashMap<InfosetId, InfosetId> = FxHashMap::default();
        for player in std::iter::once(PlayerId::CHANCE).chain(source.player_ids()) {
            for &s in &source.player_data(player).infosets {
                let original = &source.infosets[s];
                let copy = game.new_infoset(player, original.num_actions());
                game.infosets[copy].label = original.label.clone();
                game.infosets[copy].probs = original.probs.clone();
                let targets = game.infosets[copy].actions.clone();
                for (&from, &to) in original.actions.iter().zip(targets.iter()) {
                    game.actions[to].label = source.actions[from].label.clone();
                }
                infoset_map.insert(s, copy);
            }
        }

        let mut outcome_map: FxHashMap<OutcomeId, OutcomeId> = FxHashMap::default();
        for &o in &source.outcome_order {
            let copy = game.alloc_outcome();
            game.outcomes[copy].label = source.outcomes[o].label.clone();
            game.outcomes[copy].payoffs = source.outcomes[o].payoffs.clone();
            outcome_map.insert(o, copy);
        }

        let mut stack = vec![(game.root, node)];
        while let Some((to, from)) = stack.pop() {
            let original = &source.nodes[from];
            if original.gameroot == from {
                game.nodes[to].gameroot = to;
            }
            game.nodes[to].name = original.name.clone();
            game.nodes[to].outcome = original.outcome.map(|o| outcome_map[&o]);
            if let Some(s) = original.infoset {
                game.attach_infoset(to, infoset_map[&s]);
                let pairs: Vec<_> = game.nodes[to]
                    .children
                    .iter()
                    .copied()
                    .zip(original.children.iter().copied())
                    .collect();
                stack.extend(pairs);
            }
        }

        if node != source.root {
            for player in std::iter::once(PlayerId::CHANCE).chain(game.player_ids().collect::<Vec<_>>()) {
                let empty: Vec<_> = game
                    .player_data(player)
                    .infosets
                    .iter()
                    .copied()
                    .filter(|&s| game.infosets[s].members.is_empty())
                    .collect();
                for s in empty {
                    game.remove_infoset(s);
                }
            }
        }

        game.suppress_reindex -= 1;
        game.sort_infosets();
        log::debug!("copied subgame at {} into a new game", node);
        Ok(game)
    }

    // =========================================================================
    // Revision tracking
    // =========================================================================

    /// Monotonic counter bumped by every structural or payoff edit.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Check for unsaved edits.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Set or clear the dirty flag.
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Record an applied edit. Derived caches compare against the revision.
    pub(crate) fn touch(&mut self) {
        self.revision += 1;
        self.dirty = true;
    }

    // =========================================================================
    // Title and comment
    // =========================================================================

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
        self.touch();
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// The root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn infoset(&self, id: InfosetId) -> Option<&Infoset> {
        self.infosets.get(id)
    }

    #[must_use]
    pub fn action(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(id)
    }

    #[must_use]
    pub fn outcome(&self, id: OutcomeId) -> Option<&Outcome> {
        self.outcomes.get(id)
    }

    /// Player data, including `PlayerId::CHANCE`.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        if id.is_chance() {
            Some(&self.chance)
        } else {
            self.players.get(id.number() - 1)
        }
    }

    /// The chance player's data.
    #[must_use]
    pub fn chance(&self) -> &Player {
        &self.chance
    }

    /// Number of personal players.
    #[must_use]
    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    /// Iterate over the personal players.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.players.len())
    }

    /// Total number of nodes in the tree.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Outcomes in number order.
    #[must_use]
    pub fn outcomes(&self) -> &[OutcomeId] {
        &self.outcome_order
    }

    #[must_use]
    pub fn num_outcomes(&self) -> usize {
        self.outcome_order.len()
    }

    /// Outcome with 1-based number `k`.
    #[must_use]
    pub fn outcome_by_number(&self, k: usize) -> Option<OutcomeId> {
        k.checked_sub(1).and_then(|k| self.outcome_order.get(k).copied())
    }

    /// Infoset of `player` with 1-based number `k`.
    #[must_use]
    pub fn infoset_by_number(&self, player: PlayerId, k: usize) -> Option<InfosetId> {
        let player = self.player(player)?;
        k.checked_sub(1).and_then(|k| player.infosets.get(k).copied())
    }

    /// 1-based position of `action` within its infoset.
    #[must_use]
    pub fn action_number(&self, action: ActionId) -> Option<usize> {
        let data = self.actions.get(action)?;
        self.infosets[data.infoset].position(action)
    }

    /// Owner of the node's infoset, None for terminal nodes.
    #[must_use]
    pub fn node_player(&self, node: NodeId) -> Option<PlayerId> {
        let infoset = self.nodes.get(node)?.infoset?;
        Some(self.infosets[infoset].player)
    }

    /// The action whose branch leads from the parent into `node`.
    #[must_use]
    pub fn prior_action(&self, node: NodeId) -> Option<ActionId> {
        let parent = self.nodes.get(node)?.parent?;
        let position = self.child_position(parent, node)?;
        let infoset = self.nodes[parent].infoset?;
        self.infosets[infoset].actions.get(position).copied()
    }

    /// The sibling immediately before `node`.
    #[must_use]
    pub fn prior_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.nodes.get(node)?.parent?;
        let position = self.child_position(parent, node)?;
        position
            .checked_sub(1)
            .map(|i| self.nodes[parent].children[i])
    }

    /// The sibling immediately after `node`.
    #[must_use]
    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.nodes.get(node)?.parent?;
        let position = self.child_position(parent, node)?;
        self.nodes[parent].children.get(position + 1).copied()
    }

    /// Check whether `node` lies on the path from the root to `of`
    /// (a node is its own predecessor).
    #[must_use]
    pub fn is_predecessor(&self, node: NodeId, of: NodeId) -> bool {
        let mut cursor = Some(of);
        while let Some(current) = cursor {
            if current == node {
                return true;
            }
            cursor = self.nodes.get(current).and_then(|n| n.parent);
        }
        false
    }

    /// Check whether `node` lies in the subtree rooted at `from`.
    #[must_use]
    pub fn is_successor(&self, node: NodeId, from: NodeId) -> bool {
        self.is_predecessor(from, node)
    }

    // =========================================================================
    // Players
    // =========================================================================

    /// Add a personal player. Every outcome gains a zero payoff for it.
    ///
    /// Panics when the game already has 255 personal players.
    pub fn new_player(&mut self) -> PlayerId {
        assert!(self.players.len() < 255, "At most 255 players supported");
        self.players.push(Player::default());
        for (_, outcome) in self.outcomes.iter_mut() {
            outcome.payoffs.push(0.0);
        }
        self.touch();
        let id = PlayerId::new(self.players.len() as u8);
        log::debug!("added {}", id);
        id
    }

    pub fn set_player_label(&mut self, player: PlayerId, label: impl Into<String>) -> EfgResult<()> {
        self.check_player(player)?;
        self.player_data_mut(player).label = label.into();
        self.touch();
        Ok(())
    }

    // =========================================================================
    // Outcomes
    // =========================================================================

    /// Add an outcome with zero payoffs for every player.
    pub fn new_outcome(&mut self) -> OutcomeId {
        let id = self.alloc_outcome();
        self.touch();
        log::debug!("added outcome {}", self.outcome_order.len());
        id
    }

    /// Delete an outcome, detaching it from every node that references it.
    pub fn delete_outcome(&mut self, outcome: OutcomeId) -> EfgResult<()> {
        self.check_outcome(outcome)?;
        let attached: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.outcome == Some(outcome))
            .map(|(id, _)| id)
            .collect();
        for node in attached {
            self.nodes[node].outcome = None;
        }
        self.outcome_order.retain(|&o| o != outcome);
        self.outcomes.free(outcome);
        self.reindex_outcomes();
        self.touch();
        log::debug!("deleted {}", outcome);
        Ok(())
    }

    pub fn set_outcome_label(&mut self, outcome: OutcomeId, label: impl Into<String>) -> EfgResult<()> {
        self.check_outcome(outcome)?;
        self.outcomes[outcome].label = label.into();
        self.touch();
        Ok(())
    }

    /// Set one player's payoff at an outcome.
    pub fn set_payoff(&mut self, outcome: OutcomeId, player: PlayerId, value: f64) -> EfgResult<()> {
        self.check_outcome(outcome)?;
        if player.is_chance() {
            return Err(EfgError::InvalidPlayer(player));
        }
        self.check_player(player)?;
        self.outcomes[outcome].payoffs[player] = value;
        self.touch();
        Ok(())
    }

    /// One player's payoff at an outcome.
    pub fn outcome_payoff(&self, outcome: OutcomeId, player: PlayerId) -> EfgResult<f64> {
        let data = self.check_outcome(outcome)?;
        if player.is_chance() || !data.payoffs.contains(player) {
            return Err(EfgError::InvalidPlayer(player));
        }
        Ok(data.payoffs[player])
    }

    /// All payoffs at an outcome.
    pub fn outcome_payoffs(&self, outcome: OutcomeId) -> EfgResult<&PlayerMap<f64>> {
        Ok(&self.check_outcome(outcome)?.payoffs)
    }

    /// One player's payoff at a node's outcome; zero without an outcome.
    pub fn node_payoff(&self, node: NodeId, player: PlayerId) -> EfgResult<f64> {
        match self.check_node(node)?.outcome {
            Some(outcome) => self.outcome_payoff(outcome, player),
            None if !player.is_chance() && player.number() <= self.players.len() => Ok(0.0),
            None => Err(EfgError::InvalidPlayer(player)),
        }
    }

    /// Attach an outcome to a node, or detach with `None`.
    pub fn set_outcome(&mut self, node: NodeId, outcome: Option<OutcomeId>) -> EfgResult<()> {
        self.check_node(node)?;
        if let Some(outcome) = outcome {
            self.check_outcome(outcome)?;
        }
        self.nodes[node].outcome = outcome;
        self.touch();
        Ok(())
    }

    // =========================================================================
    // Labels and chance probabilities
    // =========================================================================

    pub fn set_node_name(&mut self, node: NodeId, name: impl Into<String>) -> EfgResult<()> {
        self.check_node(node)?;
        self.nodes[node].name = name.into();
        self.touch();
        Ok(())
    }

    pub fn set_infoset_label(&mut self, infoset: InfosetId, label: impl Into<String>) -> EfgResult<()> {
        self.check_infoset(infoset)?;
        self.infosets[infoset].label = label.into();
        self.touch();
        Ok(())
    }

    pub fn set_action_label(&mut self, action: ActionId, label: impl Into<String>) -> EfgResult<()> {
        self.check_action(action)?;
        self.actions[action].label = label.into();
        self.touch();
        Ok(())
    }

    /// Set the probability of a chance action. No normalization is applied.
    pub fn set_chance_prob(&mut self, action: ActionId, prob: f64) -> EfgResult<()> {
        let infoset = self.check_action(action)?.infoset;
        if !self.infosets[infoset].is_chance() {
            return Err(EfgError::NotChance);
        }
        let position = self.infosets[infoset]
            .position(action)
            .ok_or(EfgError::ForeignAction)?;
        self.infosets[infoset].probs[position - 1] = prob;
        self.touch();
        Ok(())
    }

    /// Probability of a chance action; zero for personal actions.
    pub fn chance_prob(&self, action: ActionId) -> EfgResult<f64> {
        let infoset = &self.infosets[self.check_action(action)?.infoset];
        Ok(match infoset.position(action) {
            Some(position) if infoset.is_chance() => infoset.probs[position - 1],
            _ => 0.0,
        })
    }

    // =========================================================================
    // Counting
    // =========================================================================

    /// Sum of action counts over all personal infosets.
    #[must_use]
    pub fn profile_length(&self) -> usize {
        self.players
            .iter()
            .flat_map(|p| p.infosets.iter())
            .map(|&s| self.infosets[s].num_actions())
            .sum()
    }

    /// Infoset count per personal player.
    #[must_use]
    pub fn num_infosets(&self) -> PlayerMap<usize> {
        self.players.iter().map(|p| p.infosets.len()).collect::<Vec<_>>().into()
    }

    #[must_use]
    pub fn num_player_infosets(&self) -> usize {
        self.players.iter().map(|p| p.infosets.len()).sum()
    }

    #[must_use]
    pub fn num_chance_infosets(&self) -> usize {
        self.chance.infosets.len()
    }

    #[must_use]
    pub fn total_num_infosets(&self) -> usize {
        self.num_player_infosets() + self.num_chance_infosets()
    }

    /// Action count per personal player and infoset, in infoset order.
    #[must_use]
    pub fn num_actions(&self) -> PlayerMap<Vec<usize>> {
        self.per_infoset(|s| s.num_actions())
    }

    /// Total actions per personal player.
    #[must_use]
    pub fn num_player_actions(&self) -> usize {
        self.num_actions().values().flatten().sum()
    }

    /// Member count per personal player and infoset, in infoset order.
    #[must_use]
    pub fn num_members(&self) -> PlayerMap<Vec<usize>> {
        self.per_infoset(|s| s.num_members())
    }

    fn per_infoset(&self, f: impl Fn(&Infoset) -> usize) -> PlayerMap<Vec<usize>> {
        self.players
            .iter()
            .map(|p| p.infosets.iter().map(|&s| f(&self.infosets[s])).collect::<Vec<_>>())
            .collect::<Vec<_>>()
            .into()
    }

    // =========================================================================
    // Handle validation
    // =========================================================================

    pub(crate) fn check_node(&self, id: NodeId) -> EfgResult<&Node> {
        self.nodes.get(id).ok_or(EfgError::InvalidHandle { kind: NodeId::KIND })
    }

    pub(crate) fn check_infoset(&self, id: InfosetId) -> EfgResult<&Infoset> {
        self.infosets
            .get(id)
            .ok_or(EfgError::InvalidHandle { kind: InfosetId::KIND })
    }

    pub(crate) fn check_action(&self, id: ActionId) -> EfgResult<&Action> {
        self.actions
            .get(id)
            .ok_or(EfgError::InvalidHandle { kind: ActionId::KIND })
    }

    pub(crate) fn check_outcome(&self, id: OutcomeId) -> EfgResult<&Outcome> {
        self.outcomes
            .get(id)
            .ok_or(EfgError::InvalidHandle { kind: OutcomeId::KIND })
    }

    pub(crate) fn check_player(&self, id: PlayerId) -> EfgResult<()> {
        if id.number() <= self.players.len() {
            Ok(())
        } else {
            Err(EfgError::InvalidPlayer(id))
        }
    }

    // =========================================================================
    // Internal primitives (no revision bump, no reindex)
    // =========================================================================

    pub(crate) fn player_data(&self, id: PlayerId) -> &Player {
        if id.is_chance() {
            &self.chance
        } else {
            &self.players[id.number() - 1]
        }
    }

    pub(crate) fn player_data_mut(&mut self, id: PlayerId) -> &mut Player {
        if id.is_chance() {
            &mut self.chance
        } else {
            &mut self.players[id.number() - 1]
        }
    }

    /// Allocate a terminal node under `parent`, inheriting its subgame.
    pub(crate) fn alloc_node(&mut self, parent: NodeId) -> NodeId {
        let gameroot = self.nodes[parent].gameroot;
        self.nodes.alloc(Node::new(Some(parent), gameroot))
    }

    /// Create an infoset with `count` unlabeled actions at the tail of the
    /// player's list. Chance probabilities start at zero.
    pub(crate) fn new_infoset(&mut self, player: PlayerId, count: usize) -> InfosetId {
        let number = self.player_data(player).infosets.len() + 1;
        let id = self.infosets.alloc(Infoset::new(player, number));
        for _ in 0..count {
            let action = self.actions.alloc(Action {
                infoset: id,
                label: String::new(),
            });
            self.infosets[id].actions.push(action);
            if player.is_chance() {
                self.infosets[id].probs.push(0.0);
            }
        }
        self.player_data_mut(player).infosets.push(id);
        id
    }

    /// Free an infoset and its actions. Members must already be detached.
    pub(crate) fn remove_infoset(&mut self, id: InfosetId) {
        let player = self.infosets[id].player;
        self.player_data_mut(player).infosets.retain(|&s| s != id);
        if let Some(infoset) = self.infosets.free(id) {
            for action in infoset.actions {
                self.actions.free(action);
            }
        }
    }

    /// Copy infoset and action labels (and chance probabilities) of `from`
    /// onto `to`. Both must have the same action count.
    pub(crate) fn copy_labels(&mut self, from: InfosetId, to: InfosetId) {
        self.infosets[to].label = self.infosets[from].label.clone();
        self.infosets[to].probs = self.infosets[from].probs.clone();
        let pairs: Vec<_> = self.infosets[from]
            .actions
            .iter()
            .copied()
            .zip(self.infosets[to].actions.iter().copied())
            .collect();
        for (a, b) in pairs {
            self.actions[b].label = self.actions[a].label.clone();
        }
    }

    /// Make terminal `node` a member of `infoset` and grow its children.
    pub(crate) fn attach_infoset(&mut self, node: NodeId, infoset: InfosetId) {
        debug_assert!(self.nodes[node].is_terminal());
        self.nodes[node].infoset = Some(infoset);
        self.infosets[infoset].members.push(node);
        for _ in 0..self.infosets[infoset].num_actions() {
            let child = self.alloc_node(node);
            self.nodes[node].children.push(child);
        }
    }

    /// Move `node` out of its current infoset's member list into `infoset`.
    pub(crate) fn move_member(&mut self, node: NodeId, infoset: InfosetId) {
        if let Some(old) = self.nodes[node].infoset {
            self.infosets[old].members.retain(|&m| m != node);
        }
        self.nodes[node].infoset = Some(infoset);
        self.infosets[infoset].members.push(node);
    }

    pub(crate) fn child_position(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.nodes[parent].children.iter().position(|&c| c == child)
    }

    fn alloc_outcome(&mut self) -> OutcomeId {
        let id = self
            .outcomes
            .alloc(Outcome::new(self.players.len(), self.outcome_order.len() + 1));
        self.outcome_order.push(id);
        id
    }

    pub(crate) fn reindex_outcomes(&mut self) {
        for (i, &o) in self.outcome_order.iter().enumerate() {
            self.outcomes[o].number = i + 1;
        }
    }
}
