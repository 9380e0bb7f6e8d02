//! Expected payoffs and reach probabilities under a pure profile, plus
//! scans over the outcome list.

use super::profile::PureProfile;
use crate::core::{EfgError, EfgResult, NodeId, PlayerId, PlayerMap};
use crate::tree::GameTree;

impl GameTree {
    /// Expected payoff of every player when `profile` is played.
    ///
    /// Chance nodes weight each child by its action probability; personal
    /// nodes follow the single chosen child. Outcomes count wherever they
    /// sit, weighted by the probability of reaching their node.
    pub fn payoff(&self, profile: &PureProfile) -> EfgResult<PlayerMap<f64>> {
        profile.check_shape(self)?;
        let mut totals = PlayerMap::with_value(self.num_players(), 0.0);
        self.descend(profile, |game, node, prob| {
            if let Some(outcome) = game.node(node).and_then(|n| n.outcome()) {
                if let Some(data) = game.outcome(outcome) {
                    for (player, value) in data.payoffs().iter() {
                        totals[player] += prob * value;
                    }
                }
            }
        })?;
        Ok(totals)
    }

    /// Probability of reaching each personal infoset when `profile` is
    /// played, indexed by player and infoset number.
    pub fn infoset_probs(&self, profile: &PureProfile) -> EfgResult<PlayerMap<Vec<f64>>> {
        profile.check_shape(self)?;
        let sizes: Vec<Vec<f64>> = self
            .num_infosets()
            .values()
            .map(|&k| vec![0.0; k])
            .collect();
        let mut probs = PlayerMap::from(sizes);
        self.descend(profile, |game, node, prob| {
            let Some(infoset) = game.node(node).and_then(|n| n.infoset()) else {
                return;
            };
            if let Some(data) = game.infoset(infoset) {
                if !data.is_chance() {
                    probs[data.player()][data.number() - 1] += prob;
                }
            }
        })?;
        Ok(probs)
    }

    /// Check whether every outcome's payoffs sum to the same total.
    ///
    /// Sums are compared exactly. A game without outcomes is constant-sum.
    #[must_use]
    pub fn is_const_sum(&self) -> bool {
        let mut sums = self.outcomes().iter().filter_map(|&o| {
            self.outcome(o).map(|data| data.payoffs().values().sum::<f64>())
        });
        match sums.next() {
            Some(first) => sums.all(|s| s == first),
            None => true,
        }
    }

    /// Smallest payoff of `player` over all outcomes, or of any player with
    /// `None`. Zero when there are no outcomes.
    pub fn min_payoff(&self, player: Option<PlayerId>) -> EfgResult<f64> {
        Ok(self.payoff_values(player)?.reduce(f64::min).unwrap_or(0.0))
    }

    /// Largest payoff of `player` over all outcomes, or of any player with
    /// `None`. Zero when there are no outcomes.
    pub fn max_payoff(&self, player: Option<PlayerId>) -> EfgResult<f64> {
        Ok(self.payoff_values(player)?.reduce(f64::max).unwrap_or(0.0))
    }

    fn payoff_values(&self, player: Option<PlayerId>) -> EfgResult<impl Iterator<Item = f64> + '_> {
        if let Some(p) = player {
            if p.is_chance() || p.number() > self.num_players() {
                return Err(EfgError::InvalidPlayer(p));
            }
        }
        Ok(self
            .outcomes()
            .iter()
            .filter_map(|&o| self.outcome(o))
            .flat_map(move |data| {
                data.payoffs()
                    .iter()
                    .filter(move |(p, _)| player.map_or(true, |only| only == *p))
                    .map(|(_, &v)| v)
            }))
    }

    /// Walk the nodes reached under `profile` with their reach probability.
    fn descend(&self, profile: &PureProfile, mut visit: impl FnMut(&Self, NodeId, f64)) -> EfgResult<()> {
        let mut stack = vec![(self.root(), 1.0)];
        while let Some((id, prob)) = stack.pop() {
            visit(self, id, prob);
            let node = self.check_node(id)?;
            let Some(infoset) = node.infoset() else {
                continue;
            };
            let data = self.check_infoset(infoset)?;
            if data.is_chance() {
                for (&child, &p) in node.children().iter().zip(data.probs()) {
                    stack.push((child, prob * p));
                }
            } else {
                let position = profile.choice(data.player(), data.number())?;
                let child = node.child(position).ok_or(EfgError::ProfileMismatch)?;
                stack.push((child, prob));
            }
        }
        Ok(())
    }
}
