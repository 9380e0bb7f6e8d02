//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! Type-safe player identifier. `PlayerId::CHANCE` (0) is the chance
//! pseudo-player; personal players are numbered 1..=N in creation order,
//! which is also the number written to `.efg` files.
//!
//! ## PlayerMap
//!
//! Per-personal-player storage backed by `Vec` for O(1) access.
//! Grows with `push` when a player is added to the game.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Player identifier. 0 is chance, 1..=N are personal players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// The chance pseudo-player.
    pub const CHANCE: PlayerId = PlayerId(0);

    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Check if this is the chance player.
    #[inline]
    #[must_use]
    pub const fn is_chance(self) -> bool {
        self.0 == 0
    }

    /// The player's number (0 for chance).
    #[inline]
    #[must_use]
    pub const fn number(self) -> usize {
        self.0 as usize
    }

    /// Iterate over the personal players of a game with `player_count` players.
    ///
    /// ```
    /// use rust_efg::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(players, vec![PlayerId::new(1), PlayerId::new(2), PlayerId::new(3)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (1..=player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_chance() {
            write!(f, "Chance")
        } else {
            write!(f, "Player {}", self.0)
        }
    }
}

/// Per-player data with O(1) access, one entry per personal player.
///
/// Indexing with `PlayerId::CHANCE` panics: chance never owns payoffs
/// or profile entries.
///
/// ## Example
///
/// ```
/// use rust_efg::core::{PlayerId, PlayerMap};
///
/// let mut payoffs: PlayerMap<f64> = PlayerMap::with_value(2, 0.0);
/// payoffs[PlayerId::new(2)] = 3.0;
/// payoffs.push(1.5);
///
/// assert_eq!(payoffs.player_count(), 3);
/// assert_eq!(payoffs[PlayerId::new(2)], 3.0);
/// assert_eq!(payoffs[PlayerId::new(3)], 1.5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count <= 255, "At most 255 players supported");

        let data = PlayerId::all(player_count).map(factory).collect();

        Self { data }
    }

    /// Create a new PlayerMap with all entries set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Create a new PlayerMap with default values.
    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Append an entry for a newly added player.
    pub fn push(&mut self, value: T) {
        assert!(self.data.len() < 255, "At most 255 players supported");
        self.data.push(value);
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[Self::slot(player)]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[Self::slot(player)]
    }

    /// Check whether `player` has an entry.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        !player.is_chance() && player.number() <= self.data.len()
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8 + 1), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8 + 1), v))
    }

    /// Iterate over the values in player order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Borrow the values as a slice in player order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn slot(player: PlayerId) -> usize {
        assert!(!player.is_chance(), "Chance has no PlayerMap entry");
        player.number() - 1
    }
}

impl<T> From<Vec<T>> for PlayerMap<T> {
    fn from(data: Vec<T>) -> Self {
        assert!(data.len() <= 255, "At most 255 players supported");
        Self { data }
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p1 = PlayerId::new(1);

        assert!(PlayerId::CHANCE.is_chance());
        assert!(!p1.is_chance());
        assert_eq!(p1.number(), 1);
        assert_eq!(format!("{}", p1), "Player 1");
        assert_eq!(format!("{}", PlayerId::CHANCE), "Chance");
    }

    #[test]
    fn test_player_id_all_skips_chance() {
        let players: Vec<_> = PlayerId::all(4).collect();
        assert_eq!(players.len(), 4);
        assert_eq!(players[0], PlayerId::new(1));
        assert_eq!(players[3], PlayerId::new(4));
        assert!(PlayerId::all(0).next().is_none());
    }

    #[test]
    fn test_player_map_new() {
        let map: PlayerMap<i32> = PlayerMap::new(3, |p| p.number() as i32 * 10);

        assert_eq!(map[PlayerId::new(1)], 10);
        assert_eq!(map[PlayerId::new(2)], 20);
        assert_eq!(map[PlayerId::new(3)], 30);
    }

    #[test]
    fn test_player_map_push() {
        let mut map: PlayerMap<f64> = PlayerMap::with_value(0, 0.0);
        assert_eq!(map.player_count(), 0);

        map.push(1.0);
        map.push(2.0);

        assert_eq!(map.player_count(), 2);
        assert_eq!(map[PlayerId::new(2)], 2.0);
        assert!(map.contains(PlayerId::new(2)));
        assert!(!map.contains(PlayerId::new(3)));
        assert!(!map.contains(PlayerId::CHANCE));
    }

    #[test]
    fn test_player_map_iter() {
        let map: PlayerMap<i32> = PlayerMap::new(2, |p| p.number() as i32);

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(PlayerId::new(1), &1), (PlayerId::new(2), &2)]);
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<i32> = PlayerMap::new(2, |p| p.number() as i32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    #[should_panic(expected = "Chance has no PlayerMap entry")]
    fn test_player_map_chance_index() {
        let map: PlayerMap<i32> = PlayerMap::with_value(2, 0);
        let _ = map[PlayerId::CHANCE];
    }
}
