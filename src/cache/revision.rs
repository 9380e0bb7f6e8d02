//! A value derived from a game, valid only at the revision it was built at.
//!
//! The game never rebuilds derived data itself. Owners hold a
//! `DerivedCache` and rebuild lazily once the live revision has moved on.

use crate::tree::GameTree;

/// A lazily rebuilt value stamped with the game revision it reflects.
///
/// ```
/// use rust_efg::cache::DerivedCache;
/// use rust_efg::tree::GameTree;
///
/// let mut game = GameTree::new();
/// let mut title_len = DerivedCache::new();
///
/// assert_eq!(*title_len.get_or_build(&game, |g| g.title().len()), 8);
/// game.set_title("Poker");
/// assert!(title_len.is_stale(&game));
/// assert_eq!(*title_len.get_or_build(&game, |g| g.title().len()), 5);
/// ```
#[derive(Clone, Debug)]
pub struct DerivedCache<T> {
    entry: Option<(u64, T)>,
}

impl<T> Default for DerivedCache<T> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<T> DerivedCache<T> {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the cache is empty or was built at another revision.
    #[must_use]
    pub fn is_stale(&self, game: &GameTree) -> bool {
        !matches!(self.entry, Some((revision, _)) if revision == game.revision())
    }

    /// The cached value, if it matches the game's current revision.
    #[must_use]
    pub fn get(&self, game: &GameTree) -> Option<&T> {
        match &self.entry {
            Some((revision, value)) if *revision == game.revision() => Some(value),
            _ => None,
        }
    }

    /// The cached value, rebuilt first when stale.
    pub fn get_or_build(&mut self, game: &GameTree, build: impl FnOnce(&GameTree) -> T) -> &T {
        if self.is_stale(game) {
            self.entry = None;
        }
        let (_, value) = self.entry.get_or_insert_with(|| {
            log::trace!("rebuilding derived cache at revision {}", game.revision());
            (game.revision(), build(game))
        });
        value
    }

    /// Drop the cached value.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// The revision the cached value was built at.
    #[must_use]
    pub fn built_at(&self) -> Option<u64> {
        self.entry.as_ref().map(|(revision, _)| *revision)
    }
}
