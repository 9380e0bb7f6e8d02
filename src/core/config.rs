//! Game configuration.
//!
//! A `GameConfig` describes the metadata a new game starts with: title,
//! comment and the labels of its initial personal players. The tree itself
//! always starts as a single terminal root.

use serde::{Deserialize, Serialize};

/// Default title of a new game.
pub const DEFAULT_TITLE: &str = "UNTITLED";

/// Configuration for a new game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Game title, written in the file header.
    pub title: String,

    /// Free-form comment, written after the header.
    pub comment: String,

    /// Labels of the initial personal players, in player order.
    pub players: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            comment: String::new(),
            players: Vec::new(),
        }
    }
}

impl GameConfig {
    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Add a personal player with the given label.
    #[must_use]
    pub fn with_player(mut self, label: impl Into<String>) -> Self {
        self.players.push(label.into());
        self
    }

    /// Number of initial personal players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.title, "UNTITLED");
        assert!(config.comment.is_empty());
        assert_eq!(config.player_count(), 0);
    }

    #[test]
    fn test_builder_pattern() {
        let config = GameConfig::default()
            .with_title("Matching pennies")
            .with_comment("two players")
            .with_player("Row")
            .with_player("Column");

        assert_eq!(config.title, "Matching pennies");
        assert_eq!(config.comment, "two players");
        assert_eq!(config.players, vec!["Row", "Column"]);
    }

    #[test]
    fn test_serialization() {
        let config = GameConfig::default().with_player("Alice");
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
