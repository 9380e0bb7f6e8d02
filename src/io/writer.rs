//! `.efg` text writer.
//!
//! ```text
//! EFG 2 R "<title>" { "<player1>" "<player2>" }
//! "<comment>"
//!
//! p "<name>" <player> <infoset> "<label>" { "<action>" ... } <outcome clause>
//! c "<name>" <infoset> "<label>" { "<action>" <prob> ... } <outcome clause>
//! t "<name>" <outcome clause>
//! ```
//!
//! One record per node in preorder. The outcome clause is `0` without an
//! outcome, otherwise `<number> "<label>" { <payoff>, <payoff> }`.

use std::io::{self, Write};

use crate::core::{EfgResult, NodeId};
use crate::tree::{traverse, GameTree};

/// Escape embedded double quotes.
pub(crate) fn escape_quotes(s: &str) -> String {
    s.replace('"', "\\\"")
}

impl GameTree {
    /// Write the game in `.efg` format, printing numbers with `decimals`
    /// fractional digits.
    pub fn write_efg(&self, mut w: impl Write, decimals: usize) -> EfgResult<()> {
        write!(w, "EFG 2 R \"{}\" {{ ", escape_quotes(self.title()))?;
        for player in self.player_ids() {
            let label = self.player(player).map_or("", |p| p.label());
            write!(w, "\"{}\" ", escape_quotes(label))?;
        }
        writeln!(w, "}}")?;
        writeln!(w, "\"{}\"", escape_quotes(self.comment()))?;
        writeln!(w)?;

        for node in traverse::nodes(self) {
            self.write_node(&mut w, node, decimals)?;
        }
        w.flush()?;
        Ok(())
    }

    /// Render the game in `.efg` format.
    pub fn to_efg_string(&self, decimals: usize) -> EfgResult<String> {
        let mut buffer = Vec::new();
        self.write_efg(&mut buffer, decimals)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Write the game in `.efg` format and clear the dirty flag.
    pub fn save_efg(&mut self, w: impl Write, decimals: usize) -> EfgResult<()> {
        self.write_efg(w, decimals)?;
        self.set_dirty(false);
        log::debug!("saved game \"{}\"", self.title());
        Ok(())
    }

    fn write_node(&self, w: &mut impl Write, id: NodeId, decimals: usize) -> io::Result<()> {
        let Some(node) = self.node(id) else {
            return Ok(());
        };
        let name = escape_quotes(node.name());

        match node.infoset().and_then(|s| self.infoset(s)) {
            None => write!(w, "t \"{}\" ", name)?,
            Some(infoset) => {
                if infoset.is_chance() {
                    write!(w, "c \"{}\" ", name)?;
                } else {
                    write!(w, "p \"{}\" {} ", name, infoset.player().number())?;
                }
                write!(w, "{} \"{}\" {{ ", infoset.number(), escape_quotes(infoset.label()))?;
                for (i, &action) in infoset.actions().iter().enumerate() {
                    let label = self.action(action).map_or("", |a| a.label());
                    write!(w, "\"{}\" ", escape_quotes(label))?;
                    if infoset.is_chance() {
                        write!(w, "{:.*} ", decimals, infoset.probs()[i])?;
                    }
                }
                write!(w, "}} ")?;
            }
        }

        match node.outcome().and_then(|o| self.outcome(o)) {
            None => writeln!(w, "0"),
            Some(outcome) => {
                write!(w, "{} \"{}\" {{ ", outcome.number(), escape_quotes(outcome.label()))?;
                let payoffs: Vec<String> = outcome
                    .payoffs()
                    .values()
                    .map(|v| format!("{:.*}", decimals, v))
                    .collect();
                if payoffs.is_empty() {
                    writeln!(w, "}}")
                } else {
                    writeln!(w, "{} }}", payoffs.join(", "))
                }
            }
        }
    }
}
