//! Evaluating the tree under a pure strategy profile.

mod payoff;
mod profile;

pub use profile::PureProfile;
