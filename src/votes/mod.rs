//! Day votes, tie detection, and revotes.

mod tally;

pub use tally::{TallyResult, VoteTally};
