//! Game engine and win detection.
//!
//! `GameEngine` is the root component: it routes each command to the
//! dispatcher or one of the resolvers by phase and command kind, keeps the
//! input log, and exposes the snapshot pollers read.

pub mod engine;
pub mod outcome;

pub use engine::{GameEngine, GameRecord, Response};
pub use outcome::Outcome;
