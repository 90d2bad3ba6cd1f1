//! Phase control.
//!
//! The game alternates night and day after role dispatch. Round counting is
//! tied to the day-entry edge: a round is one completed night-to-day
//! transition.

mod controller;

pub use controller::{Phase, PhaseController};
