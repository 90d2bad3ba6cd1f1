//! Night moves and kill resolution.

mod resolver;

pub use resolver::MoveResolver;
