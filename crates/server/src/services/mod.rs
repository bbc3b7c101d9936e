//! Plugin services layered over the engine.

pub mod altar;
pub mod detection;
pub mod placement;
pub mod spawning;
pub mod testament;
