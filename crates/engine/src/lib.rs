//! Host-agnostic core of the testament plugin: god factions, altar patterns
//! and layouts, procedural site selection, the altar registry and the
//! fragment drop engine.
//!
//! Nothing in this crate talks to a game server. The host is reached through
//! the traits in [`world`], [`drops::FragmentDelivery`], [`clock::Clock`] and
//! [`random::RandomSource`].

pub mod builder;
pub mod clock;
pub mod config;
pub mod creature;
pub mod drops;
pub mod god;
pub mod pattern;
pub mod random;
pub mod registry;
pub mod selector;
pub mod world;
