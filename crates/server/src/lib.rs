//! Testament plugin runtime: the in-memory host, its execution contexts,
//! and the services that drive altar generation, fragment drops and
//! testament completion.

pub mod block;
pub mod config;
pub mod event_bus;
pub mod host;
pub mod items;
pub mod listeners;
pub mod persistence;
pub mod plugin;
pub mod scheduler;
pub mod services;
pub mod stats;
