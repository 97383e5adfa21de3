//! rooms-server
//!
//! Multi-client async TCP server for multiplayer chess rooms.

pub mod config;
pub mod types;
pub mod server;

// these are internal modules, not re-exported
mod client;
mod lobby_task;
