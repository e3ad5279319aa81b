//! # Nest core
//!
//! Domain types and rules shared by the database and API crates. Nothing in
//! here touches the network or the database.

pub mod errors;
pub mod models;
pub mod roster;
pub mod scoring;
pub mod slots;
pub mod teams;
