//! German practice engine: typing drills and sentence building.
//!
//! The binary in `main.rs` is a ratatui front end over these modules; all
//! session logic lives here so it can be driven from tests and benchmarks
//! with injected timestamps and a seeded random source.

pub mod config;
pub mod content;
pub mod engine;
pub mod session;
pub mod store;
