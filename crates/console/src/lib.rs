//! `marches-console` library crate.
//!
//! Command-line client of the dashboard API. Re-exports internal modules
//! for integration testing; the binary entrypoint lives in `main.rs`.

pub mod api;
pub mod args;
pub mod commands;
pub mod config;
pub mod render;
