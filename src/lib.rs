//! Pokedex TUI - paginated PokeAPI browser built on tui-dispatch
//!
//! The binary wires these modules into a terminal app; they are exposed as a
//! library for integration tests.

pub mod action;
pub mod api;
pub mod cache;
pub mod components;
pub mod config;
pub mod effect;
pub mod format;
pub mod logging;
pub mod reducer;
pub mod sprite;
pub mod state;
