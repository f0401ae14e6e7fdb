//! boxboard is a self-hosted leaderboard server for CrossFit affiliates
//! running an intramural Open. It pulls entrant scores from the public
//! CrossFit Games API, layers gym-side bonuses (team assignments, judging,
//! attendance, side challenges, spirit points) on top of them, and serves
//! the combined standings as an htmx/daisyUI web UI.
//!
//! The frontend build configuration (`tailwind.config.js`) is treated as a
//! first-class artifact: the [`assets`] module can load it from several
//! serialized forms, validate it, diff drifted copies, and re-emit the
//! canonical byte form.

pub mod assets;
pub mod cli;
pub mod error;
pub mod games;
pub mod observability;
pub mod roster;
pub mod scoring;
pub mod server;
pub mod settings;
pub mod store;

pub use error::{BoxboardError, Result};
