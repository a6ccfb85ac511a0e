//! Presentational widgets for the Pulsato app.
//!
//! Every component ships its own stylesheet through `asset!` and accepts
//! global attributes so callers can add classes.

pub mod components;

pub use components::*;
