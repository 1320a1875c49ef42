//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. Movement is
//! one action per key press; the terminal's own key repeat provides
//! auto-shift, so no key-state tracking is kept here.

pub mod map;

pub use rectris_types as types;

pub use map::{handle_key_event, should_quit};
