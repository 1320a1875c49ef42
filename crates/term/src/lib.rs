//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It renders into a
//! simple framebuffer that is then flushed to the terminal, without any widget
//! or layout library in between.
//!
//! - [`game_view`] turns a [`core::GameSnapshot`] plus the record standings into
//!   a framebuffer (pure, unit-testable)
//! - [`renderer`] owns the terminal and writes only what changed between frames

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use rectris_core as core;
pub use rectris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_frame_into, TerminalRenderer};
