//! Rectris (workspace facade crate).
//!
//! Re-exports the member crates under `rectris::{core,input,term,types}` and adds
//! the pieces that touch the file system: the TOML [`config`] and the JSON
//! [`records`] table.

pub mod config;
pub mod records;

pub use rectris_core as core;
pub use rectris_input as input;
pub use rectris_term as term;
pub use rectris_types as types;
