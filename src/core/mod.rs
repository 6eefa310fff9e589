//! Core algorithms – path-list parsing, tree rendering, and fetching the list.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod render;
pub mod source;
pub mod tree;
