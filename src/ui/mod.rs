//! UI / rendering layer — the display surface and everything that touches
//! Ratatui widgets.
//!
//! This layer takes rendered trees from the core, attaches them to a
//! [`surface::Surface`], aligns their columns, and draws them.  No fetching
//! happens here.

pub mod columns;
pub mod layout;
pub mod normalize;
pub mod spinner;
pub mod surface;
pub mod theme;
