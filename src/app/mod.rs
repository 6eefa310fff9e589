//! Application orchestration — build pipeline, state, event loop, and input
//! handling.

pub mod build;
pub mod event;
pub mod fetch_runtime;
pub mod handler;
pub mod state;
