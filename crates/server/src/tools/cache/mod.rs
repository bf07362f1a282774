//! Cache-related MCP tools.
//!
//! This module provides tools for inspecting and maintaining the analysis cache.

pub mod clear;
pub mod stats;
pub mod sweep;

pub use clear::{CacheClearParams, clear_impl};
pub use stats::stats_impl;
pub use sweep::sweep_impl;
