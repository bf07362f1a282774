//! Core types and shared functionality for crumbwise.
//!
//! This crate provides:
//! - The cookie analysis cache and its storage backends
//! - Cookie records and domain extraction
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod cookie;
pub mod domain;
pub mod error;

pub use cache::{Analysis, AnalysisCache, CacheEntry, CacheStore, Generator};
pub use cookie::{CookieFilter, CookieRecord, SameSite};
pub use error::{Error, GenerationError};
