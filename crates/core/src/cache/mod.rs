//! Domain-keyed, fingerprinted, time-expiring cache of cookie analyses.
//!
//! - [`fingerprint`]: order- and value-independent identity of a cookie set
//! - [`store`]: the persisted domain to entry mapping over [`storage`]
//! - [`policy`]: hit/miss rules (expiry first, then fingerprint)
//! - [`sweep`]: bulk removal of expired entries
//! - [`orchestrator`]: get-or-generate entry point and cache management

pub mod connection;
pub mod fingerprint;
pub mod migrations;
pub mod orchestrator;
pub mod policy;
pub mod storage;
pub mod store;
pub mod sweep;

pub use crate::Error;

pub use connection::SqliteStorage;
pub use fingerprint::{EMPTY_FINGERPRINT, fingerprint};
pub use orchestrator::{Analysis, AnalysisCache, Clock, Generator, SystemClock};
pub use policy::{CachePolicy, DEFAULT_TTL, Lookup, MissReason};
pub use storage::{KeyValueStorage, MemoryStorage};
pub use store::{CacheEntry, CacheMap, CacheStats, CacheStore, DEFAULT_CACHE_KEY};
