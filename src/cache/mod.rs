//! Cache module for holding upstream responses in memory
//!
//! This module provides a TTL cache that keeps at most one record per key. A
//! record is served until its expiry and never after it; the next successful
//! `set` replaces it wholesale.

mod ttl;

pub use ttl::{CachedRecord, TtlCache, DEFAULT_TTL};
