//! Cache Module
//!
//! The backend-agnostic cache contract, the key and expiry rules every
//! backend shares, and the in-process reference backend.

mod contract;
mod entry;
pub mod expiry;
pub mod keys;
mod lru;
mod simple;
mod stats;
mod store;


// Re-export public types
pub use contract::{Cache, TtlLookup};
pub use entry::{CacheEntry, MAX_LIFETIME};
pub use expiry::{remaining_secs, Expiry};
pub use keys::{namespaced, KeySpace, SEPARATOR};
pub use simple::SimpleCache;
pub use stats::CacheStats;
pub use store::MemoryStore;
