//! Backing stores: the document store for chat and training records, and the
//! key-value counter cache behind the rate limiter.

pub mod cache;
pub mod documents;

pub use cache::{CounterCache, MemoryCache};
pub use documents::DocumentStore;
