//! # memory-adapters
//!
//! In-process implementations of the feed ports, used by the demo binary
//! and the integration tests. `MemoryDirectory` stands in for the HTTP
//! backend and, like the real one, publishes an `activity-like-update`
//! broadcast after every toggle; `MemoryBus` is the matching in-process
//! broker.

mod bus;
mod directory;

pub use bus::MemoryBus;
pub use directory::MemoryDirectory;
