//! # Feed Engine Services
//!
//! The activity-feed synchronization engine: media classification, record
//! normalization, pagination, like reconciliation, the realtime channel
//! binding, and the façade composing them. The UI layer talks to
//! [`engine::FeedEngine`] only.

pub mod engine;
pub mod likes;
pub mod media;
pub mod pagination;
pub mod subscription;
pub mod transform;

pub use engine::FeedEngine;
