//! # FeedError
//!
//! Centralized error handling for the feed engine. Every variant is
//! recoverable: by retrying, by falling back to manual refresh, or by the
//! user correcting input.

use thiserror::Error;

use crate::models::ActivityId;

/// The primary error type for engine operations.
#[derive(Debug, Error)]
pub enum FeedError {
    /// A fetch (organizations, subcategories, activities, composed activity)
    /// failed. Prior state is left intact; the call is safe to retry.
    #[error("failed to load {what}: {source}")]
    Load {
        what: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// A like toggle was rejected by the server. The optimistic mutation has
    /// already been rolled back when this surfaces.
    #[error("failed to toggle like for activity {activity_id}: {source}")]
    Toggle {
        activity_id: ActivityId,
        #[source]
        source: anyhow::Error,
    },

    /// The realtime channel could not be bound. The feed stays usable
    /// through manual refresh.
    #[error("subscription to {channel} failed: {source}")]
    Subscription {
        channel: String,
        #[source]
        source: anyhow::Error,
    },

    /// The draft failed local validation; nothing was sent.
    #[error("activity draft is invalid ({} field(s))", .0.len())]
    Composition(Vec<FieldError>),
}

/// One offending field in a rejected draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// A specialized Result type for engine operations.
pub type Result<T> = std::result::Result<T, FeedError>;
