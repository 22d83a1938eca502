//! # Core Traits (Ports)
//!
//! The engine talks to the outside world through these two contracts: an
//! HTTP-ish data-access collaborator and a pub/sub broker. Any adapter must
//! implement them to be used by the engine.

use async_trait::async_trait;
#[cfg(feature = "testing")]
use mockall::automock;
use tokio::sync::mpsc;

use crate::models::{
    ActivityDraft, ActivityId, ActivityPage, ActivityRecord, LikeBroadcast, LikeStatus, OrgId,
    Organization, Subcategory, SubcategoryId,
};

/// Event name carrying like updates on an organization channel.
pub const LIKE_EVENT: &str = "activity-like-update";

/// Channel name for one organization's activity feed.
pub fn activity_channel(org: OrgId) -> String {
    format!("org-{org}-activities")
}

/// Data-access contract for the feed. Transport is the adapter's business.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait ActivityDirectory: Send + Sync {
    async fn list_organizations(&self) -> anyhow::Result<Vec<Organization>>;

    async fn list_subcategories(&self, org: OrgId) -> anyhow::Result<Vec<Subcategory>>;

    /// One page of activities, newest first, optionally narrowed to a
    /// subcategory. `page` is 1-based.
    async fn fetch_activities(
        &self,
        org: OrgId,
        page: u32,
        page_size: u32,
        subcategory: Option<SubcategoryId>,
    ) -> anyhow::Result<ActivityPage>;

    /// Confirmed like state for one activity as seen by the current user.
    async fn fetch_like_status(&self, activity: ActivityId) -> anyhow::Result<LikeStatus>;

    /// Flips the current user's like and returns the confirmed state.
    async fn toggle_like(&self, activity: ActivityId) -> anyhow::Result<LikeStatus>;

    async fn create_activity(&self, draft: &ActivityDraft) -> anyhow::Result<ActivityRecord>;
}

/// Live deliveries for one channel binding, in arrival order.
///
/// Dropping the receiver stops delivery locally; the engine still calls
/// `unsubscribe` so the broker releases the binding too.
pub struct BusSubscription {
    pub messages: mpsc::Receiver<LikeBroadcast>,
}

/// Pub/sub contract. The engine holds at most one active binding.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait ActivityBus: Send + Sync {
    async fn subscribe(&self, channel: &str, event: &str) -> anyhow::Result<BusSubscription>;

    async fn unsubscribe(&self, channel: &str, event: &str) -> anyhow::Result<()>;
}
