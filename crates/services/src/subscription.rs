//! Realtime channel binding.
//!
//! At most one pub/sub channel is live at a time, keyed by the selected
//! organization. Rebinding always releases the old channel before opening
//! the new one, so a rapid organization switch can never double-deliver.

use std::sync::Arc;

use domains::models::{LikeBroadcast, OrgId};
use domains::ports::{ActivityBus, BusSubscription, LIKE_EVENT, activity_channel};
use domains::{FeedError, Result};
use tracing::{debug, warn};

struct Binding {
    org: OrgId,
    channel: String,
    subscription: BusSubscription,
}

pub struct SubscriptionManager {
    bus: Arc<dyn ActivityBus>,
    active: Option<Binding>,
}

impl SubscriptionManager {
    pub fn new(bus: Arc<dyn ActivityBus>) -> Self {
        Self { bus, active: None }
    }

    pub fn bound_org(&self) -> Option<OrgId> {
        self.active.as_ref().map(|b| b.org)
    }

    /// Rebinds the single live channel. Binding the already-bound org is a
    /// no-op; `None` tears the binding down. A failed subscribe leaves no
    /// binding at all; the feed keeps working through manual refresh.
    pub async fn bind(&mut self, org: Option<OrgId>) -> Result<()> {
        if self.bound_org() == org {
            return Ok(());
        }

        if let Some(old) = self.active.take() {
            debug!(channel = %old.channel, "unsubscribing");
            if let Err(error) = self.bus.unsubscribe(&old.channel, LIKE_EVENT).await {
                // The receiver is dropped regardless, so no message can be
                // delivered twice even if the broker kept the binding.
                warn!(channel = %old.channel, %error, "unsubscribe failed");
            }
        }

        let Some(org) = org else { return Ok(()) };
        let channel = activity_channel(org);
        match self.bus.subscribe(&channel, LIKE_EVENT).await {
            Ok(subscription) => {
                debug!(%channel, "subscribed");
                self.active = Some(Binding {
                    org,
                    channel,
                    subscription,
                });
                Ok(())
            }
            Err(source) => Err(FeedError::Subscription { channel, source }),
        }
    }

    /// Next pending broadcast, in arrival order, without waiting.
    pub fn try_recv(&mut self) -> Option<LikeBroadcast> {
        self.active.as_mut()?.subscription.messages.try_recv().ok()
    }

    /// Releases the binding on engine disposal.
    pub async fn shutdown(&mut self) {
        // Unbinding cannot fail into an error the caller could act on.
        let _ = self.bind(None).await;
    }
}
