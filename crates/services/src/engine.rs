//! Feed orchestrator.
//!
//! The façade the UI layer talks to. Composes the pagination controller,
//! like reconciler and subscription manager over the two ports, and keeps
//! each entry's `likes` mirror in step with the reconciler.

use std::sync::Arc;

use domains::models::{
    ActivityDraft, ActivityId, FeedEntry, LikeState, LikeStatus, OrgId, Organization, Subcategory,
    SubcategoryId, UserId,
};
use domains::ports::{ActivityBus, ActivityDirectory};
use domains::{FeedError, Result};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::likes::LikeReconciler;
use crate::pagination::{FilterKey, LoadOutcome, PaginationController};
use crate::subscription::SubscriptionManager;
use crate::transform;

pub struct FeedEngine {
    directory: Arc<dyn ActivityDirectory>,
    current_user: UserId,
    page_size: u32,
    organizations: Vec<Organization>,
    subcategories: Vec<Subcategory>,
    pagination: PaginationController,
    likes: LikeReconciler,
    subscription: SubscriptionManager,
}

impl FeedEngine {
    pub fn new(
        directory: Arc<dyn ActivityDirectory>,
        bus: Arc<dyn ActivityBus>,
        current_user: UserId,
        page_size: u32,
    ) -> Self {
        Self {
            directory,
            current_user,
            page_size,
            organizations: Vec::new(),
            subcategories: Vec::new(),
            pagination: PaginationController::new(),
            likes: LikeReconciler::new(current_user),
            subscription: SubscriptionManager::new(bus),
        }
    }

    /// Loads the organization list and selects the first entry, which is
    /// the initial view the UI presents.
    pub async fn start(&mut self) -> Result<()> {
        self.organizations = self
            .directory
            .list_organizations()
            .await
            .map_err(|source| FeedError::Load {
                what: "organizations",
                source,
            })?;
        info!(count = self.organizations.len(), "organizations loaded");
        let first = self.organizations.first().map(|o| o.id);
        self.select_organization(first).await
    }

    /// Switches the feed to another organization: rebind the realtime
    /// channel, reload subcategories, reset pagination and like state, and
    /// load page 1 under the new filter key. Selecting the current
    /// organization again is a no-op.
    pub async fn select_organization(&mut self, org: Option<OrgId>) -> Result<()> {
        if self.selected_org() == org {
            return Ok(());
        }

        // Rebind first so no stale-channel message lands in the freshly
        // reset state. Losing realtime updates is not fatal: the feed stays
        // usable through manual refresh.
        if let Err(error) = self.subscription.bind(org).await {
            warn!(%error, "realtime updates unavailable");
        }

        self.likes.clear();
        self.subcategories.clear();

        let Some(org) = org else {
            self.pagination.set_filter(None);
            return Ok(());
        };

        self.subcategories = match self.directory.list_subcategories(org).await {
            Ok(subcategories) => subcategories,
            Err(error) => {
                warn!(org, %error, "failed to load subcategories");
                Vec::new()
            }
        };

        self.pagination.set_filter(Some(FilterKey {
            org,
            subcategory: None,
        }));
        self.run_load(1).await
    }

    /// Narrows (or widens, with `None`) the feed to a subcategory of the
    /// selected organization. No-op without an organization or when the
    /// subcategory is already selected.
    pub async fn select_subcategory(&mut self, subcategory: Option<SubcategoryId>) -> Result<()> {
        let Some(key) = self.pagination.filter() else {
            return Ok(());
        };
        if !self
            .pagination
            .set_filter(Some(FilterKey { subcategory, ..key }))
        {
            return Ok(());
        }
        self.likes.clear();
        self.run_load(1).await
    }

    /// Re-runs page 1 for the current filter key. Entries are replaced only
    /// when the new page arrives, so a failed refresh leaves the prior feed
    /// visible.
    pub async fn refresh(&mut self) -> Result<()> {
        self.run_load(1).await
    }

    /// Loads the next page. No-op when the last page is already loaded or a
    /// load is in flight.
    pub async fn load_more(&mut self) -> Result<()> {
        if !self.pagination.has_more() || self.pagination.is_loading() {
            return Ok(());
        }
        self.run_load(self.pagination.page() + 1).await
    }

    async fn run_load(&mut self, page: u32) -> Result<()> {
        let Some(ticket) = self.pagination.begin_load(page) else {
            return Ok(());
        };
        let key = ticket.key();

        let fetched = self
            .directory
            .fetch_activities(key.org, ticket.page(), self.page_size, key.subcategory)
            .await;
        let page_data = match fetched {
            Ok(page_data) => page_data,
            Err(source) => {
                self.pagination.fail_load(ticket);
                return Err(FeedError::Load {
                    what: "activities",
                    source,
                });
            }
        };

        let entries: Vec<FeedEntry> = page_data.records.iter().map(transform::transform).collect();
        let ids: Vec<ActivityId> = entries.iter().map(|e| e.id).collect();
        match self
            .pagination
            .complete_load(ticket, entries, page_data.page_count)
        {
            LoadOutcome::Superseded => return Ok(()),
            LoadOutcome::Applied => {}
        }
        debug!(page, count = ids.len(), "page applied");

        self.seed_like_statuses(&ids).await;
        Ok(())
    }

    /// Batched per-page like-status fetch. A failed item defaults to a
    /// neutral status; it never aborts the batch or the page.
    async fn seed_like_statuses(&mut self, ids: &[ActivityId]) {
        if ids.is_empty() {
            return;
        }
        let fetches = ids.iter().map(|&id| {
            let directory = Arc::clone(&self.directory);
            async move {
                directory.fetch_like_status(id).await.unwrap_or_else(|error| {
                    warn!(activity = id, %error, "like status unavailable, defaulting");
                    LikeStatus {
                        activity_id: id,
                        like_count: 0,
                        is_liked: false,
                    }
                })
            }
        });
        for status in join_all(fetches).await {
            self.likes.seed(status);
            let state = self.likes.state(status.activity_id);
            self.mirror_count(status.activity_id, state.like_count);
        }
    }

    /// User-initiated like toggle: optimistic mutation, then server
    /// confirmation or exact rollback. Ignored while a round-trip for the
    /// same activity is in flight.
    pub async fn toggle_like(&mut self, id: ActivityId) -> Result<LikeState> {
        let Some((ticket, optimistic)) = self.likes.begin_toggle(id) else {
            debug!(activity = id, "toggle ignored, round-trip in flight");
            return Ok(self.likes.state(id));
        };
        self.mirror_count(id, optimistic.like_count);

        match self.directory.toggle_like(id).await {
            Ok(status) => {
                let state = self.likes.confirm(ticket, status);
                self.mirror_count(id, state.like_count);
                Ok(state)
            }
            Err(source) => {
                let state = self.likes.rollback(ticket);
                self.mirror_count(id, state.like_count);
                Err(FeedError::Toggle {
                    activity_id: id,
                    source,
                })
            }
        }
    }

    /// Applies every broadcast received so far, in arrival order. Returns
    /// how many were applied.
    pub fn drain_broadcasts(&mut self) -> usize {
        let mut applied = 0;
        while let Some(broadcast) = self.subscription.try_recv() {
            self.likes.apply_broadcast(&broadcast);
            let state = self.likes.state(broadcast.activity_id);
            self.mirror_count(broadcast.activity_id, state.like_count);
            applied += 1;
        }
        if applied > 0 {
            debug!(applied, "broadcasts applied");
        }
        applied
    }

    /// Validates and submits a draft, prepends the created activity to the
    /// feed head, then runs the refresh-equivalent invalidation.
    pub async fn compose_activity(&mut self, draft: ActivityDraft) -> Result<()> {
        draft.validate().map_err(FeedError::Composition)?;
        let record = self
            .directory
            .create_activity(&draft)
            .await
            .map_err(|source| FeedError::Load {
                what: "composed activity",
                source,
            })?;
        info!(activity = record.id, "activity composed");

        self.likes.seed(LikeStatus {
            activity_id: record.id,
            like_count: record.likes,
            is_liked: false,
        });
        self.pagination.prepend(transform::transform(&record));
        self.refresh().await
    }

    /// Releases the realtime binding. In-flight loads keyed to the old
    /// context are discarded on completion by the ticket check.
    pub async fn shutdown(&mut self) {
        self.subscription.shutdown().await;
    }

    fn mirror_count(&mut self, id: ActivityId, count: u32) {
        if let Some(entry) = self.pagination.entry_mut(id) {
            entry.likes = count;
        }
    }

    // ── Read accessors for the UI layer ─────────────────────────────────────

    pub fn organizations(&self) -> &[Organization] {
        &self.organizations
    }

    pub fn subcategories(&self) -> &[Subcategory] {
        &self.subcategories
    }

    pub fn entries(&self) -> &[FeedEntry] {
        self.pagination.entries()
    }

    pub fn like_state(&self, id: ActivityId) -> LikeState {
        self.likes.state(id)
    }

    pub fn selected_org(&self) -> Option<OrgId> {
        self.pagination.filter().map(|k| k.org)
    }

    pub fn selected_subcategory(&self) -> Option<SubcategoryId> {
        self.pagination.filter().and_then(|k| k.subcategory)
    }

    pub fn page(&self) -> u32 {
        self.pagination.page()
    }

    pub fn has_more(&self) -> bool {
        self.pagination.has_more()
    }

    pub fn is_loading(&self) -> bool {
        self.pagination.is_loading()
    }

    pub fn current_user(&self) -> UserId {
        self.current_user
    }
}
