//! In-process data-access adapter.
//!
//! Serves seeded organizations, subcategories and activities with the same
//! observable behavior as the HTTP backend: newest-first pages, per-user
//! like toggling, and a broadcast published after every toggle.

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, bail};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use domains::models::{
    ActivityDraft, ActivityId, ActivityPage, ActivityRecord, DraftContent, LikeBroadcast,
    LikeStatus, MediaFile, OrgId, Organization, Subcategory, SubcategoryId, UserId, UserSummary,
};
use domains::ports::{ActivityDirectory, LIKE_EVENT, activity_channel};

use crate::MemoryBus;

#[derive(Debug, Default)]
struct LikeRecord {
    count: u32,
    likers: HashSet<UserId>,
}

pub struct MemoryDirectory {
    current_user: UserId,
    bus: Arc<MemoryBus>,
    organizations: Mutex<Vec<Organization>>,
    subcategories: DashMap<OrgId, Vec<Subcategory>>,
    activities: DashMap<OrgId, Vec<ActivityRecord>>,
    org_of: DashMap<ActivityId, OrgId>,
    likes: DashMap<ActivityId, LikeRecord>,
    next_id: AtomicI64,
}

impl MemoryDirectory {
    pub fn new(current_user: UserId, bus: Arc<MemoryBus>) -> Self {
        Self {
            current_user,
            bus,
            organizations: Mutex::new(Vec::new()),
            subcategories: DashMap::new(),
            activities: DashMap::new(),
            org_of: DashMap::new(),
            likes: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn add_organization(&self, org: Organization, subcategories: Vec<Subcategory>) {
        self.subcategories.insert(org.id, subcategories);
        self.organizations.lock().unwrap().push(org);
    }

    /// Seeds one activity. Higher ids count as newer.
    pub fn add_activity(&self, org: OrgId, record: ActivityRecord) {
        self.next_id.fetch_max(record.id + 1, Ordering::Relaxed);
        self.org_of.insert(record.id, org);
        self.likes.entry(record.id).or_default().count = record.likes;
        self.activities.entry(org).or_default().push(record);
    }
}

#[async_trait]
impl ActivityDirectory for MemoryDirectory {
    async fn list_organizations(&self) -> anyhow::Result<Vec<Organization>> {
        Ok(self.organizations.lock().unwrap().clone())
    }

    async fn list_subcategories(&self, org: OrgId) -> anyhow::Result<Vec<Subcategory>> {
        Ok(self
            .subcategories
            .get(&org)
            .map(|s| s.value().clone())
            .unwrap_or_default())
    }

    async fn fetch_activities(
        &self,
        org: OrgId,
        page: u32,
        page_size: u32,
        subcategory: Option<SubcategoryId>,
    ) -> anyhow::Result<ActivityPage> {
        if page == 0 || page_size == 0 {
            bail!("page and page size are 1-based");
        }
        let mut records: Vec<ActivityRecord> = self
            .activities
            .get(&org)
            .map(|r| r.value().clone())
            .unwrap_or_default()
            .into_iter()
            .filter(|r| match subcategory {
                Some(sub) => r.subcategory.as_ref().is_some_and(|s| s.id == sub),
                None => true,
            })
            .collect();
        records.sort_by_key(|r| std::cmp::Reverse(r.id));

        let total = records.len() as u32;
        let page_count = total.div_ceil(page_size);
        let start = ((page - 1) * page_size) as usize;
        let records = records
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();
        Ok(ActivityPage {
            records,
            page_count,
        })
    }

    async fn fetch_like_status(&self, activity: ActivityId) -> anyhow::Result<LikeStatus> {
        let record = self.likes.get(&activity).context("unknown activity")?;
        Ok(LikeStatus {
            activity_id: activity,
            like_count: record.count,
            is_liked: record.likers.contains(&self.current_user),
        })
    }

    async fn toggle_like(&self, activity: ActivityId) -> anyhow::Result<LikeStatus> {
        let org = *self.org_of.get(&activity).context("unknown activity")?;
        let status = {
            let mut record = self.likes.entry(activity).or_default();
            if record.likers.remove(&self.current_user) {
                record.count = record.count.saturating_sub(1);
            } else {
                record.likers.insert(self.current_user);
                record.count += 1;
            }
            LikeStatus {
                activity_id: activity,
                like_count: record.count,
                is_liked: record.likers.contains(&self.current_user),
            }
        };

        // The real backend fans the confirmed state out to every session.
        self.bus.publish(
            &activity_channel(org),
            LIKE_EVENT,
            LikeBroadcast {
                activity_id: activity,
                like_count: status.like_count,
                is_liked: status.is_liked,
                user_id: self.current_user,
            },
        );
        Ok(status)
    }

    async fn create_activity(&self, draft: &ActivityDraft) -> anyhow::Result<ActivityRecord> {
        let org_id = draft.organization.context("draft missing organization")?;
        let organization = self
            .organizations
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == org_id)
            .cloned()
            .context("unknown organization")?;
        let subcategory = draft.subcategory.and_then(|id| {
            self.subcategories
                .get(&org_id)
                .and_then(|subs| subs.iter().find(|s| s.id == id).cloned())
        });

        let (youtube_url, single_media, multi_media) = match &draft.content {
            DraftContent::YouTube { url } => (Some(url.clone()), None, Vec::new()),
            DraftContent::Media { single, multi, .. } => (
                None,
                single.clone().map(|url| MediaFile { url }),
                multi.iter().map(|url| MediaFile { url: url.clone() }).collect(),
            ),
        };

        let record = ActivityRecord {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            title: draft.title.clone(),
            subtitle: draft.subtitle.clone(),
            created_at: Utc::now().to_rfc3339(),
            category: draft.category,
            user: Some(UserSummary {
                id: self.current_user,
                first_name: None,
                last_name: None,
                profile_picture: None,
                role: None,
                status: Some("APPROVED".into()),
            }),
            organization: Some(organization),
            subcategory,
            likes: 0,
            youtube_url,
            single_media,
            multi_media,
        };
        self.add_activity(org_id, record.clone());
        Ok(record)
    }
}
