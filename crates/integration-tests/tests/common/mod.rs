//! Shared fixtures for the engine scenario tests.
#![allow(dead_code)]

use domains::models::{
    ActivityCategory, ActivityId, ActivityPage, ActivityRecord, LikeStatus, Organization,
    Subcategory,
};
use domains::ports::{BusSubscription, MockActivityBus, MockActivityDirectory};
use tokio::sync::mpsc;

pub const ME: i64 = 1;
pub const PAGE_SIZE: u32 = 10;

pub fn record(id: ActivityId) -> ActivityRecord {
    ActivityRecord {
        id,
        title: format!("activity {id}"),
        subtitle: None,
        created_at: "2026-08-01T10:00:00Z".into(),
        category: ActivityCategory::Event,
        user: None,
        organization: None,
        subcategory: None,
        likes: 0,
        youtube_url: None,
        single_media: None,
        multi_media: vec![],
    }
}

/// A full page of `size` records for `page`, out of `page_count` pages.
/// Ids are unique across pages.
pub fn page_fixture(page: u32, size: u32, page_count: u32) -> ActivityPage {
    let first = ((page - 1) * size) as i64 + 1;
    ActivityPage {
        records: (first..first + size as i64).map(record).collect(),
        page_count,
    }
}

pub fn neutral_status(id: ActivityId) -> LikeStatus {
    LikeStatus {
        activity_id: id,
        like_count: 0,
        is_liked: false,
    }
}

pub fn organizations() -> Vec<Organization> {
    vec![
        Organization {
            id: 5,
            name: "Riverside Commons".into(),
        },
        Organization {
            id: 7,
            name: "Hillside Assembly".into(),
        },
    ]
}

pub fn subcategories() -> Vec<Subcategory> {
    vec![Subcategory {
        id: 2,
        name: "Volunteering".into(),
        icon: None,
    }]
}

pub fn open_subscription() -> BusSubscription {
    let (_tx, rx) = mpsc::channel(8);
    BusSubscription { messages: rx }
}

/// A bus that accepts any subscribe/unsubscribe traffic; for tests that
/// only care about the directory side.
pub fn stub_bus() -> MockActivityBus {
    let mut bus = MockActivityBus::new();
    bus.expect_subscribe().returning(|_, _| Ok(open_subscription()));
    bus.expect_unsubscribe().returning(|_, _| Ok(()));
    bus
}

/// Directory with the listing calls every engine start makes; tests add
/// their own fetch/toggle expectations on top.
pub fn stub_directory() -> MockActivityDirectory {
    let mut directory = MockActivityDirectory::new();
    directory
        .expect_list_organizations()
        .returning(|| Ok(organizations()));
    directory
        .expect_list_subcategories()
        .returning(|_| Ok(subcategories()));
    directory
}

/// Neutral like statuses for every activity.
pub fn accept_like_statuses(directory: &mut MockActivityDirectory) {
    directory
        .expect_fetch_like_status()
        .returning(|id| Ok(neutral_status(id)));
}
