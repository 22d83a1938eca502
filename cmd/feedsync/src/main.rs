//! # feedsync demo binary
//!
//! Assembles the engine over the in-memory adapters and drives one short
//! session: load the feed, toggle a like, receive a foreign broadcast,
//! compose an activity. Runs on a current-thread runtime; the engine is
//! single-owner and cooperatively scheduled.

use std::sync::Arc;

use configs::FeedConfig;
use domains::models::{
    ActivityCategory, ActivityDraft, ActivityRecord, DraftContent, LikeBroadcast, MediaFile,
    Organization, Subcategory,
};
use domains::ports::{LIKE_EVENT, activity_channel};
use memory_adapters::{MemoryBus, MemoryDirectory};
use services::FeedEngine;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = FeedConfig::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let current_user = config.current_user.unwrap_or(1);
    let bus = Arc::new(MemoryBus::new());
    let directory = Arc::new(seed_demo_data(current_user, Arc::clone(&bus)));
    let mut engine = FeedEngine::new(directory, bus.clone(), current_user, config.page_size);

    engine.start().await?;
    info!(
        org = ?engine.selected_org(),
        entries = engine.entries().len(),
        has_more = engine.has_more(),
        "feed loaded"
    );
    print_feed(&engine);

    let first = engine.entries().first().map(|e| e.id);
    if let Some(id) = first {
        let state = engine.toggle_like(id).await?;
        info!(activity = id, count = state.like_count, "like confirmed");
        // The toggle's own broadcast comes back to this session too.
        engine.drain_broadcasts();
    }

    // Someone else likes the same activity in another session.
    if let (Some(id), Some(org)) = (first, engine.selected_org()) {
        let count = engine.like_state(id).like_count + 1;
        bus.publish(
            &activity_channel(org),
            LIKE_EVENT,
            LikeBroadcast {
                activity_id: id,
                like_count: count,
                is_liked: true,
                user_id: current_user + 1,
            },
        );
        let applied = engine.drain_broadcasts();
        info!(applied, count = engine.like_state(id).like_count, "broadcast merged");
    }

    engine
        .compose_activity(ActivityDraft {
            title: "Community picnic".into(),
            subtitle: Some("Saturday on the river lawn".into()),
            category: ActivityCategory::Event,
            organization: engine.selected_org(),
            subcategory: engine.subcategories().first().map(|s| s.id),
            content: DraftContent::YouTube {
                url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".into(),
            },
        })
        .await?;
    info!(entries = engine.entries().len(), "after compose");
    print_feed(&engine);

    engine.shutdown().await;
    Ok(())
}

fn print_feed(engine: &FeedEngine) {
    for entry in engine.entries() {
        let likes = engine.like_state(entry.id);
        println!(
            "[{:>3}] {} {}: {} ({}, {} likes)",
            entry.id, entry.author.name, entry.action, entry.title, entry.time_ago, likes.like_count
        );
    }
}

fn seed_demo_data(current_user: i64, bus: Arc<MemoryBus>) -> MemoryDirectory {
    let directory = MemoryDirectory::new(current_user, bus);
    directory.add_organization(
        Organization {
            id: 5,
            name: "Riverside Commons".into(),
        },
        vec![
            Subcategory {
                id: 1,
                name: "Festivals".into(),
                icon: Some("🎉".into()),
            },
            Subcategory {
                id: 2,
                name: "Volunteering".into(),
                icon: None,
            },
        ],
    );
    directory.add_organization(
        Organization {
            id: 7,
            name: "Hillside Assembly".into(),
        },
        vec![],
    );

    let base = ActivityRecord {
        id: 0,
        title: String::new(),
        subtitle: None,
        created_at: "2026-08-07T09:00:00Z".into(),
        category: ActivityCategory::Announcement,
        user: None,
        organization: None,
        subcategory: None,
        likes: 0,
        youtube_url: None,
        single_media: None,
        multi_media: vec![],
    };

    directory.add_activity(
        5,
        ActivityRecord {
            id: 1,
            title: "Hall reopening".into(),
            subtitle: Some("Fresh paint, new floor".into()),
            likes: 3,
            single_media: Some(MediaFile {
                url: "/uploads/hall.jpg".into(),
            }),
            ..base.clone()
        },
    );
    directory.add_activity(
        5,
        ActivityRecord {
            id: 2,
            title: "Evening aarti".into(),
            category: ActivityCategory::Prayer,
            youtube_url: Some("https://youtu.be/dQw4w9WgXcQ".into()),
            ..base.clone()
        },
    );
    directory.add_activity(
        7,
        ActivityRecord {
            id: 3,
            title: "Food drive wrap-up".into(),
            category: ActivityCategory::Service,
            likes: 11,
            ..base
        },
    );
    directory
}
