//! Broadcast merging, end-to-end over the in-memory adapters.

mod common;

use std::sync::Arc;

use domains::models::{LikeBroadcast, Organization, Subcategory};
use domains::ports::{LIKE_EVENT, activity_channel};
use memory_adapters::{MemoryBus, MemoryDirectory};
use services::FeedEngine;

const ME: i64 = 1;
const OTHER: i64 = 2;

fn seeded() -> (FeedEngine, Arc<MemoryBus>) {
    let bus = Arc::new(MemoryBus::new());
    let directory = MemoryDirectory::new(ME, Arc::clone(&bus));
    directory.add_organization(
        Organization {
            id: 5,
            name: "Riverside Commons".into(),
        },
        vec![Subcategory {
            id: 2,
            name: "Volunteering".into(),
            icon: None,
        }],
    );
    let mut record = common::record(42);
    record.likes = 4;
    directory.add_activity(5, record);
    (
        FeedEngine::new(Arc::new(directory), bus.clone(), ME, common::PAGE_SIZE),
        bus,
    )
}

#[tokio::test]
async fn own_broadcast_overwrites_both_fields() {
    let (mut engine, bus) = seeded();
    engine.start().await.unwrap();
    assert_eq!(engine.like_state(42).like_count, 4);

    // This user unliked the activity from another device.
    bus.publish(
        &activity_channel(5),
        LIKE_EVENT,
        LikeBroadcast {
            activity_id: 42,
            like_count: 5,
            is_liked: false,
            user_id: ME,
        },
    );
    assert_eq!(engine.drain_broadcasts(), 1);
    let state = engine.like_state(42);
    assert_eq!(state.like_count, 5);
    assert!(!state.is_liked);
    assert_eq!(engine.entries()[0].likes, 5);
}

#[tokio::test]
async fn foreign_broadcast_moves_the_count_only() {
    let (mut engine, bus) = seeded();
    engine.start().await.unwrap();
    // Establish "liked by me" first.
    engine.toggle_like(42).await.unwrap();
    engine.drain_broadcasts();
    assert!(engine.like_state(42).is_liked);

    bus.publish(
        &activity_channel(5),
        LIKE_EVENT,
        LikeBroadcast {
            activity_id: 42,
            like_count: 9,
            is_liked: false,
            user_id: OTHER,
        },
    );
    engine.drain_broadcasts();
    let state = engine.like_state(42);
    assert_eq!(state.like_count, 9);
    assert!(state.is_liked, "a foreign like must not flip ours");
    assert_eq!(engine.entries()[0].likes, 9);
}

#[tokio::test]
async fn broadcasts_apply_in_arrival_order() {
    let (mut engine, bus) = seeded();
    engine.start().await.unwrap();

    for count in [6, 7, 8] {
        bus.publish(
            &activity_channel(5),
            LIKE_EVENT,
            LikeBroadcast {
                activity_id: 42,
                like_count: count,
                is_liked: true,
                user_id: OTHER,
            },
        );
    }
    assert_eq!(engine.drain_broadcasts(), 3);
    assert_eq!(engine.like_state(42).like_count, 8);
}

#[tokio::test]
async fn own_toggle_comes_back_as_a_confirming_broadcast() {
    let (mut engine, _bus) = seeded();
    engine.start().await.unwrap();

    let state = engine.toggle_like(42).await.unwrap();
    assert_eq!(state.like_count, 5);
    // The backend fans our toggle back to us; applying it changes nothing.
    assert_eq!(engine.drain_broadcasts(), 1);
    let state = engine.like_state(42);
    assert_eq!(state.like_count, 5);
    assert!(state.is_liked);
}

#[tokio::test]
async fn switching_org_stops_deliveries_from_the_old_channel() {
    let (mut engine, bus) = seeded();
    engine.start().await.unwrap();

    engine.select_organization(None).await.unwrap();
    bus.publish(
        &activity_channel(5),
        LIKE_EVENT,
        LikeBroadcast {
            activity_id: 42,
            like_count: 99,
            is_liked: false,
            user_id: OTHER,
        },
    );
    assert_eq!(engine.drain_broadcasts(), 0);
    assert_eq!(engine.like_state(42).like_count, 0);
}
