//! Activity composition: local validation, then create → prepend → refresh.

mod common;

use std::sync::Arc;

use common::{PAGE_SIZE, accept_like_statuses, page_fixture, record, stub_bus, stub_directory};
use domains::FeedError;
use domains::models::{ActivityCategory, ActivityDraft, DraftContent, UploadMode};
use services::FeedEngine;

fn engine(directory: domains::ports::MockActivityDirectory) -> FeedEngine {
    FeedEngine::new(
        Arc::new(directory),
        Arc::new(stub_bus()),
        common::ME,
        PAGE_SIZE,
    )
}

fn youtube_draft() -> ActivityDraft {
    ActivityDraft {
        title: "Kirtan night".into(),
        subtitle: None,
        category: ActivityCategory::Celebration,
        organization: Some(5),
        subcategory: Some(2),
        content: DraftContent::YouTube {
            url: "https://youtu.be/dQw4w9WgXcQ".into(),
        },
    }
}

#[tokio::test]
async fn invalid_draft_is_blocked_before_any_network_call() {
    let mut directory = stub_directory();
    directory
        .expect_fetch_activities()
        .returning(|_, page, size, _| Ok(page_fixture(page, size, 1)));
    accept_like_statuses(&mut directory);
    // No create_activity expectation: reaching the directory would panic.

    let mut engine = engine(directory);
    engine.start().await.unwrap();

    let mut draft = youtube_draft();
    draft.title = "".into();
    draft.content = DraftContent::Media {
        mode: UploadMode::Single,
        single: None,
        multi: vec!["/a.jpg".into(), "/b.jpg".into()],
    };
    let err = engine.compose_activity(draft).await.unwrap_err();
    let FeedError::Composition(fields) = err else {
        panic!("expected a composition failure");
    };
    let names: Vec<_> = fields.iter().map(|f| f.field).collect();
    assert_eq!(names, vec!["title", "multi_media"]);
}

#[tokio::test]
async fn valid_draft_prepends_then_refreshes() {
    let mut directory = stub_directory();
    directory
        .expect_fetch_activities()
        .times(1)
        .returning(|_, page, size, _| Ok(page_fixture(page, size, 1)));
    accept_like_statuses(&mut directory);
    directory
        .expect_create_activity()
        .times(1)
        .returning(|draft| {
            let mut created = record(99);
            created.title = draft.title.clone();
            created.youtube_url = Some("https://youtu.be/dQw4w9WgXcQ".into());
            Ok(created)
        });
    // The refresh-equivalent invalidation re-fetches page 1, now led by the
    // new activity.
    directory
        .expect_fetch_activities()
        .times(1)
        .returning(|_, _, size, _| {
            let mut page = page_fixture(1, size - 1, 1);
            page.records.insert(0, record(99));
            Ok(page)
        });

    let mut engine = engine(directory);
    engine.start().await.unwrap();
    engine.compose_activity(youtube_draft()).await.unwrap();

    assert_eq!(engine.entries().first().unwrap().id, 99);
    assert_eq!(engine.like_state(99).like_count, 0);
    assert_eq!(engine.page(), 1);
}
