//! Record normalization.
//!
//! Turns a raw server record into a display-ready [`FeedEntry`]: author
//! name/role resolution, the category action phrase, the relative age
//! string, and media classification.

use chrono::{DateTime, Utc};
use domains::models::{
    ActivityCategory, ActivityRecord, Author, DisplayRole, FeedEntry, UserSummary,
};

use crate::media;

const DEFAULT_AVATAR: &str = "/default-avatar.png";
const UNKNOWN_USER: &str = "Unknown User";

/// Normalizes a record against the current wall clock.
pub fn transform(record: &ActivityRecord) -> FeedEntry {
    transform_at(record, Utc::now())
}

/// Same as [`transform`] with an injected clock, so tests pin `now`.
pub fn transform_at(record: &ActivityRecord, now: DateTime<Utc>) -> FeedEntry {
    FeedEntry {
        id: record.id,
        category: record.category,
        title: record.title.clone(),
        content: record.subtitle.clone(),
        action: action_phrase(record.category).to_string(),
        time_ago: relative_age(parse_created(&record.created_at, now), now),
        organization: record.organization.as_ref().map(|o| o.name.clone()),
        subcategory: record.subcategory.as_ref().map(|s| s.name.clone()),
        author: author(record.user.as_ref()),
        media: media::classify(record),
        likes: record.likes,
    }
}

/// Fixed category → action phrase table; anything unknown gets the generic
/// phrase.
pub fn action_phrase(category: ActivityCategory) -> &'static str {
    match category {
        ActivityCategory::Announcement => "made an announcement",
        ActivityCategory::Event => "created an event",
        ActivityCategory::Prayer => "shared a prayer",
        ActivityCategory::Donation => "made a donation",
        ActivityCategory::Join => "joined the community",
        ActivityCategory::Celebration => "shared a celebration",
        ActivityCategory::Service => "organized a service",
        ActivityCategory::Education => "shared educational content",
        ActivityCategory::Unknown => "shared an update",
    }
}

/// Relative age with fixed thresholds; beyond a week the absolute date is
/// shown. A timestamp in the future clamps to "Just now".
pub fn relative_age(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - created).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes} minutes ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours} hours ago");
    }
    let days = hours / 24;
    if days < 7 {
        return format!("{days} days ago");
    }
    created.format("%b %-d, %Y").to_string()
}

// A malformed timestamp is treated as "now" rather than failing the page.
fn parse_created(raw: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now)
}

fn author(user: Option<&UserSummary>) -> Author {
    let Some(user) = user else {
        return Author {
            name: UNKNOWN_USER.to_string(),
            role: DisplayRole::Member,
            avatar_url: DEFAULT_AVATAR.to_string(),
        };
    };

    let name = [user.first_name.as_deref(), user.last_name.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    Author {
        name: if name.is_empty() {
            UNKNOWN_USER.to_string()
        } else {
            name
        },
        role: display_role(user),
        avatar_url: user
            .profile_picture
            .as_ref()
            .map(|p| p.url.clone())
            .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
    }
}

fn display_role(user: &UserSummary) -> DisplayRole {
    if user.role.as_deref() == Some("ADMIN") {
        DisplayRole::Admin
    } else if user.status.as_deref() == Some("APPROVED") {
        DisplayRole::Member
    } else {
        DisplayRole::Volunteer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use domains::models::MediaFile;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 8, 12, 0, 0).unwrap()
    }

    fn record_at(created: &str) -> ActivityRecord {
        ActivityRecord {
            id: 9,
            title: "Morning prayer".into(),
            subtitle: Some("Join us".into()),
            created_at: created.into(),
            category: ActivityCategory::Prayer,
            user: None,
            organization: None,
            subcategory: None,
            likes: 2,
            youtube_url: None,
            single_media: None,
            multi_media: vec![],
        }
    }

    #[test]
    fn relative_age_thresholds() {
        let n = now();
        let at = |secs: i64| n - chrono::Duration::seconds(secs);
        assert_eq!(relative_age(at(30), n), "Just now");
        assert_eq!(relative_age(at(5 * 60), n), "5 minutes ago");
        assert_eq!(relative_age(at(59 * 60), n), "59 minutes ago");
        assert_eq!(relative_age(at(3 * 3600), n), "3 hours ago");
        assert_eq!(relative_age(at(2 * 86_400), n), "2 days ago");
        assert_eq!(relative_age(at(10 * 86_400), n), "Jul 29, 2026");
    }

    #[test]
    fn future_timestamp_clamps_to_just_now() {
        let n = now();
        assert_eq!(relative_age(n + chrono::Duration::hours(1), n), "Just now");
    }

    #[test]
    fn malformed_created_at_is_treated_as_now() {
        let entry = transform_at(&record_at("yesterday-ish"), now());
        assert_eq!(entry.time_ago, "Just now");
    }

    #[test]
    fn action_phrase_covers_every_category() {
        assert_eq!(
            action_phrase(ActivityCategory::Announcement),
            "made an announcement"
        );
        assert_eq!(action_phrase(ActivityCategory::Join), "joined the community");
        assert_eq!(action_phrase(ActivityCategory::Unknown), "shared an update");
    }

    #[test]
    fn author_falls_back_to_unknown_user_and_default_avatar() {
        let mut r = record_at("2026-08-08T11:00:00Z");
        let entry = transform_at(&r, now());
        assert_eq!(entry.author.name, "Unknown User");
        assert_eq!(entry.author.avatar_url, "/default-avatar.png");
        assert_eq!(entry.author.role, DisplayRole::Member);

        r.user = Some(UserSummary {
            id: 3,
            first_name: Some("  ".into()),
            last_name: None,
            profile_picture: None,
            role: None,
            status: None,
        });
        let entry = transform_at(&r, now());
        assert_eq!(entry.author.name, "Unknown User");
        assert_eq!(entry.author.role, DisplayRole::Volunteer);
    }

    #[test]
    fn author_name_and_role_derivation() {
        let mut r = record_at("2026-08-08T11:00:00Z");
        r.user = Some(UserSummary {
            id: 3,
            first_name: Some("Asha".into()),
            last_name: Some("Patel".into()),
            profile_picture: Some(MediaFile {
                url: "/avatars/asha.png".into(),
            }),
            role: Some("ADMIN".into()),
            status: Some("APPROVED".into()),
        });
        let entry = transform_at(&r, now());
        assert_eq!(entry.author.name, "Asha Patel");
        assert_eq!(entry.author.role, DisplayRole::Admin);
        assert_eq!(entry.author.avatar_url, "/avatars/asha.png");
    }

    #[test]
    fn entry_carries_phrase_age_and_likes_mirror() {
        let entry = transform_at(&record_at("2026-08-08T11:55:00Z"), now());
        assert_eq!(entry.action, "shared a prayer");
        assert_eq!(entry.time_ago, "5 minutes ago");
        assert_eq!(entry.likes, 2);
        assert_eq!(entry.content.as_deref(), Some("Join us"));
    }
}
