//! # Domain Models
//!
//! Two layers live here: the raw server-origin records exactly as the
//! data-access collaborator delivers them (camelCase wire names, lenient
//! defaults), and the display models the engine derives from them.
//! Ids are the origin backend's numeric ids.

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

pub type OrgId = i64;
pub type SubcategoryId = i64;
pub type ActivityId = i64;
pub type UserId = i64;

/// A community an activity feed is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrgId,
    pub name: String,
}

/// Optional second-level filter inside one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// A media file reference as the backend serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    pub url: String,
}

/// Authoring user summary embedded in an activity record.
///
/// `role`/`status` are the backend's raw enums; the transformer derives
/// the display role from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, rename = "profilePicture")]
    pub profile_picture: Option<MediaFile>,
    #[serde(default, rename = "userrole")]
    pub role: Option<String>,
    #[serde(default, rename = "userstatus")]
    pub status: Option<String>,
}

/// The eight wire categories plus a catch-all so an unknown category
/// degrades to the generic action phrase instead of failing the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityCategory {
    Announcement,
    Event,
    Prayer,
    Donation,
    Join,
    Celebration,
    Service,
    Education,
    #[serde(other)]
    Unknown,
}

/// One activity exactly as fetched. Immutable once loaded.
///
/// `created_at` stays the wire string on purpose: a malformed timestamp
/// must degrade to "now" at transform time, not fail deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: ActivityId,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at: String,
    pub category: ActivityCategory,
    #[serde(default)]
    pub user: Option<UserSummary>,
    #[serde(default)]
    pub organization: Option<Organization>,
    #[serde(default)]
    pub subcategory: Option<Subcategory>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default, rename = "youtubeurl")]
    pub youtube_url: Option<String>,
    #[serde(default, rename = "singlemedia")]
    pub single_media: Option<MediaFile>,
    #[serde(default, rename = "multimedia")]
    pub multi_media: Vec<MediaFile>,
}

/// One fetched page plus the pagination metadata `hasMore` is computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityPage {
    pub records: Vec<ActivityRecord>,
    #[serde(rename = "pageCount")]
    pub page_count: u32,
}

/// Server-confirmed like state for one activity.
///
/// The count is `u32`: a negative count cannot be represented, let alone
/// reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeStatus {
    #[serde(rename = "activityId")]
    pub activity_id: ActivityId,
    #[serde(rename = "likeCount")]
    pub like_count: u32,
    #[serde(rename = "isLiked")]
    pub is_liked: bool,
}

/// Payload of the `activity-like-update` pub/sub event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeBroadcast {
    #[serde(rename = "activityId")]
    pub activity_id: ActivityId,
    #[serde(rename = "likeCount")]
    pub like_count: u32,
    #[serde(rename = "isLiked")]
    pub is_liked: bool,
    #[serde(rename = "userId")]
    pub user_id: UserId,
}

// ── Display models (engine-derived) ─────────────────────────────────────────

/// Exactly one display variant per activity; classification precedence is
/// YouTube over Image over ImageSet over None.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MediaAttachment {
    None,
    YouTube { video_id: String, url: String },
    Image { url: String },
    ImageSet { urls: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisplayRole {
    Admin,
    Member,
    Volunteer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub name: String,
    pub role: DisplayRole,
    pub avatar_url: String,
}

/// One normalized, display-ready activity.
///
/// Never mutated after transform except the `likes` counter, which mirrors
/// the reconciler's count for this activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEntry {
    pub id: ActivityId,
    pub category: ActivityCategory,
    pub title: String,
    pub content: Option<String>,
    pub action: String,
    pub time_ago: String,
    pub organization: Option<String>,
    pub subcategory: Option<String>,
    pub author: Author,
    pub media: MediaAttachment,
    pub likes: u32,
}

/// UI-facing snapshot of one activity's like slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LikeState {
    pub like_count: u32,
    pub is_liked: bool,
    pub is_loading: bool,
}

// ── Composition ─────────────────────────────────────────────────────────────

/// Which upload field a non-YouTube draft is allowed to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadMode {
    Single,
    Multi,
}

/// Draft media payload, split by the user's content-type choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DraftContent {
    YouTube {
        url: String,
    },
    Media {
        mode: UploadMode,
        #[serde(default)]
        single: Option<String>,
        #[serde(default)]
        multi: Vec<String>,
    },
}

/// A locally composed activity, validated before any network call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDraft {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub category: ActivityCategory,
    pub organization: Option<OrgId>,
    pub subcategory: Option<SubcategoryId>,
    pub content: DraftContent,
}

impl ActivityDraft {
    /// Field-level validation. Collects every violation instead of stopping
    /// at the first so the form can mark all offending fields at once.
    pub fn validate(&self) -> std::result::Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "title is required"));
        }
        if self.organization.is_none() {
            errors.push(FieldError::new("organization", "an organization must be selected"));
        }
        if self.subcategory.is_none() {
            errors.push(FieldError::new("subcategory", "a subcategory must be selected"));
        }
        match &self.content {
            DraftContent::YouTube { url } => {
                if url.trim().is_empty() {
                    errors.push(FieldError::new("youtube_url", "a YouTube URL is required"));
                }
            }
            DraftContent::Media { mode, single, multi } => match mode {
                UploadMode::Single if !multi.is_empty() => {
                    errors.push(FieldError::new(
                        "multi_media",
                        "single upload mode accepts one file only",
                    ));
                }
                UploadMode::Multi if single.is_some() => {
                    errors.push(FieldError::new(
                        "single_media",
                        "multi upload mode does not accept a single-file upload",
                    ));
                }
                _ => {}
            },
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
