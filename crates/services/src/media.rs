//! Media classification.
//!
//! Maps a raw record to exactly one display variant. Precedence is fixed
//! and total: a parseable YouTube id wins over a single image, which wins
//! over a multi-image set, which wins over nothing.

use domains::models::{ActivityRecord, MediaAttachment};
use url::Url;

/// Every valid YouTube video id is exactly this long.
const VIDEO_ID_LEN: usize = 11;

/// Classifies a record's media. Deterministic, no side effects.
pub fn classify(record: &ActivityRecord) -> MediaAttachment {
    if let Some(raw) = record.youtube_url.as_deref() {
        if let Some(video_id) = youtube_video_id(raw) {
            return MediaAttachment::YouTube {
                video_id,
                url: raw.to_string(),
            };
        }
    }
    if let Some(single) = &record.single_media {
        return MediaAttachment::Image {
            url: single.url.clone(),
        };
    }
    if !record.multi_media.is_empty() {
        return MediaAttachment::ImageSet {
            urls: record.multi_media.iter().map(|m| m.url.clone()).collect(),
        };
    }
    MediaAttachment::None
}

/// Extracts the video id from the common YouTube URL shapes: `watch?v=`,
/// `youtu.be/`, `embed/` and the bare `v/` path. Anything that does not
/// yield an 11-character token is rejected so classification can fall
/// through to the next rule.
pub fn youtube_video_id(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?.trim_start_matches("www.");

    let candidate = if host == "youtu.be" {
        url.path_segments()?.next().map(str::to_string)
    } else if host == "youtube.com" || host.ends_with(".youtube.com") {
        if let Some((_, id)) = url.query_pairs().find(|(key, _)| key.as_ref() == "v") {
            Some(id.into_owned())
        } else {
            let mut segments = url.path_segments()?;
            match segments.next() {
                Some("embed") | Some("v") => segments.next().map(str::to_string),
                _ => None,
            }
        }
    } else {
        None
    };

    candidate.filter(|id| id.len() == VIDEO_ID_LEN)
}
