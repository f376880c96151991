// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::profile::ProfileSummary;
use crate::models::story::Story;

/// A story enriched with the display data the feed needs. Derived on every
/// resolve, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEntry {
    pub story_id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub story_type: String,
    pub cover_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub author_name: String,
    pub author_avatar_url: Option<String>,
    pub record_count: i64,
    pub last_activity_at: NaiveDateTime,
    pub last_updated: String,
    pub is_own_story: bool,
}

impl FeedEntry {
    /// Build an entry for `viewer`. A missing author profile or record
    /// count degrades to defaults instead of dropping the story.
    pub fn new(
        story: Story,
        author: Option<&ProfileSummary>,
        record_count: Option<i64>,
        viewer_id: &str,
        now: NaiveDateTime,
    ) -> Self {
        let is_own_story = story.owner_id == viewer_id;
        FeedEntry {
            last_updated: format_relative_time(story.last_activity_at, now),
            story_id: story.id,
            owner_id: story.owner_id,
            name: story.name,
            description: story.description,
            is_public: story.is_public,
            story_type: story.story_type,
            cover_url: story.cover_url,
            thumbnail_url: story.thumbnail_url,
            author_name: author.map(|a| a.display_name.clone()).unwrap_or_default(),
            author_avatar_url: author.and_then(|a| a.avatar_url.clone()),
            record_count: record_count.unwrap_or(0),
            last_activity_at: story.last_activity_at,
            is_own_story,
        }
    }
}

/// Human-readable age of a timestamp relative to `now`
pub fn format_relative_time(then: NaiveDateTime, now: NaiveDateTime) -> String {
    let elapsed = now.signed_duration_since(then);
    let seconds = elapsed.num_seconds();

    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3600 {
        let minutes = seconds / 60;
        plural(minutes, "minute")
    } else if seconds < 86400 {
        plural(seconds / 3600, "hour")
    } else if seconds < 86400 * 30 {
        plural(seconds / 86400, "day")
    } else if seconds < 86400 * 365 {
        plural(seconds / (86400 * 30), "month")
    } else {
        plural(seconds / (86400 * 365), "year")
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
