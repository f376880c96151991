// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{follows, story_follows};

/// Model for a user-follows-user edge
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = follows)]
pub struct Follow {
    pub id: i32,
    pub follower_id: String,
    pub following_id: String,
    pub created_at: NaiveDateTime,
}

/// DTO for creating a new user-follows-user edge
#[derive(Debug, Insertable, Serialize, Deserialize)]
#[diesel(table_name = follows)]
pub struct NewFollow {
    pub follower_id: String,
    pub following_id: String,
    pub created_at: NaiveDateTime,
}

/// Model for a user-follows-story edge
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = story_follows)]
pub struct StoryFollow {
    pub id: i32,
    pub follower_id: String,
    pub story_id: String,
    pub created_at: NaiveDateTime,
}

/// DTO for creating a new user-follows-story edge
#[derive(Debug, Insertable, Serialize, Deserialize)]
#[diesel(table_name = story_follows)]
pub struct NewStoryFollow {
    pub follower_id: String,
    pub story_id: String,
    pub created_at: NaiveDateTime,
}

/// DTO for querying followers or following with profile details
#[derive(Debug, Serialize, Deserialize)]
pub struct FollowDetail {
    // Profile id of the other side of the edge
    pub id: String,
    // Username
    pub username: String,
    // Display name
    pub display_name: Option<String>,
    // Avatar
    pub avatar_url: Option<String>,
    // When the relationship was created
    pub followed_at: NaiveDateTime,
}

/// Query parameters for paginating followers/following lists
#[derive(Debug, Deserialize)]
pub struct FollowsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub page: Option<i64>,
}
