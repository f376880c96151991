// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::stories;

/// What a story is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryType {
    Object,
    Person,
    Space,
    Event,
    Other,
}

impl StoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryType::Object => "object",
            StoryType::Person => "person",
            StoryType::Space => "space",
            StoryType::Event => "event",
            StoryType::Other => "other",
        }
    }

    /// Unknown values map to `Other` rather than failing the row
    pub fn parse(value: &str) -> Self {
        match value {
            "object" => StoryType::Object,
            "person" => StoryType::Person,
            "space" => StoryType::Space,
            "event" => StoryType::Event,
            _ => StoryType::Other,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = stories)]
pub struct Story {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub story_type: String,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub location_country: Option<String>,
    pub cover_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub last_activity_at: NaiveDateTime,
}

impl Story {
    pub fn story_type(&self) -> StoryType {
        StoryType::parse(&self.story_type)
    }
}

#[derive(Debug, Insertable, Serialize, Deserialize)]
#[diesel(table_name = stories)]
pub struct NewStory {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub story_type: String,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub location_country: Option<String>,
    pub cover_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub last_activity_at: NaiveDateTime,
}

/// Filter for story lookups against the relationship store.
///
/// Empty `owner_in`/`id_in` vectors are treated as "no stories", not
/// "all stories"; `None` leaves that dimension unconstrained.
#[derive(Debug, Clone, Default)]
pub struct StoryFilter {
    pub owner_id: Option<String>,
    pub owner_in: Option<Vec<String>>,
    pub id_in: Option<Vec<String>>,
    pub only_public: bool,
}

impl StoryFilter {
    pub fn owned_by(owner_id: impl Into<String>) -> Self {
        StoryFilter {
            owner_id: Some(owner_id.into()),
            ..Default::default()
        }
    }

    pub fn public_owned_by_any(owner_ids: Vec<String>) -> Self {
        StoryFilter {
            owner_in: Some(owner_ids),
            only_public: true,
            ..Default::default()
        }
    }

    pub fn with_ids(story_ids: Vec<String>) -> Self {
        StoryFilter {
            id_in: Some(story_ids),
            ..Default::default()
        }
    }
}
