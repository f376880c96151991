// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{record_media, records};

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = records)]
pub struct Record {
    pub id: String,
    pub story_id: String,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub location_country: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable, Serialize, Deserialize)]
#[diesel(table_name = records)]
pub struct NewRecord {
    pub id: String,
    pub story_id: String,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub location_country: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Media attachment kinds accepted on a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "image" => Some(MediaKind::Image),
            "audio" => Some(MediaKind::Audio),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = record_media)]
pub struct RecordMedia {
    pub id: String,
    pub record_id: String,
    pub url: String,
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Insertable, Serialize, Deserialize)]
#[diesel(table_name = record_media)]
pub struct NewRecordMedia {
    pub id: String,
    pub record_id: String,
    pub url: String,
    pub kind: String,
    pub name: String,
}
