// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::profiles;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = profiles)]
pub struct Profile {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable, Serialize, Deserialize)]
#[diesel(table_name = profiles)]
pub struct NewProfile {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// The slice of a profile the feed pipeline attaches to entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl From<Profile> for ProfileSummary {
    fn from(profile: Profile) -> Self {
        // Fall back to the username when no display name was set
        let display_name = profile
            .display_name
            .unwrap_or_else(|| profile.username.clone());
        ProfileSummary {
            id: profile.id,
            display_name,
            avatar_url: profile.avatar_url,
        }
    }
}
