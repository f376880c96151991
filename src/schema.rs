// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

// Import diesel table macros
use diesel::allow_tables_to_appear_in_same_query;
use diesel::table;

// Define profile table
table! {
    profiles (id) {
        id -> Varchar,
        username -> Varchar,
        display_name -> Nullable<Varchar>,
        avatar_url -> Nullable<Varchar>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

// Define story table
table! {
    stories (id) {
        id -> Varchar,
        owner_id -> Varchar,
        name -> Varchar,
        description -> Nullable<Text>,
        is_public -> Bool,
        story_type -> Varchar,
        location_city -> Nullable<Varchar>,
        location_state -> Nullable<Varchar>,
        location_country -> Nullable<Varchar>,
        cover_url -> Nullable<Varchar>,
        thumbnail_url -> Nullable<Varchar>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        last_activity_at -> Timestamp,
    }
}

// Define record table
table! {
    records (id) {
        id -> Varchar,
        story_id -> Varchar,
        title -> Varchar,
        description -> Nullable<Text>,
        is_public -> Bool,
        location_city -> Nullable<Varchar>,
        location_state -> Nullable<Varchar>,
        location_country -> Nullable<Varchar>,
        created_at -> Timestamp,
    }
}

table! {
    record_media (id) {
        id -> Varchar,
        record_id -> Varchar,
        url -> Varchar,
        kind -> Varchar,
        name -> Varchar,
    }
}

// Define user-follows-user edge table
table! {
    follows (id) {
        id -> Integer,
        follower_id -> Varchar,
        following_id -> Varchar,
        created_at -> Timestamp,
    }
}

// Define user-follows-story edge table
table! {
    story_follows (id) {
        id -> Integer,
        follower_id -> Varchar,
        story_id -> Varchar,
        created_at -> Timestamp,
    }
}

// Allow joining the tables if needed
allow_tables_to_appear_in_same_query!(
    profiles,
    stories,
    records,
    record_media,
    follows,
    story_follows,
);
