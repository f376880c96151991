// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::db::Database;
use crate::error::StoreResult;
use crate::models::follow::{NewFollow, NewStoryFollow};
use crate::models::{Profile, ProfileSummary, Story, StoryFilter};
use crate::schema::{follows, profiles, records, stories, story_follows};
use crate::store::RelationshipStore;

/// Relationship store backed by the service's Postgres database
pub struct PgRelationshipStore {
    db: Arc<Database>,
}

impl PgRelationshipStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RelationshipStore for PgRelationshipStore {
    async fn list_followed_user_ids(&self, viewer_id: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.db.get_connection().await?;
        let ids = follows::table
            .filter(follows::follower_id.eq(viewer_id))
            .select(follows::following_id)
            .load::<String>(&mut conn)
            .await?;
        Ok(ids)
    }

    async fn list_followed_story_ids(&self, viewer_id: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.db.get_connection().await?;
        let ids = story_follows::table
            .filter(story_follows::follower_id.eq(viewer_id))
            .select(story_follows::story_id)
            .load::<String>(&mut conn)
            .await?;
        Ok(ids)
    }

    async fn list_stories(&self, filter: StoryFilter) -> StoreResult<Vec<Story>> {
        let mut conn = self.db.get_connection().await?;

        let mut query = stories::table.into_boxed();
        if let Some(owner_id) = filter.owner_id {
            query = query.filter(stories::owner_id.eq(owner_id));
        }
        if let Some(owner_in) = filter.owner_in {
            // An empty id set matches nothing, by contract
            query = query.filter(stories::owner_id.eq_any(owner_in));
        }
        if let Some(id_in) = filter.id_in {
            query = query.filter(stories::id.eq_any(id_in));
        }
        if filter.only_public {
            query = query.filter(stories::is_public.eq(true));
        }

        let result = query.load::<Story>(&mut conn).await?;
        Ok(result)
    }

    async fn get_story(&self, story_id: &str) -> StoreResult<Option<Story>> {
        let mut conn = self.db.get_connection().await?;
        let story = stories::table
            .filter(stories::id.eq(story_id))
            .first::<Story>(&mut conn)
            .await
            .optional()?;
        Ok(story)
    }

    async fn get_profile(&self, user_id: &str) -> StoreResult<Option<ProfileSummary>> {
        let mut conn = self.db.get_connection().await?;
        let profile = profiles::table
            .filter(profiles::id.eq(user_id))
            .first::<Profile>(&mut conn)
            .await
            .optional()?;
        Ok(profile.map(ProfileSummary::from))
    }

    async fn get_profiles(
        &self,
        user_ids: &[String],
    ) -> StoreResult<HashMap<String, ProfileSummary>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = self.db.get_connection().await?;
        let loaded = profiles::table
            .filter(profiles::id.eq_any(user_ids))
            .load::<Profile>(&mut conn)
            .await?;
        debug!("Resolved {} of {} profiles", loaded.len(), user_ids.len());
        Ok(loaded
            .into_iter()
            .map(|p| (p.id.clone(), ProfileSummary::from(p)))
            .collect())
    }

    async fn count_records(&self, story_ids: &[String]) -> StoreResult<HashMap<String, i64>> {
        if story_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = self.db.get_connection().await?;
        let counts = records::table
            .filter(records::story_id.eq_any(story_ids))
            .group_by(records::story_id)
            .select((records::story_id, diesel::dsl::count_star()))
            .load::<(String, i64)>(&mut conn)
            .await?;
        Ok(counts.into_iter().collect())
    }

    async fn follow_edge_exists(&self, follower_id: &str, target_id: &str) -> StoreResult<bool> {
        let mut conn = self.db.get_connection().await?;
        let count = follows::table
            .filter(follows::follower_id.eq(follower_id))
            .filter(follows::following_id.eq(target_id))
            .count()
            .get_result::<i64>(&mut conn)
            .await?;
        Ok(count > 0)
    }

    async fn story_follow_edge_exists(
        &self,
        follower_id: &str,
        story_id: &str,
    ) -> StoreResult<bool> {
        let mut conn = self.db.get_connection().await?;
        let count = story_follows::table
            .filter(story_follows::follower_id.eq(follower_id))
            .filter(story_follows::story_id.eq(story_id))
            .count()
            .get_result::<i64>(&mut conn)
            .await?;
        Ok(count > 0)
    }

    async fn insert_follow_edge(&self, follower_id: &str, target_id: &str) -> StoreResult<bool> {
        let mut conn = self.db.get_connection().await?;
        let edge = NewFollow {
            follower_id: follower_id.to_string(),
            following_id: target_id.to_string(),
            created_at: Utc::now().naive_utc(),
        };
        let inserted = diesel::insert_into(follows::table)
            .values(&edge)
            .on_conflict((follows::follower_id, follows::following_id))
            .do_nothing()
            .execute(&mut conn)
            .await?;
        Ok(inserted > 0)
    }

    async fn delete_follow_edge(&self, follower_id: &str, target_id: &str) -> StoreResult<bool> {
        let mut conn = self.db.get_connection().await?;
        let deleted = diesel::delete(
            follows::table
                .filter(follows::follower_id.eq(follower_id))
                .filter(follows::following_id.eq(target_id)),
        )
        .execute(&mut conn)
        .await?;
        Ok(deleted > 0)
    }

    async fn insert_story_follow_edge(
        &self,
        follower_id: &str,
        story_id: &str,
    ) -> StoreResult<bool> {
        let mut conn = self.db.get_connection().await?;
        let edge = NewStoryFollow {
            follower_id: follower_id.to_string(),
            story_id: story_id.to_string(),
            created_at: Utc::now().naive_utc(),
        };
        let inserted = diesel::insert_into(story_follows::table)
            .values(&edge)
            .on_conflict((story_follows::follower_id, story_follows::story_id))
            .do_nothing()
            .execute(&mut conn)
            .await?;
        Ok(inserted > 0)
    }

    async fn delete_story_follow_edge(
        &self,
        follower_id: &str,
        story_id: &str,
    ) -> StoreResult<bool> {
        let mut conn = self.db.get_connection().await?;
        let deleted = diesel::delete(
            story_follows::table
                .filter(story_follows::follower_id.eq(follower_id))
                .filter(story_follows::story_id.eq(story_id)),
        )
        .execute(&mut conn)
        .await?;
        Ok(deleted > 0)
    }
}
