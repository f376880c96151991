// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

mod memory;
mod postgres;

pub use memory::MemoryRelationshipStore;
pub use postgres::PgRelationshipStore;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::StoreResult;
use crate::models::{ProfileSummary, Story, StoryFilter};

/// Read/write surface of the relationship store as the feed pipeline
/// consumes it. Profile and record-count lookups are batched: one call per
/// id set, not one per row.
#[async_trait]
pub trait RelationshipStore: Send + Sync {
    async fn list_followed_user_ids(&self, viewer_id: &str) -> StoreResult<Vec<String>>;

    async fn list_followed_story_ids(&self, viewer_id: &str) -> StoreResult<Vec<String>>;

    async fn list_stories(&self, filter: StoryFilter) -> StoreResult<Vec<Story>>;

    async fn get_story(&self, story_id: &str) -> StoreResult<Option<Story>>;

    async fn get_profile(&self, user_id: &str) -> StoreResult<Option<ProfileSummary>>;

    /// Batched profile lookup; unknown ids are simply absent from the map
    async fn get_profiles(
        &self,
        user_ids: &[String],
    ) -> StoreResult<HashMap<String, ProfileSummary>>;

    /// Batched record counts; stories with no records are absent from the map
    async fn count_records(&self, story_ids: &[String]) -> StoreResult<HashMap<String, i64>>;

    async fn follow_edge_exists(&self, follower_id: &str, target_id: &str) -> StoreResult<bool>;

    async fn story_follow_edge_exists(
        &self,
        follower_id: &str,
        story_id: &str,
    ) -> StoreResult<bool>;

    /// Insert a user-follow edge. Returns false when the edge already
    /// existed; the call is a no-op in that case.
    async fn insert_follow_edge(&self, follower_id: &str, target_id: &str) -> StoreResult<bool>;

    /// Delete a user-follow edge. Returns false when no edge existed.
    async fn delete_follow_edge(&self, follower_id: &str, target_id: &str) -> StoreResult<bool>;

    async fn insert_story_follow_edge(
        &self,
        follower_id: &str,
        story_id: &str,
    ) -> StoreResult<bool>;

    async fn delete_story_follow_edge(
        &self,
        follower_id: &str,
        story_id: &str,
    ) -> StoreResult<bool>;
}
