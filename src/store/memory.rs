// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::models::record::Record;
use crate::models::{Profile, ProfileSummary, Story, StoryFilter};
use crate::store::RelationshipStore;

#[derive(Default)]
struct State {
    profiles: HashMap<String, Profile>,
    stories: Vec<Story>,
    records: Vec<Record>,
    follows: Vec<(String, String)>,
    story_follows: Vec<(String, String)>,
}

/// In-memory relationship store for integration tests and local
/// development. Mirrors the Postgres implementation's contract, including
/// edge uniqueness and empty-id-set semantics.
///
/// Reads can be made to fail on demand so callers' failure paths are
/// exercisable without a database.
#[derive(Default)]
pub struct MemoryRelationshipStore {
    state: RwLock<State>,
    list_stories_calls: AtomicUsize,
    fail_reads: AtomicBool,
    fail_enrichment: AtomicBool,
}

impl MemoryRelationshipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_profile(
        &self,
        id: &str,
        username: &str,
        display_name: Option<&str>,
        avatar_url: Option<&str>,
    ) {
        let now = Utc::now().naive_utc();
        let profile = Profile {
            id: id.to_string(),
            username: username.to_string(),
            display_name: display_name.map(str::to_string),
            avatar_url: avatar_url.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        self.state.write().await.profiles.insert(id.to_string(), profile);
    }

    pub async fn add_story(&self, story: Story) {
        self.state.write().await.stories.push(story);
    }

    pub async fn add_record(&self, id: &str, story_id: &str, title: &str, created_at: NaiveDateTime) {
        let record = Record {
            id: id.to_string(),
            story_id: story_id.to_string(),
            title: title.to_string(),
            description: None,
            is_public: true,
            location_city: None,
            location_state: None,
            location_country: None,
            created_at,
        };
        self.state.write().await.records.push(record);
    }

    /// Number of `list_stories` calls served so far
    pub fn story_list_calls(&self) -> usize {
        self.list_stories_calls.load(Ordering::SeqCst)
    }

    /// Make follow-set and story-list reads fail until cleared
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make batched profile/record-count lookups fail until cleared
    pub fn set_fail_enrichment(&self, fail: bool) {
        self.fail_enrichment.store(fail, Ordering::SeqCst);
    }

    fn check_reads(&self) -> StoreResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(StoreError::Connection("injected read failure".to_string()))
        } else {
            Ok(())
        }
    }

    fn check_enrichment(&self) -> StoreResult<()> {
        if self.fail_enrichment.load(Ordering::SeqCst) {
            Err(StoreError::Connection(
                "injected enrichment failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RelationshipStore for MemoryRelationshipStore {
    async fn list_followed_user_ids(&self, viewer_id: &str) -> StoreResult<Vec<String>> {
        self.check_reads()?;
        let state = self.state.read().await;
        Ok(state
            .follows
            .iter()
            .filter(|(follower, _)| follower == viewer_id)
            .map(|(_, target)| target.clone())
            .collect())
    }

    async fn list_followed_story_ids(&self, viewer_id: &str) -> StoreResult<Vec<String>> {
        self.check_reads()?;
        let state = self.state.read().await;
        Ok(state
            .story_follows
            .iter()
            .filter(|(follower, _)| follower == viewer_id)
            .map(|(_, story)| story.clone())
            .collect())
    }

    async fn list_stories(&self, filter: StoryFilter) -> StoreResult<Vec<Story>> {
        self.check_reads()?;
        self.list_stories_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().await;
        Ok(state
            .stories
            .iter()
            .filter(|s| match &filter.owner_id {
                Some(owner) => &s.owner_id == owner,
                None => true,
            })
            .filter(|s| match &filter.owner_in {
                Some(owners) => owners.contains(&s.owner_id),
                None => true,
            })
            .filter(|s| match &filter.id_in {
                Some(ids) => ids.contains(&s.id),
                None => true,
            })
            .filter(|s| !filter.only_public || s.is_public)
            .cloned()
            .collect())
    }

    async fn get_story(&self, story_id: &str) -> StoreResult<Option<Story>> {
        self.check_reads()?;
        let state = self.state.read().await;
        Ok(state.stories.iter().find(|s| s.id == story_id).cloned())
    }

    async fn get_profile(&self, user_id: &str) -> StoreResult<Option<ProfileSummary>> {
        self.check_reads()?;
        let state = self.state.read().await;
        Ok(state
            .profiles
            .get(user_id)
            .cloned()
            .map(ProfileSummary::from))
    }

    async fn get_profiles(
        &self,
        user_ids: &[String],
    ) -> StoreResult<HashMap<String, ProfileSummary>> {
        self.check_enrichment()?;
        let state = self.state.read().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| state.profiles.get(id).cloned())
            .map(|p| (p.id.clone(), ProfileSummary::from(p)))
            .collect())
    }

    async fn count_records(&self, story_ids: &[String]) -> StoreResult<HashMap<String, i64>> {
        self.check_enrichment()?;
        let state = self.state.read().await;
        let mut counts: HashMap<String, i64> = HashMap::new();
        for record in &state.records {
            if story_ids.contains(&record.story_id) {
                *counts.entry(record.story_id.clone()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn follow_edge_exists(&self, follower_id: &str, target_id: &str) -> StoreResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .follows
            .iter()
            .any(|(f, t)| f == follower_id && t == target_id))
    }

    async fn story_follow_edge_exists(
        &self,
        follower_id: &str,
        story_id: &str,
    ) -> StoreResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .story_follows
            .iter()
            .any(|(f, s)| f == follower_id && s == story_id))
    }

    async fn insert_follow_edge(&self, follower_id: &str, target_id: &str) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let exists = state
            .follows
            .iter()
            .any(|(f, t)| f == follower_id && t == target_id);
        if exists {
            return Ok(false);
        }
        state
            .follows
            .push((follower_id.to_string(), target_id.to_string()));
        Ok(true)
    }

    async fn delete_follow_edge(&self, follower_id: &str, target_id: &str) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.follows.len();
        state
            .follows
            .retain(|(f, t)| !(f == follower_id && t == target_id));
        Ok(state.follows.len() < before)
    }

    async fn insert_story_follow_edge(
        &self,
        follower_id: &str,
        story_id: &str,
    ) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let exists = state
            .story_follows
            .iter()
            .any(|(f, s)| f == follower_id && s == story_id);
        if exists {
            return Ok(false);
        }
        state
            .story_follows
            .push((follower_id.to_string(), story_id.to_string()));
        Ok(true)
    }

    async fn delete_story_follow_edge(
        &self,
        follower_id: &str,
        story_id: &str,
    ) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.story_follows.len();
        state
            .story_follows
            .retain(|(f, s)| !(f == follower_id && s == story_id));
        Ok(state.story_follows.len() < before)
    }
}
