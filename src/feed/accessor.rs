// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{FeedError, FeedResult};
use crate::models::{FeedEntry, ProfileSummary, StoryFilter};
use crate::store::RelationshipStore;

/// Resolves the complete set of feed entries a viewer is entitled to see:
/// their own stories, public stories by followed users, and individually
/// followed stories.
///
/// Follow-set and candidate reads are fail-fast; the batched profile and
/// record-count enrichment is fail-soft and bounded by `fetch_timeout`, so
/// a slow or failing enrichment degrades fields instead of losing stories.
pub struct StoryRepositoryAccessor<S> {
    store: Arc<S>,
    fetch_timeout: Duration,
}

impl<S: RelationshipStore> StoryRepositoryAccessor<S> {
    pub fn new(store: Arc<S>, fetch_timeout: Duration) -> Self {
        Self {
            store,
            fetch_timeout,
        }
    }

    pub async fn resolve(&self, viewer_id: &str) -> FeedResult<Vec<FeedEntry>> {
        let viewer = self
            .store
            .get_profile(viewer_id)
            .await
            .map_err(|e| FeedError::FetchFailed(e.to_string()))?;
        if viewer.is_none() {
            return Err(FeedError::Unauthenticated);
        }

        let (followed_users, followed_stories) = tokio::try_join!(
            self.store.list_followed_user_ids(viewer_id),
            self.store.list_followed_story_ids(viewer_id),
        )
        .map_err(|e| FeedError::FetchFailed(e.to_string()))?;

        let (own, by_followed, directly_followed) = tokio::try_join!(
            self.store.list_stories(StoryFilter::owned_by(viewer_id)),
            self.store
                .list_stories(StoryFilter::public_owned_by_any(followed_users)),
            self.store
                .list_stories(StoryFilter::with_ids(followed_stories)),
        )
        .map_err(|e| FeedError::FetchFailed(e.to_string()))?;

        // Merge the three candidate sets, first occurrence wins. Directly
        // followed stories must still be public unless the viewer owns them.
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        let followed_story_set = directly_followed
            .into_iter()
            .filter(|s| s.is_public || s.owner_id == viewer_id);
        for story in own.into_iter().chain(by_followed).chain(followed_story_set) {
            if seen.insert(story.id.clone()) {
                candidates.push(story);
            }
        }
        debug!(
            viewer = viewer_id,
            candidates = candidates.len(),
            "Resolved feed candidate set"
        );

        let mut owner_ids: Vec<String> = Vec::new();
        let mut owner_seen = HashSet::new();
        for story in &candidates {
            if owner_seen.insert(story.owner_id.clone()) {
                owner_ids.push(story.owner_id.clone());
            }
        }
        let story_ids: Vec<String> = candidates.iter().map(|s| s.id.clone()).collect();

        let (profiles, counts) = tokio::join!(
            self.fetch_profiles(viewer_id, &owner_ids),
            self.fetch_record_counts(viewer_id, &story_ids),
        );

        let now = Utc::now().naive_utc();
        Ok(candidates
            .into_iter()
            .map(|story| {
                let author = profiles.get(&story.owner_id);
                let count = counts.get(&story.id).copied();
                FeedEntry::new(story, author, count, viewer_id, now)
            })
            .collect())
    }

    /// Batched author lookup, fail-soft: on error or deadline the feed
    /// renders with empty author fields rather than losing stories.
    async fn fetch_profiles(
        &self,
        viewer_id: &str,
        owner_ids: &[String],
    ) -> HashMap<String, ProfileSummary> {
        match timeout(self.fetch_timeout, self.store.get_profiles(owner_ids)).await {
            Ok(Ok(profiles)) => profiles,
            Ok(Err(e)) => {
                warn!(viewer = viewer_id, "Profile enrichment failed: {}", e);
                HashMap::new()
            }
            Err(_) => {
                warn!(
                    viewer = viewer_id,
                    "Profile enrichment timed out after {:?}", self.fetch_timeout
                );
                HashMap::new()
            }
        }
    }

    /// Batched record counts, fail-soft: degraded stories show zero records
    async fn fetch_record_counts(
        &self,
        viewer_id: &str,
        story_ids: &[String],
    ) -> HashMap<String, i64> {
        match timeout(self.fetch_timeout, self.store.count_records(story_ids)).await {
            Ok(Ok(counts)) => counts,
            Ok(Err(e)) => {
                warn!(viewer = viewer_id, "Record count enrichment failed: {}", e);
                HashMap::new()
            }
            Err(_) => {
                warn!(
                    viewer = viewer_id,
                    "Record count enrichment timed out after {:?}", self.fetch_timeout
                );
                HashMap::new()
            }
        }
    }
}
