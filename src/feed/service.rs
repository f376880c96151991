// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{FeedError, FeedResult};
use crate::feed::accessor::StoryRepositoryAccessor;
use crate::feed::cache::FeedCache;
use crate::metrics;
use crate::models::FeedEntry;
use crate::store::RelationshipStore;

/// A resolved feed. `stale` marks entries served from an expired cache
/// slot after a failed refresh.
#[derive(Debug, Serialize)]
pub struct FeedSnapshot {
    pub entries: Vec<FeedEntry>,
    pub stale: bool,
}

/// Composition root of the pipeline: cache in front of the accessor, plus
/// the follow mutators that invalidate it.
pub struct FeedService<S> {
    store: Arc<S>,
    accessor: StoryRepositoryAccessor<S>,
    cache: FeedCache,
}

impl<S: RelationshipStore> FeedService<S> {
    pub fn new(
        store: Arc<S>,
        cache_ttl: Duration,
        cache_capacity: usize,
        fetch_timeout: Duration,
    ) -> Self {
        let accessor = StoryRepositoryAccessor::new(store.clone(), fetch_timeout);
        FeedService {
            store,
            accessor,
            cache: FeedCache::new(cache_ttl, cache_capacity),
        }
    }

    pub fn from_config(store: Arc<S>) -> Self {
        let config = Config::get();
        Self::new(
            store,
            Duration::from_secs(config.feed.cache_ttl_secs),
            config.feed.cache_capacity,
            Duration::from_millis(config.feed.fetch_timeout_ms),
        )
    }

    pub fn cache(&self) -> &FeedCache {
        &self.cache
    }

    /// Resolve the viewer's feed, preferring the cache within its TTL.
    ///
    /// A forced refresh bypasses the cache read but leaves the old slot in
    /// place until the new resolve succeeds, so a failed refresh can still
    /// serve the last good entries as stale instead of nothing.
    pub async fn get_feed(&self, viewer_id: &str, force_refresh: bool) -> FeedResult<FeedSnapshot> {
        if !force_refresh {
            if let Some(entries) = self.cache.get(viewer_id, Instant::now()) {
                metrics::FEED_CACHE_HITS.inc();
                debug!(viewer = viewer_id, "Feed served from cache");
                return Ok(FeedSnapshot {
                    entries,
                    stale: false,
                });
            }
        }
        metrics::FEED_CACHE_MISSES.inc();
        metrics::FEED_RESOLUTIONS.inc();
        match self.accessor.resolve(viewer_id).await {
            Ok(entries) => {
                self.cache.insert(viewer_id, entries.clone(), Instant::now());
                Ok(FeedSnapshot {
                    entries,
                    stale: false,
                })
            }
            Err(FeedError::Unauthenticated) => Err(FeedError::Unauthenticated),
            Err(e) => {
                metrics::FEED_FETCH_FAILURES.inc();
                // A failed fetch never populates the cache, but an old
                // slot beats a blank feed
                if let Some(entries) = self.cache.get_stale(viewer_id) {
                    metrics::FEED_STALE_SERVED.inc();
                    warn!(
                        viewer = viewer_id,
                        "Feed resolve failed, serving stale entries: {}", e
                    );
                    Ok(FeedSnapshot {
                        entries,
                        stale: true,
                    })
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Resolve afresh, bypassing any cached entries
    pub async fn refresh_feed(&self, viewer_id: &str) -> FeedResult<FeedSnapshot> {
        self.get_feed(viewer_id, true).await
    }

    /// Idempotent follow mutation: make "actor follows target" equal
    /// `desired` and report the resulting state. Only an actual state
    /// change invalidates the actor's cache slot.
    pub async fn set_follow(
        &self,
        actor_id: &str,
        target_id: &str,
        desired: bool,
    ) -> FeedResult<bool> {
        self.require_actor(actor_id).await?;
        if actor_id == target_id {
            return Err(FeedError::InvalidTarget(
                "cannot follow yourself".to_string(),
            ));
        }
        let target = self
            .store
            .get_profile(target_id)
            .await
            .map_err(|e| FeedError::EdgeWriteFailed(e.to_string()))?;
        if target.is_none() {
            return Err(FeedError::InvalidTarget(format!(
                "unknown user {}",
                target_id
            )));
        }

        let changed = if desired {
            self.store.insert_follow_edge(actor_id, target_id).await
        } else {
            self.store.delete_follow_edge(actor_id, target_id).await
        }
        .map_err(|e| FeedError::EdgeWriteFailed(e.to_string()))?;

        if changed {
            metrics::FOLLOW_MUTATIONS.inc();
            self.cache.invalidate(actor_id);
            info!(
                actor = actor_id,
                target = target_id,
                following = desired,
                "Follow edge updated"
            );
        }
        Ok(desired)
    }

    /// Toggle-shaped wrapper over `set_follow` for the UI contract
    pub async fn toggle_follow(&self, actor_id: &str, target_id: &str) -> FeedResult<bool> {
        let current = self
            .store
            .follow_edge_exists(actor_id, target_id)
            .await
            .map_err(|e| FeedError::EdgeWriteFailed(e.to_string()))?;
        self.set_follow(actor_id, target_id, !current).await
    }

    /// Idempotent story-follow mutation, same contract as `set_follow`
    pub async fn set_story_follow(
        &self,
        actor_id: &str,
        story_id: &str,
        desired: bool,
    ) -> FeedResult<bool> {
        self.require_actor(actor_id).await?;
        let story = self
            .store
            .get_story(story_id)
            .await
            .map_err(|e| FeedError::EdgeWriteFailed(e.to_string()))?
            .ok_or_else(|| FeedError::InvalidTarget(format!("unknown story {}", story_id)))?;
        if story.owner_id == actor_id {
            return Err(FeedError::InvalidTarget(
                "cannot follow your own story".to_string(),
            ));
        }

        let changed = if desired {
            self.store.insert_story_follow_edge(actor_id, story_id).await
        } else {
            self.store.delete_story_follow_edge(actor_id, story_id).await
        }
        .map_err(|e| FeedError::EdgeWriteFailed(e.to_string()))?;

        if changed {
            metrics::FOLLOW_MUTATIONS.inc();
            self.cache.invalidate(actor_id);
            info!(
                actor = actor_id,
                story = story_id,
                following = desired,
                "Story follow edge updated"
            );
        }
        Ok(desired)
    }

    pub async fn toggle_story_follow(&self, actor_id: &str, story_id: &str) -> FeedResult<bool> {
        let current = self
            .store
            .story_follow_edge_exists(actor_id, story_id)
            .await
            .map_err(|e| FeedError::EdgeWriteFailed(e.to_string()))?;
        self.set_story_follow(actor_id, story_id, !current).await
    }

    async fn require_actor(&self, actor_id: &str) -> FeedResult<()> {
        let actor = self
            .store
            .get_profile(actor_id)
            .await
            .map_err(|e| FeedError::EdgeWriteFailed(e.to_string()))?;
        if actor.is_none() {
            return Err(FeedError::Unauthenticated);
        }
        Ok(())
    }
}
