// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::models::FeedEntry;

struct Slot {
    entries: Vec<FeedEntry>,
    inserted_at: Instant,
}

/// Time-boxed memoization of resolved feeds, keyed by viewer id.
///
/// Bounded to `capacity` slots; inserting past capacity evicts the stalest
/// slot. Expired slots are kept until evicted or invalidated so callers can
/// prefer stale data over an empty feed when a refresh fails. The clock is
/// supplied by the caller, which keeps TTL behavior testable.
pub struct FeedCache {
    ttl: Duration,
    capacity: usize,
    slots: Mutex<HashMap<String, Slot>>,
    invalidations: AtomicU64,
}

impl FeedCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        FeedCache {
            ttl,
            capacity: capacity.max(1),
            slots: Mutex::new(HashMap::new()),
            invalidations: AtomicU64::new(0),
        }
    }

    /// Fresh entries for `viewer_id`, or None when absent or older than the TTL
    pub fn get(&self, viewer_id: &str, now: Instant) -> Option<Vec<FeedEntry>> {
        let slots = self.slots.lock().unwrap();
        let slot = slots.get(viewer_id)?;
        if now.duration_since(slot.inserted_at) < self.ttl {
            Some(slot.entries.clone())
        } else {
            None
        }
    }

    /// Entries for `viewer_id` regardless of age. Fallback for failed refreshes.
    pub fn get_stale(&self, viewer_id: &str) -> Option<Vec<FeedEntry>> {
        let slots = self.slots.lock().unwrap();
        slots.get(viewer_id).map(|slot| slot.entries.clone())
    }

    pub fn insert(&self, viewer_id: &str, entries: Vec<FeedEntry>, now: Instant) {
        let mut slots = self.slots.lock().unwrap();
        if !slots.contains_key(viewer_id) && slots.len() >= self.capacity {
            // Evict the stalest slot to stay within bounds
            if let Some(stalest) = slots
                .iter()
                .min_by_key(|(_, slot)| slot.inserted_at)
                .map(|(viewer, _)| viewer.clone())
            {
                debug!(viewer = %stalest, "Evicting stalest feed cache slot");
                slots.remove(&stalest);
            }
        }
        slots.insert(
            viewer_id.to_string(),
            Slot {
                entries,
                inserted_at: now,
            },
        );
    }

    /// Drop the viewer's slot. Called on explicit refresh and after any
    /// follow mutation that changed feed membership.
    pub fn invalidate(&self, viewer_id: &str) {
        let mut slots = self.slots.lock().unwrap();
        slots.remove(viewer_id);
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }

    /// Total invalidations since construction
    pub fn invalidation_count(&self) -> u64 {
        self.invalidations.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(story_id: &str) -> FeedEntry {
        let now = Utc::now().naive_utc();
        FeedEntry {
            story_id: story_id.to_string(),
            owner_id: "u1".to_string(),
            name: "story".to_string(),
            description: None,
            is_public: true,
            story_type: "object".to_string(),
            cover_url: None,
            thumbnail_url: None,
            author_name: "Someone".to_string(),
            author_avatar_url: None,
            record_count: 0,
            last_activity_at: now,
            last_updated: "just now".to_string(),
            is_own_story: false,
        }
    }

    #[test]
    fn hit_within_ttl_miss_after() {
        let cache = FeedCache::new(Duration::from_secs(60), 8);
        let t0 = Instant::now();
        cache.insert("u1", vec![entry("s1")], t0);

        let just_before = t0 + Duration::from_millis(59_999);
        assert!(cache.get("u1", just_before).is_some());

        let just_after = t0 + Duration::from_millis(60_001);
        assert!(cache.get("u1", just_after).is_none());
        // Expired slots remain readable as stale data
        assert!(cache.get_stale("u1").is_some());
    }

    #[test]
    fn slots_are_per_viewer() {
        let cache = FeedCache::new(Duration::from_secs(60), 8);
        let t0 = Instant::now();
        cache.insert("u1", vec![entry("s1")], t0);

        assert!(cache.get("u2", t0).is_none());
        let hit = cache.get("u1", t0).unwrap();
        assert_eq!(hit[0].story_id, "s1");
    }

    #[test]
    fn invalidate_drops_slot_and_counts() {
        let cache = FeedCache::new(Duration::from_secs(60), 8);
        let t0 = Instant::now();
        cache.insert("u1", vec![entry("s1")], t0);

        cache.invalidate("u1");
        assert!(cache.get("u1", t0).is_none());
        assert!(cache.get_stale("u1").is_none());
        assert_eq!(cache.invalidation_count(), 1);
    }

    #[test]
    fn capacity_evicts_stalest_slot() {
        let cache = FeedCache::new(Duration::from_secs(60), 2);
        let t0 = Instant::now();
        cache.insert("u1", vec![entry("s1")], t0);
        cache.insert("u2", vec![entry("s2")], t0 + Duration::from_secs(1));
        cache.insert("u3", vec![entry("s3")], t0 + Duration::from_secs(2));

        assert!(cache.get_stale("u1").is_none());
        assert!(cache.get_stale("u2").is_some());
        assert!(cache.get_stale("u3").is_some());
    }

    #[test]
    fn reinsert_for_same_viewer_does_not_evict_others() {
        let cache = FeedCache::new(Duration::from_secs(60), 2);
        let t0 = Instant::now();
        cache.insert("u1", vec![entry("s1")], t0);
        cache.insert("u2", vec![entry("s2")], t0);
        cache.insert("u1", vec![entry("s9")], t0 + Duration::from_secs(5));

        assert!(cache.get_stale("u2").is_some());
        let hit = cache.get("u1", t0 + Duration::from_secs(6)).unwrap();
        assert_eq!(hit[0].story_id, "s9");
    }
}
