// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

//! End-to-end pipeline tests over the in-memory relationship store.

use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime};
use std::sync::Arc;
use std::time::Duration;

use connectos_feed::error::FeedError;
use connectos_feed::feed::{sort_and_filter, FeedService, SortMode};
use connectos_feed::models::Story;
use connectos_feed::store::{MemoryRelationshipStore, RelationshipStore};

fn at(minutes: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        + ChronoDuration::minutes(minutes)
}

fn story(id: &str, owner: &str, name: &str, is_public: bool, activity_minutes: i64) -> Story {
    Story {
        id: id.to_string(),
        owner_id: owner.to_string(),
        name: name.to_string(),
        description: None,
        is_public,
        story_type: "object".to_string(),
        location_city: None,
        location_state: None,
        location_country: None,
        cover_url: None,
        thumbnail_url: None,
        created_at: at(0),
        updated_at: at(activity_minutes),
        last_activity_at: at(activity_minutes),
    }
}

fn service(store: Arc<MemoryRelationshipStore>) -> FeedService<MemoryRelationshipStore> {
    FeedService::new(
        store,
        Duration::from_secs(60),
        8,
        Duration::from_millis(500),
    )
}

async fn seed_viewer_and_friend(store: &MemoryRelationshipStore) {
    store.add_profile("u1", "ada", Some("Ada"), None).await;
    store
        .add_profile("u2", "grace", Some("Grace"), Some("https://cdn/avatar2.png"))
        .await;
}

#[test_log::test(tokio::test)]
async fn own_stories_appear_without_any_follows() {
    let store = Arc::new(MemoryRelationshipStore::new());
    seed_viewer_and_friend(&store).await;
    store.add_story(story("s1", "u1", "Garden Bench", true, 10)).await;
    store.add_story(story("s2", "u1", "Attic Box", false, 5)).await;

    let svc = service(store);
    let snapshot = svc.get_feed("u1", false).await.unwrap();

    let mut ids: Vec<_> = snapshot.entries.iter().map(|e| e.story_id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["s1", "s2"]);
    assert!(snapshot.entries.iter().all(|e| e.is_own_story));
}

#[test_log::test(tokio::test)]
async fn followed_author_scenario() {
    // U1 owns S1 (public, 3 records), follows U2 who owns S2 (public) and
    // S3 (private, not directly followed). Expect exactly {S1, S2}.
    let store = Arc::new(MemoryRelationshipStore::new());
    seed_viewer_and_friend(&store).await;
    store.add_story(story("s1", "u1", "Garden Bench", true, 30)).await;
    store.add_story(story("s2", "u2", "Old Clock", true, 10)).await;
    store.add_story(story("s3", "u2", "Private Drafts", false, 50)).await;
    for i in 0..3 {
        store
            .add_record(&format!("r{}", i), "s1", "entry", at(i))
            .await;
    }
    store.insert_follow_edge("u1", "u2").await.unwrap();

    let svc = service(store);
    let snapshot = svc.get_feed("u1", false).await.unwrap();

    assert_eq!(snapshot.entries.len(), 2);
    let s1 = snapshot
        .entries
        .iter()
        .find(|e| e.story_id == "s1")
        .expect("own story present");
    let s2 = snapshot
        .entries
        .iter()
        .find(|e| e.story_id == "s2")
        .expect("followed author's public story present");
    assert!(s1.is_own_story);
    assert!(!s2.is_own_story);
    assert_eq!(s1.record_count, 3);
    assert_eq!(s2.record_count, 0);
    assert_eq!(s2.author_name, "Grace");
    assert_eq!(s2.author_avatar_url.as_deref(), Some("https://cdn/avatar2.png"));

    // S1 has the later activity, so recent ordering puts it first
    let ordered = sort_and_filter(snapshot.entries, "", SortMode::Recent);
    assert_eq!(ordered[0].story_id, "s1");
    assert_eq!(ordered[1].story_id, "s2");
}

#[test_log::test(tokio::test)]
async fn directly_followed_stories_respect_visibility() {
    let store = Arc::new(MemoryRelationshipStore::new());
    seed_viewer_and_friend(&store).await;
    store.add_profile("u3", "linus", None, None).await;
    // U1 follows neither author, only individual stories
    store.add_story(story("s4", "u2", "Shared Atlas", true, 10)).await;
    store.add_story(story("s5", "u3", "Hidden Journal", false, 20)).await;
    store.insert_story_follow_edge("u1", "s4").await.unwrap();
    store.insert_story_follow_edge("u1", "s5").await.unwrap();

    let svc = service(store.clone());
    let snapshot = svc.get_feed("u1", false).await.unwrap();

    // The private story is excluded even though it is directly followed
    let ids: Vec<_> = snapshot.entries.iter().map(|e| e.story_id.as_str()).collect();
    assert_eq!(ids, vec!["s4"]);

    // No self-exposure: every non-owned entry is public or directly followed
    let followed = store.list_followed_story_ids("u1").await.unwrap();
    for entry in &snapshot.entries {
        if !entry.is_own_story {
            assert!(entry.is_public || followed.contains(&entry.story_id));
        }
    }
}

#[test_log::test(tokio::test)]
async fn double_toggle_cancels_and_invalidates_twice() {
    let store = Arc::new(MemoryRelationshipStore::new());
    seed_viewer_and_friend(&store).await;

    let svc = service(store.clone());
    let baseline = svc.cache().invalidation_count();

    let first = svc.toggle_follow("u1", "u2").await.unwrap();
    assert!(first);
    assert!(store.follow_edge_exists("u1", "u2").await.unwrap());

    let second = svc.toggle_follow("u1", "u2").await.unwrap();
    assert!(!second);
    assert!(!store.follow_edge_exists("u1", "u2").await.unwrap());

    assert_eq!(svc.cache().invalidation_count() - baseline, 2);
}

#[test_log::test(tokio::test)]
async fn set_follow_is_idempotent() {
    let store = Arc::new(MemoryRelationshipStore::new());
    seed_viewer_and_friend(&store).await;

    let svc = service(store.clone());
    let baseline = svc.cache().invalidation_count();

    assert!(svc.set_follow("u1", "u2", true).await.unwrap());
    // Repeat is a no-op: state unchanged, no extra invalidation
    assert!(svc.set_follow("u1", "u2", true).await.unwrap());
    assert_eq!(svc.cache().invalidation_count() - baseline, 1);

    assert!(!svc.set_follow("u1", "u2", false).await.unwrap());
    assert!(!store.follow_edge_exists("u1", "u2").await.unwrap());
    assert_eq!(svc.cache().invalidation_count() - baseline, 2);
}

#[test_log::test(tokio::test)]
async fn self_follow_and_own_story_follow_are_rejected() {
    let store = Arc::new(MemoryRelationshipStore::new());
    seed_viewer_and_friend(&store).await;
    store.add_story(story("s1", "u1", "Garden Bench", true, 0)).await;

    let svc = service(store.clone());

    let err = svc.toggle_follow("u1", "u1").await.unwrap_err();
    assert!(matches!(err, FeedError::InvalidTarget(_)));
    assert!(!store.follow_edge_exists("u1", "u1").await.unwrap());

    let err = svc.set_story_follow("u1", "s1", true).await.unwrap_err();
    assert!(matches!(err, FeedError::InvalidTarget(_)));
    assert!(!store.story_follow_edge_exists("u1", "s1").await.unwrap());
}

#[test_log::test(tokio::test)]
async fn unknown_actor_and_unknown_target() {
    let store = Arc::new(MemoryRelationshipStore::new());
    seed_viewer_and_friend(&store).await;

    let svc = service(store);

    let err = svc.get_feed("ghost", false).await.unwrap_err();
    assert!(matches!(err, FeedError::Unauthenticated));

    let err = svc.set_follow("ghost", "u1", true).await.unwrap_err();
    assert!(matches!(err, FeedError::Unauthenticated));

    let err = svc.set_follow("u1", "nobody", true).await.unwrap_err();
    assert!(matches!(err, FeedError::InvalidTarget(_)));

    let err = svc.set_story_follow("u1", "missing-story", true).await.unwrap_err();
    assert!(matches!(err, FeedError::InvalidTarget(_)));
}

#[test_log::test(tokio::test)]
async fn cached_feed_skips_store_within_ttl() {
    let store = Arc::new(MemoryRelationshipStore::new());
    seed_viewer_and_friend(&store).await;
    store.add_story(story("s1", "u1", "Garden Bench", true, 0)).await;

    let svc = service(store.clone());

    svc.get_feed("u1", false).await.unwrap();
    let after_first = store.story_list_calls();
    assert!(after_first > 0);

    // Second fetch inside the TTL is served from cache
    svc.get_feed("u1", false).await.unwrap();
    assert_eq!(store.story_list_calls(), after_first);

    // A forced refresh goes back to the store
    svc.get_feed("u1", true).await.unwrap();
    assert!(store.story_list_calls() > after_first);
}

#[test_log::test(tokio::test)]
async fn follow_mutation_is_visible_on_next_fetch() {
    let store = Arc::new(MemoryRelationshipStore::new());
    seed_viewer_and_friend(&store).await;
    store.add_story(story("s1", "u1", "Garden Bench", true, 0)).await;
    store.add_story(story("s2", "u2", "Old Clock", true, 10)).await;

    let svc = service(store.clone());

    let before = svc.get_feed("u1", false).await.unwrap();
    assert_eq!(before.entries.len(), 1);

    // The mutation invalidates the cached slot, so no TTL wait is needed
    svc.set_follow("u1", "u2", true).await.unwrap();
    let after = svc.get_feed("u1", false).await.unwrap();
    assert_eq!(after.entries.len(), 2);

    svc.set_follow("u1", "u2", false).await.unwrap();
    let reverted = svc.get_feed("u1", false).await.unwrap();
    assert_eq!(reverted.entries.len(), 1);
}

#[test_log::test(tokio::test)]
async fn story_follow_toggle_changes_feed_membership() {
    let store = Arc::new(MemoryRelationshipStore::new());
    seed_viewer_and_friend(&store).await;
    store.add_story(story("s2", "u2", "Old Clock", true, 10)).await;

    let svc = service(store.clone());
    assert!(svc.get_feed("u1", false).await.unwrap().entries.is_empty());

    assert!(svc.toggle_story_follow("u1", "s2").await.unwrap());
    let followed = svc.get_feed("u1", false).await.unwrap();
    assert_eq!(followed.entries.len(), 1);
    assert_eq!(followed.entries[0].story_id, "s2");

    assert!(!svc.toggle_story_follow("u1", "s2").await.unwrap());
    assert!(svc.get_feed("u1", false).await.unwrap().entries.is_empty());
}

#[test_log::test(tokio::test)]
async fn enrichment_failure_degrades_fields_but_keeps_stories() {
    let store = Arc::new(MemoryRelationshipStore::new());
    seed_viewer_and_friend(&store).await;
    store.add_story(story("s1", "u1", "Garden Bench", true, 0)).await;
    store.add_record("r1", "s1", "entry", at(1)).await;

    store.set_fail_enrichment(true);
    let svc = service(store);
    let snapshot = svc.get_feed("u1", false).await.unwrap();

    assert_eq!(snapshot.entries.len(), 1);
    let entry = &snapshot.entries[0];
    assert_eq!(entry.author_name, "");
    assert_eq!(entry.record_count, 0);
}

#[test_log::test(tokio::test)]
async fn failed_refresh_serves_stale_entries() {
    let store = Arc::new(MemoryRelationshipStore::new());
    seed_viewer_and_friend(&store).await;
    store.add_story(story("s1", "u1", "Garden Bench", true, 0)).await;

    let svc = service(store.clone());
    let fresh = svc.get_feed("u1", false).await.unwrap();
    assert!(!fresh.stale);

    store.set_fail_reads(true);
    let stale = svc.refresh_feed("u1").await.unwrap();
    assert!(stale.stale);
    assert_eq!(stale.entries.len(), 1);
    assert_eq!(stale.entries[0].story_id, "s1");
}

#[test_log::test(tokio::test)]
async fn failed_fetch_with_no_cache_is_an_error() {
    let store = Arc::new(MemoryRelationshipStore::new());
    seed_viewer_and_friend(&store).await;
    store.add_story(story("s1", "u1", "Garden Bench", true, 0)).await;
    store.set_fail_reads(true);

    let svc = service(store.clone());
    let err = svc.get_feed("u1", false).await.unwrap_err();
    assert!(matches!(err, FeedError::FetchFailed(_)));

    // A failed fetch never populates the cache; recovery re-resolves
    store.set_fail_reads(false);
    let calls_before = store.story_list_calls();
    let snapshot = svc.get_feed("u1", false).await.unwrap();
    assert_eq!(snapshot.entries.len(), 1);
    assert!(store.story_list_calls() > calls_before);
}
