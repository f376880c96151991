// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

fn counter(name: &str, help: &str) -> IntCounter {
    let counter = IntCounter::new(name, help).expect("counter options are static");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("counter registered once");
    counter
}

pub static FEED_CACHE_HITS: Lazy<IntCounter> =
    Lazy::new(|| counter("feed_cache_hits_total", "Feed requests served from cache"));

pub static FEED_CACHE_MISSES: Lazy<IntCounter> =
    Lazy::new(|| counter("feed_cache_misses_total", "Feed requests that missed the cache"));

pub static FEED_RESOLUTIONS: Lazy<IntCounter> =
    Lazy::new(|| counter("feed_resolutions_total", "Full feed resolutions executed"));

pub static FEED_FETCH_FAILURES: Lazy<IntCounter> =
    Lazy::new(|| counter("feed_fetch_failures_total", "Feed resolutions that failed"));

pub static FEED_STALE_SERVED: Lazy<IntCounter> = Lazy::new(|| {
    counter(
        "feed_stale_served_total",
        "Feed requests answered with stale cache after a failed refresh",
    )
});

pub static FOLLOW_MUTATIONS: Lazy<IntCounter> =
    Lazy::new(|| counter("follow_mutations_total", "Follow edges inserted or deleted"));

/// Render all registered metrics in the prometheus text format
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
