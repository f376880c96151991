// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::models::FeedEntry;

/// Client-selectable feed orderings. Every mode is a total order with an
/// explicit tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    Recent,
    Oldest,
    Records,
    Alphabetical,
}

impl Default for SortMode {
    fn default() -> Self {
        SortMode::Recent
    }
}

impl SortMode {
    pub fn parse(value: &str) -> Option<SortMode> {
        match value {
            "recent" => Some(SortMode::Recent),
            "oldest" => Some(SortMode::Oldest),
            "records" | "popularity" => Some(SortMode::Records),
            "alphabetical" | "name" => Some(SortMode::Alphabetical),
            _ => None,
        }
    }

    /// Unknown modes fall back to recency rather than erroring
    pub fn parse_or_default(value: &str) -> SortMode {
        SortMode::parse(value).unwrap_or_default()
    }
}

/// One page of a ranked feed
#[derive(Debug, Serialize)]
pub struct Page {
    pub entries: Vec<FeedEntry>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

/// Case-insensitive substring filter over story name, description, and
/// author display name. A blank query keeps everything.
pub fn filter_entries(entries: Vec<FeedEntry>, query: &str) -> Vec<FeedEntry> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|entry| {
            entry.name.to_lowercase().contains(&query)
                || entry
                    .description
                    .as_deref()
                    .map(|d| d.to_lowercase().contains(&query))
                    .unwrap_or(false)
                || entry.author_name.to_lowercase().contains(&query)
        })
        .collect()
}

/// Order entries in place. All sorts are stable, so equal keys keep their
/// insertion order.
pub fn sort_entries(entries: &mut [FeedEntry], mode: SortMode) {
    match mode {
        SortMode::Recent => {
            entries.sort_by(|a, b| b.last_activity_at.cmp(&a.last_activity_at));
        }
        SortMode::Oldest => {
            entries.sort_by(|a, b| a.last_activity_at.cmp(&b.last_activity_at));
        }
        SortMode::Records => {
            entries.sort_by(|a, b| {
                b.record_count
                    .cmp(&a.record_count)
                    .then(b.last_activity_at.cmp(&a.last_activity_at))
            });
        }
        SortMode::Alphabetical => {
            entries.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.name.cmp(&b.name))
            });
        }
    }
}

/// Filter then sort, the order the feed view applies them
pub fn sort_and_filter(entries: Vec<FeedEntry>, query: &str, mode: SortMode) -> Vec<FeedEntry> {
    let mut filtered = filter_entries(entries, query);
    sort_entries(&mut filtered, mode);
    filtered
}

/// Slice one 1-based page out of an ordered list. Out-of-range page numbers
/// are clamped to the nearest valid page; this never panics and never
/// returns an out-of-range page.
pub fn paginate(entries: Vec<FeedEntry>, page: usize, page_size: usize) -> Page {
    let page_size = page_size.max(1);
    let total = entries.len();
    let total_pages = ((total + page_size - 1) / page_size).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total);
    let entries = if start < total {
        entries[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        entries,
        page,
        total_pages,
        total,
    }
}
