// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::debug;

use crate::api::handlers::error_response;
use crate::api::AppState;
use crate::config::Config;
use crate::feed::{paginate, sort_and_filter, SortMode};

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub refresh: Option<bool>,
}

/// Resolve a viewer's feed and serve one ranked page of it
pub async fn get_feed(
    State(state): State<AppState>,
    Path(viewer_id): Path<String>,
    Query(query): Query<FeedQuery>,
) -> impl IntoResponse {
    let sort = SortMode::parse_or_default(query.sort.as_deref().unwrap_or("recent"));
    let page_size = query
        .page_size
        .unwrap_or(Config::get().feed.default_page_size)
        .clamp(1, 100);
    let page_number = query.page.unwrap_or(1);
    let force_refresh = query.refresh.unwrap_or(false);

    debug!(
        viewer = %viewer_id,
        ?sort,
        page = page_number,
        refresh = force_refresh,
        "Feed requested"
    );

    let snapshot = match state.feed.get_feed(&viewer_id, force_refresh).await {
        Ok(snapshot) => snapshot,
        Err(e) => return error_response(e),
    };

    let ordered = sort_and_filter(snapshot.entries, query.q.as_deref().unwrap_or(""), sort);
    let page = paginate(ordered, page_number, page_size);

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "entries": page.entries,
            "stale": snapshot.stale,
            "pagination": {
                "total": page.total,
                "page": page.page,
                "page_size": page_size,
                "total_pages": page.total_pages
            }
        })),
    )
}
