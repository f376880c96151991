// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use tracing::{debug, error};

use crate::api::handlers::error_response;
use crate::api::AppState;
use crate::models::follow::{FollowDetail, FollowsQuery};
use crate::schema::{follows, profiles};

#[derive(Debug, Deserialize)]
pub struct SetFollowBody {
    pub following: bool,
}

/// Idempotently set whether the actor follows the target user
pub async fn set_follow(
    State(state): State<AppState>,
    Path((actor_id, target_id)): Path<(String, String)>,
    Json(body): Json<SetFollowBody>,
) -> impl IntoResponse {
    match state
        .feed
        .set_follow(&actor_id, &target_id, body.following)
        .await
    {
        Ok(following) => (
            StatusCode::OK,
            Json(serde_json::json!({ "following": following })),
        ),
        Err(e) => error_response(e),
    }
}

/// Flip whether the actor follows the target user
pub async fn toggle_follow(
    State(state): State<AppState>,
    Path((actor_id, target_id)): Path<(String, String)>,
) -> impl IntoResponse {
    match state.feed.toggle_follow(&actor_id, &target_id).await {
        Ok(following) => (
            StatusCode::OK,
            Json(serde_json::json!({ "following": following })),
        ),
        Err(e) => error_response(e),
    }
}

/// Idempotently set whether the actor follows the story
pub async fn set_story_follow(
    State(state): State<AppState>,
    Path((actor_id, story_id)): Path<(String, String)>,
    Json(body): Json<SetFollowBody>,
) -> impl IntoResponse {
    match state
        .feed
        .set_story_follow(&actor_id, &story_id, body.following)
        .await
    {
        Ok(following) => (
            StatusCode::OK,
            Json(serde_json::json!({ "following": following })),
        ),
        Err(e) => error_response(e),
    }
}

/// Flip whether the actor follows the story
pub async fn toggle_story_follow(
    State(state): State<AppState>,
    Path((actor_id, story_id)): Path<(String, String)>,
) -> impl IntoResponse {
    match state.feed.toggle_story_follow(&actor_id, &story_id).await {
        Ok(following) => (
            StatusCode::OK,
            Json(serde_json::json!({ "following": following })),
        ),
        Err(e) => error_response(e),
    }
}

/// Get a list of profiles that a user is following
pub async fn get_following(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Query(query): Query<FollowsQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(50);
    let offset = query.offset.unwrap_or(0);
    let page = query.page.unwrap_or(1);

    // If page is provided, calculate the offset
    let offset = if page > 1 { (page - 1) * limit } else { offset };

    debug!(
        "Getting following for profile {}, limit: {}, offset: {}",
        profile_id, limit, offset
    );

    let mut conn = match state.db.get_connection().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("Database connection error: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": format!("Database error: {}", e)
                })),
            );
        }
    };

    // First verify the profile exists
    let profile_exists = match profiles::table
        .filter(profiles::id.eq(&profile_id))
        .count()
        .get_result::<i64>(&mut conn)
        .await
    {
        Ok(count) => count > 0,
        Err(e) => {
            error!("Failed to check profile: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": format!("Failed to check profile: {}", e)
                })),
            );
        }
    };

    if !profile_exists {
        debug!("Profile not found: {}", profile_id);
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "Profile not found"
            })),
        );
    }

    // Get followed profiles joined with their details
    let following_result = follows::table
        .filter(follows::follower_id.eq(&profile_id))
        .inner_join(profiles::table.on(profiles::id.eq(follows::following_id)))
        .select((
            profiles::id,
            profiles::username,
            profiles::display_name,
            profiles::avatar_url,
            follows::created_at,
        ))
        .order_by(follows::created_at.desc())
        .limit(limit)
        .offset(offset)
        .load::<(String, String, Option<String>, Option<String>, NaiveDateTime)>(&mut conn)
        .await;

    // Also get the total count for pagination info
    let total_count = match follows::table
        .filter(follows::follower_id.eq(&profile_id))
        .count()
        .get_result::<i64>(&mut conn)
        .await
    {
        Ok(count) => count,
        Err(_) => 0,
    };

    let total_pages = (total_count as f64 / limit as f64).ceil() as i64;

    match following_result {
        Ok(rows) => {
            let details: Vec<FollowDetail> = rows
                .into_iter()
                .map(
                    |(id, username, display_name, avatar_url, followed_at)| FollowDetail {
                        id,
                        username,
                        display_name,
                        avatar_url,
                        followed_at,
                    },
                )
                .collect();

            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "profiles": details,
                    "pagination": {
                        "total": total_count,
                        "limit": limit,
                        "offset": offset,
                        "page": page,
                        "total_pages": total_pages
                    }
                })),
            )
        }
        Err(e) => {
            error!("Failed to fetch following profiles: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": format!("Failed to fetch following: {}", e)
                })),
            )
        }
    }
}

/// Get a list of profiles that follow a user
pub async fn get_followers(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Query(query): Query<FollowsQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(50);
    let offset = query.offset.unwrap_or(0);
    let page = query.page.unwrap_or(1);

    // If page is provided, calculate the offset
    let offset = if page > 1 { (page - 1) * limit } else { offset };

    debug!(
        "Getting followers for profile {}, limit: {}, offset: {}",
        profile_id, limit, offset
    );

    let mut conn = match state.db.get_connection().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("Database connection error: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": format!("Database error: {}", e)
                })),
            );
        }
    };

    // First verify the profile exists
    let profile_exists = match profiles::table
        .filter(profiles::id.eq(&profile_id))
        .count()
        .get_result::<i64>(&mut conn)
        .await
    {
        Ok(count) => count > 0,
        Err(e) => {
            error!("Failed to check profile: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": format!("Failed to check profile: {}", e)
                })),
            );
        }
    };

    if !profile_exists {
        debug!("Profile not found: {}", profile_id);
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "Profile not found"
            })),
        );
    }

    // Get follower profiles joined with their details
    let followers_result = follows::table
        .filter(follows::following_id.eq(&profile_id))
        .inner_join(profiles::table.on(profiles::id.eq(follows::follower_id)))
        .select((
            profiles::id,
            profiles::username,
            profiles::display_name,
            profiles::avatar_url,
            follows::created_at,
        ))
        .order_by(follows::created_at.desc())
        .limit(limit)
        .offset(offset)
        .load::<(String, String, Option<String>, Option<String>, NaiveDateTime)>(&mut conn)
        .await;

    // Also get the total count for pagination info
    let total_count = match follows::table
        .filter(follows::following_id.eq(&profile_id))
        .count()
        .get_result::<i64>(&mut conn)
        .await
    {
        Ok(count) => count,
        Err(_) => 0,
    };

    let total_pages = (total_count as f64 / limit as f64).ceil() as i64;

    match followers_result {
        Ok(rows) => {
            let details: Vec<FollowDetail> = rows
                .into_iter()
                .map(
                    |(id, username, display_name, avatar_url, followed_at)| FollowDetail {
                        id,
                        username,
                        display_name,
                        avatar_url,
                        followed_at,
                    },
                )
                .collect();

            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "profiles": details,
                    "pagination": {
                        "total": total_count,
                        "limit": limit,
                        "offset": offset,
                        "page": page,
                        "total_pages": total_pages
                    }
                })),
            )
        }
        Err(e) => {
            error!("Failed to fetch follower profiles: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": format!("Failed to fetch followers: {}", e)
                })),
            )
        }
    }
}
