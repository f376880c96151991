// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

pub mod feed;
pub mod follows;
pub mod health;
pub mod metrics;

use axum::{http::StatusCode, Json};

use crate::error::FeedError;

/// Map a pipeline error to its HTTP shape
pub fn error_response(err: FeedError) -> (StatusCode, Json<serde_json::Value>) {
    let status = match &err {
        FeedError::Unauthenticated => StatusCode::UNAUTHORIZED,
        FeedError::InvalidTarget(_) => StatusCode::UNPROCESSABLE_ENTITY,
        FeedError::FetchFailed(_) | FeedError::EdgeWriteFailed(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        Json(serde_json::json!({
            "error": err.to_string()
        })),
    )
}
