// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::api::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    // Check database connection
    match state.db.get_connection().await {
        Ok(_) => {
            // Database connection is successful
            (
                StatusCode::OK,
                Json(json!({
                    "status": "healthy",
                    "message": "API server is running"
                })),
            )
        }
        Err(e) => {
            // Database connection failed
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "message": format!("Database connection failed: {}", e)
                })),
            )
        }
    }
}
