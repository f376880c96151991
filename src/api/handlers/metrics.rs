// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

use axum::response::IntoResponse;

use crate::metrics;

/// Prometheus text exposition of the feed pipeline counters
pub async fn get_metrics() -> impl IntoResponse {
    metrics::gather()
}
