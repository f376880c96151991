// Copyright (c) ConnectOS Team
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Failures raised by a relationship store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection unavailable: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// User-facing failures of the feed pipeline. Store errors are converted
/// into one of these at the component boundary and never escape raw.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Operation requires a known, logged-in actor
    #[error("authentication required")]
    Unauthenticated,

    /// Self-follow, following one's own story, or an unknown target
    #[error("invalid follow target: {0}")]
    InvalidTarget(String),

    /// An underlying store read failed while resolving the feed
    #[error("feed fetch failed: {0}")]
    FetchFailed(String),

    /// A follow/unfollow edge write failed; edge state is unchanged
    #[error("follow update failed: {0}")]
    EdgeWriteFailed(String),
}

pub type FeedResult<T> = Result<T, FeedError>;
