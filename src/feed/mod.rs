pub mod accessor;
pub mod cache;
pub mod ranking;
pub mod service;

pub use accessor::StoryRepositoryAccessor;
pub use cache::FeedCache;
pub use ranking::{paginate, sort_and_filter, Page, SortMode};
pub use service::{FeedService, FeedSnapshot};
