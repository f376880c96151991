pub mod feed;
pub mod follow;
pub mod profile;
pub mod record;
pub mod story;

pub use feed::FeedEntry;
pub use profile::{Profile, ProfileSummary};
pub use story::{Story, StoryFilter};
