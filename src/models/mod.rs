pub mod activity;
pub mod watch;

pub use activity::{ActivityRecord, PlayVideoMetadata, TrackRequest, PLAY_VIDEO_EVENT};
pub use watch::WatchEvent;
