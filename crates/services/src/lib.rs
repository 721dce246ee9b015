#![forbid(unsafe_code)]

pub mod error;
pub mod playback;
pub mod sessions;

pub use error::PlaybackError;
pub use playback::{PlaybackState, PlaybackWidget, PlayerBridge, RecordingWidget, WidgetCommand};
pub use sessions::{
    PlayPhase, PlaylistBuilder, ReadingSession, SessionEvent, SessionProgress, shuffle_cards,
};
