mod plan;
mod progress;
mod service;

// Public API of the session subsystem.
pub use plan::{DEFAULT_LOOKBACK, PlaylistBuilder, shuffle_cards};
pub use progress::SessionProgress;
pub use service::{PlayPhase, ReadingSession, SessionEvent};
