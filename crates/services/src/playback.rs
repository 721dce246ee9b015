//! Bridge between the session controller and the embedded media widget.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use yomiage_core::model::{Card, MediaId};

use crate::error::PlaybackError;

//
// ─── WIDGET CONTRACT ───────────────────────────────────────────────────────────
//

/// Playback state as reported by the embedded widget's state callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Unstarted,
    Playing,
    Paused,
    Buffering,
    Ended,
    Cued,
}

impl PlaybackState {
    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Commands the session controller can issue downstream.
///
/// Implementations translate these into the host player's API. Methods take
/// `&self`; implementations own whatever interior state they need.
pub trait PlaybackWidget: Send + Sync {
    /// Load the given media and begin playback at `start_seconds`.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError` when the widget cannot take the load; the
    /// caller treats this as retryable.
    fn load(&self, media_id: &MediaId, start_seconds: u32) -> Result<(), PlaybackError>;

    /// Stop any active playback. Stopping an idle widget is fine.
    fn stop(&self);
}

//
// ─── BRIDGE ────────────────────────────────────────────────────────────────────
//

/// Tracks the widget's observed signals and issues controller intents to it.
///
/// Two signals matter upstream: whether the media engine has reported ready
/// at least once (gates arming), and whether the most recent state callback
/// reported active playback (gates the next-card and complete controls).
pub struct PlayerBridge {
    widget: Arc<dyn PlaybackWidget>,
    ready: bool,
    last_state: Option<PlaybackState>,
}

impl PlayerBridge {
    #[must_use]
    pub fn new(widget: Arc<dyn PlaybackWidget>) -> Self {
        Self {
            widget,
            ready: false,
            last_state: None,
        }
    }

    /// The widget reported its media engine as initialized.
    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    /// Record the most recent playback-state callback.
    pub fn note_state(&mut self, state: PlaybackState) {
        self.last_state = Some(state);
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// True while the most recent state callback reported active playback.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.last_state.is_some_and(PlaybackState::is_playing)
    }

    /// Issue a load for `card`. Intro mode ignores the configured start
    /// offset and plays from the top.
    ///
    /// Returns false when the widget rejected the load; the failure is
    /// logged and the caller retries later.
    pub fn load_card(&mut self, card: &Card, intro_mode: bool) -> bool {
        let start = if intro_mode { 0 } else { card.start_seconds };
        match self.widget.load(&card.media_id, start) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("widget rejected load of {}: {err}", card.media_id);
                false
            }
        }
    }

    /// Stop any active playback.
    pub fn stop(&mut self) {
        self.widget.stop();
    }
}

//
// ─── RECORDING WIDGET ──────────────────────────────────────────────────────────
//

/// Command captured by [`RecordingWidget`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetCommand {
    Load {
        media_id: MediaId,
        start_seconds: u32,
    },
    Stop,
}

/// Widget double that records issued commands; for tests and prototyping.
#[derive(Default)]
pub struct RecordingWidget {
    commands: Mutex<Vec<WidgetCommand>>,
    fail_loads: AtomicBool,
}

impl RecordingWidget {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `load` fail until switched back.
    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::Relaxed);
    }

    /// Snapshot of every command issued so far, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<WidgetCommand> {
        self.commands.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// The most recent command, if any.
    #[must_use]
    pub fn last_command(&self) -> Option<WidgetCommand> {
        self.commands().last().cloned()
    }

    fn record(&self, command: WidgetCommand) {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(command);
        }
    }
}

impl PlaybackWidget for RecordingWidget {
    fn load(&self, media_id: &MediaId, start_seconds: u32) -> Result<(), PlaybackError> {
        if self.fail_loads.load(Ordering::Relaxed) {
            return Err(PlaybackError::Unavailable);
        }
        self.record(WidgetCommand::Load {
            media_id: media_id.clone(),
            start_seconds,
        });
        Ok(())
    }

    fn stop(&self) {
        self.record(WidgetCommand::Stop);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, start: u32) -> Card {
        Card::new("title", MediaId::new(id), start)
    }

    #[test]
    fn bridge_starts_not_ready_and_not_playing() {
        let bridge = PlayerBridge::new(Arc::new(RecordingWidget::new()));
        assert!(!bridge.is_ready());
        assert!(!bridge.is_playing());
    }

    #[test]
    fn bridge_tracks_most_recent_state_only() {
        let mut bridge = PlayerBridge::new(Arc::new(RecordingWidget::new()));
        bridge.note_state(PlaybackState::Playing);
        assert!(bridge.is_playing());

        bridge.note_state(PlaybackState::Paused);
        assert!(!bridge.is_playing());
    }

    #[test]
    fn load_uses_configured_offset() {
        let widget = Arc::new(RecordingWidget::new());
        let mut bridge = PlayerBridge::new(widget.clone());

        assert!(bridge.load_card(&card("v1", 42), false));
        assert_eq!(
            widget.last_command(),
            Some(WidgetCommand::Load {
                media_id: MediaId::new("v1"),
                start_seconds: 42,
            })
        );
    }

    #[test]
    fn intro_mode_loads_from_the_top() {
        let widget = Arc::new(RecordingWidget::new());
        let mut bridge = PlayerBridge::new(widget.clone());

        assert!(bridge.load_card(&card("v1", 42), true));
        assert_eq!(
            widget.last_command(),
            Some(WidgetCommand::Load {
                media_id: MediaId::new("v1"),
                start_seconds: 0,
            })
        );
    }

    #[test]
    fn failed_load_is_reported_not_recorded() {
        let widget = Arc::new(RecordingWidget::new());
        widget.set_fail_loads(true);
        let mut bridge = PlayerBridge::new(widget.clone());

        assert!(!bridge.load_card(&card("v1", 42), false));
        assert!(widget.commands().is_empty());
    }
}
