use std::sync::Arc;

use storage::{PlaylistItemRecord, SessionRecord, SessionStore};
use yomiage_core::model::{Card, Deck, MediaId, Playlist};

use super::plan::PlaylistBuilder;
use super::progress::SessionProgress;
use crate::playback::{PlaybackState, PlaybackWidget, PlayerBridge};

//
// ─── PLAY PHASE ────────────────────────────────────────────────────────────────
//

/// Playback sub-state of the currently selected card.
///
/// Replaces the awaiting-play / is-playing boolean pair; these three
/// variants are the only combinations that can actually occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayPhase {
    /// A card is selected but the user has not armed playback yet.
    AwaitingArm,
    /// A load was issued; the widget has not reported active playback.
    Armed,
    /// The widget's most recent state callback reported active playback.
    Playing,
}

//
// ─── EVENTS ────────────────────────────────────────────────────────────────────
//

/// Inputs the hosting event loop can feed into the session state machine.
///
/// User intents and widget callbacks alike; the host serializes delivery,
/// so no two events are ever in flight at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Advance,
    Retreat,
    Arm,
    Reset,
    StoreChanged { key: String },
    PlayerReady,
    PlaybackStateChanged(PlaybackState),
    PlaybackError,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Session state machine for one reading round.
///
/// Owns the shuffled playlist and cursor, persists both through the session
/// store on every move, and mediates between user intents and the playback
/// widget. Restores a persisted round on start and adopts rounds written by
/// other execution contexts; the externally observed value always wins.
pub struct ReadingSession {
    deck: Deck,
    store: SessionStore,
    bridge: PlayerBridge,
    playlist: Playlist,
    position: usize,
    phase: PlayPhase,
}

impl ReadingSession {
    /// Start a session: restore the persisted round when it still resolves
    /// against `deck`, otherwise shuffle a fresh one.
    ///
    /// An empty deck yields an uninitialized session with every control
    /// disabled; any persisted round is cleared.
    #[must_use]
    pub fn start(deck: Deck, store: SessionStore, widget: Arc<dyn PlaybackWidget>) -> Self {
        let mut session = Self {
            deck,
            store,
            bridge: PlayerBridge::new(widget),
            playlist: Playlist::default(),
            position: 0,
            phase: PlayPhase::AwaitingArm,
        };

        if session.deck.is_empty() {
            if let Err(err) = session.store.clear_session() {
                log::warn!("could not clear session for empty deck: {err}");
            }
            return session;
        }

        if !session.try_restore() {
            session.fresh_shuffle();
        }
        session
    }

    //
    // ─── USER INTENTS ──────────────────────────────────────────────────────────
    //

    /// Move to the next card. No-op at the last card; completion hands
    /// over to [`Self::reset`] instead. Returns true when the cursor moved.
    pub fn advance(&mut self) -> bool {
        if !self.is_initialized() || self.is_at_last_card() {
            return false;
        }
        self.bridge.stop();
        self.position += 1;
        self.phase = PlayPhase::AwaitingArm;
        self.persist();
        true
    }

    /// Move back to the previous card. No-op at the first card.
    pub fn retreat(&mut self) -> bool {
        if !self.is_initialized() || self.position == 0 {
            return false;
        }
        self.bridge.stop();
        self.position -= 1;
        self.phase = PlayPhase::AwaitingArm;
        self.persist();
        true
    }

    /// Arm playback of the awaiting card: load it into the widget.
    ///
    /// Rejected (returns false) until the widget has reported ready, and
    /// whenever no card is awaiting playback — the UI keeps the control
    /// disabled in those states, this is not an error. A widget load
    /// failure keeps the card awaiting so the user can retry.
    pub fn arm(&mut self) -> bool {
        if self.phase != PlayPhase::AwaitingArm || !self.bridge.is_ready() {
            return false;
        }
        let Some(card) = self.playlist.get(self.position).map(|item| item.card.clone()) else {
            return false;
        };
        let intro_mode = self.store.intro_mode();
        if self.bridge.load_card(&card, intro_mode) {
            self.phase = PlayPhase::Armed;
            true
        } else {
            false
        }
    }

    /// Discard the current round and shuffle a new one.
    ///
    /// Also the handler for the externally broadcast reset signal; ignores
    /// whatever is persisted.
    pub fn reset(&mut self) {
        self.bridge.stop();
        if let Err(err) = self.store.clear_session() {
            log::warn!("could not clear persisted session: {err}");
        }
        if self.deck.is_empty() {
            return;
        }
        self.fresh_shuffle();
    }

    //
    // ─── EXTERNAL NOTIFICATIONS ────────────────────────────────────────────────
    //

    /// React to a store change made by another execution context.
    ///
    /// Changes to foreign keys are ignored. For the session key the stored
    /// value is authoritative: when it differs from in-memory state it is
    /// adopted wholesale, local playback stops, and the adopted card awaits
    /// arming. Returns true when state was adopted.
    pub fn handle_store_change(&mut self, key: &str) -> bool {
        if key != self.store.session_key() || self.deck.is_empty() {
            return false;
        }
        let resolved = match self.store.load_session() {
            Ok(Some(record)) => self.resolve_record(&record),
            Ok(None) => None,
            Err(err) => {
                log::warn!("could not read session after store change: {err}");
                return false;
            }
        };
        match resolved {
            Some((playlist, position)) => {
                if playlist == self.playlist && position == self.position {
                    return false;
                }
                self.bridge.stop();
                self.playlist = playlist;
                self.position = position;
                self.phase = PlayPhase::AwaitingArm;
                true
            }
            None => {
                // the other context cleared or corrupted the round
                self.bridge.stop();
                self.fresh_shuffle();
                true
            }
        }
    }

    /// The widget finished initializing its media engine.
    pub fn handle_player_ready(&mut self) {
        self.bridge.mark_ready();
    }

    /// The widget reported a playback state change.
    pub fn handle_playback_state(&mut self, state: PlaybackState) {
        self.bridge.note_state(state);
        match self.phase {
            PlayPhase::Armed if state.is_playing() => self.phase = PlayPhase::Playing,
            PlayPhase::Playing if !state.is_playing() => self.phase = PlayPhase::Armed,
            _ => {}
        }
    }

    /// The widget reported a playback error. The card returns to awaiting
    /// so the user can retry arming it; never escalated.
    pub fn handle_playback_error(&mut self) {
        log::warn!("widget reported a playback error; card stays awaiting");
        self.bridge.note_state(PlaybackState::Unstarted);
        self.phase = PlayPhase::AwaitingArm;
    }

    /// Feed one event into the state machine.
    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Advance => {
                self.advance();
            }
            SessionEvent::Retreat => {
                self.retreat();
            }
            SessionEvent::Arm => {
                self.arm();
            }
            SessionEvent::Reset => self.reset(),
            SessionEvent::StoreChanged { key } => {
                self.handle_store_change(&key);
            }
            SessionEvent::PlayerReady => self.handle_player_ready(),
            SessionEvent::PlaybackStateChanged(state) => self.handle_playback_state(state),
            SessionEvent::PlaybackError => self.handle_playback_error(),
        }
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    /// False only when the deck was empty; every control stays disabled.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        !self.playlist.is_empty()
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        self.playlist.get(self.position).map(|item| &item.card)
    }

    #[must_use]
    pub fn phase(&self) -> PlayPhase {
        self.phase
    }

    #[must_use]
    pub fn is_awaiting_play(&self) -> bool {
        self.is_initialized() && self.phase == PlayPhase::AwaitingArm
    }

    #[must_use]
    pub fn is_at_last_card(&self) -> bool {
        self.playlist.last_index() == Some(self.position)
    }

    /// UI gate for the next-card control: enabled only while the most
    /// recent widget callback reported active playback, so a card that was
    /// never played cannot be skipped.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.is_initialized() && !self.is_at_last_card() && self.bridge.is_playing()
    }

    #[must_use]
    pub fn can_retreat(&self) -> bool {
        self.is_initialized() && self.position > 0
    }

    /// UI gate for the round-complete control: the final card must actually
    /// be playing, not merely loaded.
    #[must_use]
    pub fn can_complete(&self) -> bool {
        self.is_at_last_card() && self.bridge.is_playing()
    }

    /// Returns a summary of the current reading progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            read_count: if self.is_initialized() {
                self.playlist.read_count_at(self.position)
            } else {
                0
            },
            total: self.playlist.card_total(),
            is_complete: self.can_complete(),
        }
    }

    //
    // ─── INTERNAL ──────────────────────────────────────────────────────────────
    //

    // restore the persisted round; true when adopted.
    fn try_restore(&mut self) -> bool {
        let record = match self.store.load_session() {
            Ok(Some(record)) => record,
            Ok(None) => return false,
            Err(err) => {
                log::warn!("could not read persisted session: {err}");
                return false;
            }
        };
        let Some((playlist, position)) = self.resolve_record(&record) else {
            return false;
        };

        let dropped = playlist.len() < record.shuffled_playlist_items.len();
        self.playlist = playlist;
        self.position = position;
        self.phase = PlayPhase::AwaitingArm;
        if dropped {
            log::info!("dropped stale entries while restoring the session");
            self.persist();
        }
        true
    }

    /// Resolve a persisted record against the deck. Stale ids are dropped;
    /// the record is unusable when nothing resolves or the cursor is out of
    /// range of what remains.
    fn resolve_record(&self, record: &SessionRecord) -> Option<(Playlist, usize)> {
        let entries: Vec<(MediaId, bool)> = record
            .shuffled_playlist_items
            .iter()
            .map(|item| (MediaId::new(item.media_id.clone()), item.is_fake))
            .collect();
        let playlist = Playlist::resolve(&self.deck, &entries);
        if playlist.is_empty() {
            return None;
        }
        let position = usize::try_from(record.current_index).ok()?;
        if position >= playlist.len() {
            return None;
        }
        Some((playlist, position))
    }

    fn fresh_shuffle(&mut self) {
        self.playlist = PlaylistBuilder::new(&self.deck)
            .with_fake_cards(self.store.fake_mode())
            .build();
        self.position = 0;
        self.phase = PlayPhase::AwaitingArm;
        self.persist();
    }

    fn persist(&mut self) {
        let record = self.to_record();
        if let Err(err) = self.store.save_session(&record) {
            log::warn!("could not persist session state: {err}");
        }
    }

    fn to_record(&self) -> SessionRecord {
        SessionRecord {
            shuffled_playlist_items: self
                .playlist
                .iter()
                .map(|item| PlaylistItemRecord {
                    media_id: item.card.media_id.as_str().to_owned(),
                    is_fake: item.is_decoy,
                })
                .collect(),
            current_index: i64::try_from(self.position).unwrap_or(i64::MAX),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
