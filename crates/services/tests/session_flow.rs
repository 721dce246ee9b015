use std::sync::Arc;

use services::{PlaybackState, ReadingSession, RecordingWidget, SessionEvent, WidgetCommand};
use storage::{MemoryStore, SessionStore, deck_from_json};
use yomiage_core::model::Deck;

const CARD_DATA: &str = r#"[
    {"id": "one",   "title": "First",  "youtubeId": "vid-1", "startSeconds": 30},
    {"id": "two",   "title": "Second", "youtubeId": "vid-2", "startSeconds": 0},
    {"id": "three", "title": "Third",  "youtubeId": "vid-3", "startSeconds": 95},
    {"id": "four",  "title": "Fourth", "youtubeId": "vid-4", "startSeconds": 12},
    {"id": "five",  "title": "Fifth",  "youtubeId": "vid-5", "startSeconds": 7}
]"#;

fn deck() -> Deck {
    deck_from_json(CARD_DATA).unwrap()
}

fn start(raw: &MemoryStore) -> (ReadingSession, Arc<RecordingWidget>) {
    let widget = Arc::new(RecordingWidget::new());
    let session = ReadingSession::start(
        deck(),
        SessionStore::new(Arc::new(raw.clone())),
        widget.clone(),
    );
    (session, widget)
}

fn play_current(session: &mut ReadingSession) {
    session.handle_player_ready();
    assert!(session.arm());
    session.handle_playback_state(PlaybackState::Playing);
}

#[test]
fn full_round_reads_every_card_then_completes() {
    let raw = MemoryStore::new();
    let (mut session, widget) = start(&raw);

    assert_eq!(session.progress().total, 5);

    for step in 0..5 {
        play_current(&mut session);
        assert_eq!(session.progress().read_count, step + 1);
        if step < 4 {
            assert!(session.can_advance());
            assert!(session.advance());
        }
    }

    assert!(session.is_at_last_card());
    assert!(!session.advance(), "advance past the end must be a no-op");
    assert!(session.can_complete());

    // every card was loaded exactly once, at its configured offset
    let loads: Vec<WidgetCommand> = widget
        .commands()
        .into_iter()
        .filter(|command| matches!(command, WidgetCommand::Load { .. }))
        .collect();
    assert_eq!(loads.len(), 5);

    session.reset();
    assert_eq!(session.position(), 0);
    assert_eq!(session.progress().read_count, 1);
    assert!(!session.can_complete());
}

#[test]
fn reload_resumes_where_the_round_left_off() {
    let raw = MemoryStore::new();
    let (mut session, _) = start(&raw);

    play_current(&mut session);
    session.advance();
    play_current(&mut session);
    session.advance();
    let title = session.current_card().unwrap().title.clone();
    drop(session);

    let (resumed, widget) = start(&raw);
    assert_eq!(resumed.position(), 2);
    assert_eq!(resumed.current_card().unwrap().title, title);
    assert!(resumed.is_awaiting_play());
    assert!(widget.commands().is_empty(), "a reload never autoplays");
}

#[test]
fn watcher_relays_one_tabs_moves_to_the_other() {
    let raw = MemoryStore::new();
    let (mut tab1, _) = start(&raw);
    let (mut tab2, tab2_widget) = start(&raw);
    play_current(&mut tab2);

    // subscribe after startup so only tab1's move is pending
    let watcher = raw.watch();
    assert!(tab1.advance());

    while let Some(change) = watcher.try_next() {
        tab2.apply(SessionEvent::StoreChanged { key: change.key });
    }

    assert_eq!(tab2.position(), 1);
    assert!(tab2.is_awaiting_play());
    assert_eq!(tab2_widget.last_command(), Some(WidgetCommand::Stop));
}

#[test]
fn broadcast_reset_discards_both_tabs_progress() {
    let raw = MemoryStore::new();
    let (mut tab1, _) = start(&raw);
    let (mut tab2, _) = start(&raw);
    tab1.advance();
    tab2.apply(SessionEvent::StoreChanged {
        key: "yomiage.session".to_owned(),
    });
    assert_eq!(tab2.position(), 1);

    // the menu broadcast lands on tab1; tab2 follows through the store
    tab1.apply(SessionEvent::Reset);
    assert_eq!(tab1.position(), 0);
    tab2.apply(SessionEvent::StoreChanged {
        key: "yomiage.session".to_owned(),
    });
    assert_eq!(tab2.position(), 0);
    assert!(tab2.is_awaiting_play());
}

#[test]
fn fake_mode_preference_grows_the_playlist_but_not_the_denominator() {
    let raw = MemoryStore::new();
    let store = SessionStore::new(Arc::new(raw.clone()));
    store.set_fake_mode(true).unwrap();

    let (session, _) = start(&raw);
    let progress = session.progress();
    assert_eq!(progress.total, 5, "decoys never inflate the card count");
    assert!(session.progress().read_count >= 1);

    let record = store.load_session().unwrap().unwrap();
    assert!(record.shuffled_playlist_items.len() >= 5);
    assert_eq!(
        record
            .shuffled_playlist_items
            .iter()
            .filter(|item| !item.is_fake)
            .count(),
        5
    );
}
