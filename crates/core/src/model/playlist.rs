use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::ids::MediaId;

//
// ─── PLAYLIST ITEM ─────────────────────────────────────────────────────────────
//

/// One entry of a session playlist.
///
/// A decoy replays another entry's media: indistinguishable during playback,
/// but excluded from progress counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistItem {
    pub card: Card,
    pub is_decoy: bool,
}

impl PlaylistItem {
    #[must_use]
    pub fn real(card: Card) -> Self {
        Self {
            card,
            is_decoy: false,
        }
    }

    /// Clone `card` into a decoy entry.
    #[must_use]
    pub fn decoy_of(card: &Card) -> Self {
        Self {
            card: card.clone(),
            is_decoy: true,
        }
    }
}

//
// ─── PLAYLIST ──────────────────────────────────────────────────────────────────
//

/// Session-specific ordered sequence of cards derived from a deck, possibly
/// salted with decoys. Never shorter than the deck it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Playlist {
    items: Vec<PlaylistItem>,
}

impl Playlist {
    #[must_use]
    pub fn new(items: Vec<PlaylistItem>) -> Self {
        Self { items }
    }

    /// Rebuild a playlist from persisted `(media id, decoy flag)` entries.
    ///
    /// Entries whose id no longer resolves against `deck` are dropped; the
    /// caller decides whether what remains is still usable.
    #[must_use]
    pub fn resolve(deck: &Deck, entries: &[(MediaId, bool)]) -> Self {
        let items = entries
            .iter()
            .filter_map(|(id, is_decoy)| {
                deck.find(id).map(|card| PlaylistItem {
                    card: card.clone(),
                    is_decoy: *is_decoy,
                })
            })
            .collect();
        Self { items }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PlaylistItem> {
        self.items.get(index)
    }

    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.items.len().checked_sub(1)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlaylistItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn items(&self) -> &[PlaylistItem] {
        &self.items
    }

    /// Total real cards in the round — the progress denominator. Decoys are
    /// excluded.
    #[must_use]
    pub fn card_total(&self) -> usize {
        self.items.iter().filter(|item| !item.is_decoy).count()
    }

    /// Real cards consumed once the cursor sits at `position` (inclusive).
    #[must_use]
    pub fn read_count_at(&self, position: usize) -> usize {
        self.items
            .iter()
            .take(position.saturating_add(1))
            .filter(|item| !item.is_decoy)
            .count()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str) -> Card {
        Card::new(format!("Card {id}"), MediaId::new(id), 5)
    }

    fn deck() -> Deck {
        Deck::new(vec![card("a"), card("b"), card("c")]).unwrap()
    }

    #[test]
    fn counts_exclude_decoys() {
        let playlist = Playlist::new(vec![
            PlaylistItem::real(card("a")),
            PlaylistItem::decoy_of(&card("a")),
            PlaylistItem::real(card("b")),
            PlaylistItem::real(card("c")),
        ]);

        assert_eq!(playlist.len(), 4);
        assert_eq!(playlist.card_total(), 3);
        assert_eq!(playlist.read_count_at(0), 1);
        assert_eq!(playlist.read_count_at(1), 1);
        assert_eq!(playlist.read_count_at(2), 2);
        assert_eq!(playlist.read_count_at(3), 3);
        // position past the end clamps to the full count
        assert_eq!(playlist.read_count_at(10), 3);
    }

    #[test]
    fn resolve_drops_stale_entries() {
        let entries = vec![
            (MediaId::new("a"), false),
            (MediaId::new("gone"), false),
            (MediaId::new("b"), true),
        ];

        let playlist = Playlist::resolve(&deck(), &entries);
        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.get(0).unwrap().card.media_id, MediaId::new("a"));
        assert!(playlist.get(1).unwrap().is_decoy);
    }

    #[test]
    fn resolve_of_all_stale_entries_is_empty() {
        let entries = vec![(MediaId::new("x"), false), (MediaId::new("y"), false)];
        assert!(Playlist::resolve(&deck(), &entries).is_empty());
    }

    #[test]
    fn last_index_of_empty_playlist_is_none() {
        assert_eq!(Playlist::default().last_index(), None);
    }
}
