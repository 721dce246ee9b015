use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;

use yomiage_core::model::{Card, Deck, Playlist, PlaylistItem};

/// Number of trailing playlist positions eligible for decoy insertion.
pub const DEFAULT_LOOKBACK: usize = 3;

/// Decks below this size never receive decoys; the late-game surprise needs
/// enough real cards ahead of it to stay meaningful.
const MIN_DECK_FOR_FAKES: usize = 4;

/// Chance of inserting a decoy at each eligible walk position.
const FAKE_PROBABILITY: f64 = 0.5;

/// Returns a uniform random permutation of `cards`. The input is untouched;
/// an empty input yields an empty output.
#[must_use]
pub fn shuffle_cards<R: Rng + ?Sized>(cards: &[Card], rng: &mut R) -> Vec<Card> {
    let mut shuffled = cards.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// Builds a session playlist: the shuffled deck, optionally salted with
/// decoy cards near the end.
pub struct PlaylistBuilder<'a> {
    deck: &'a Deck,
    fake_cards: bool,
    lookback: usize,
}

impl<'a> PlaylistBuilder<'a> {
    #[must_use]
    pub fn new(deck: &'a Deck) -> Self {
        Self {
            deck,
            fake_cards: false,
            lookback: DEFAULT_LOOKBACK,
        }
    }

    /// Enable or disable decoy injection.
    #[must_use]
    pub fn with_fake_cards(mut self, enabled: bool) -> Self {
        self.fake_cards = enabled;
        self
    }

    /// Override how many trailing positions are eligible for decoys.
    #[must_use]
    pub fn with_lookback(mut self, lookback: usize) -> Self {
        self.lookback = lookback;
        self
    }

    /// Build with the thread RNG.
    #[must_use]
    pub fn build(self) -> Playlist {
        let mut rng = rng();
        self.build_with_rng(&mut rng)
    }

    /// Build with a caller-supplied RNG, for deterministic tests.
    #[must_use]
    pub fn build_with_rng<R: Rng + ?Sized>(self, rng: &mut R) -> Playlist {
        let mut items: Vec<PlaylistItem> = shuffle_cards(self.deck.cards(), rng)
            .into_iter()
            .map(PlaylistItem::real)
            .collect();
        if self.fake_cards {
            inject_fakes(&mut items, self.lookback, rng);
        }
        Playlist::new(items)
    }
}

/// Walk the growing playlist and, within the trailing `lookback` region,
/// insert decoy clones of earlier entries with independent probability 1/2.
///
/// Insertion shifts the remainder right and lengthens the walk, so an entry
/// pushed back by a decoy is examined again and chains of decoys can form.
fn inject_fakes<R: Rng + ?Sized>(items: &mut Vec<PlaylistItem>, lookback: usize, rng: &mut R) {
    if items.len() < MIN_DECK_FOR_FAKES {
        return;
    }
    let late_start = items.len().saturating_sub(lookback);
    // a decoy needs at least one earlier entry to clone
    let mut i = late_start.max(1);
    while i < items.len() {
        if rng.random_bool(FAKE_PROBABILITY) {
            let source = rng.random_range(0..i);
            let fake = PlaylistItem::decoy_of(&items[source].card);
            items.insert(i, fake);
        }
        i += 1;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
