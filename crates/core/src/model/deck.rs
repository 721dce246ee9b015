use std::collections::HashSet;
use thiserror::Error;

use crate::model::card::Card;
use crate::model::ids::MediaId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("duplicate media id in deck: {0}")]
    DuplicateMediaId(MediaId),
}

//
// ─── DECK ──────────────────────────────────────────────────────────────────────
//

/// The full source collection of cards for a session.
///
/// Supplied once at session start and read-only afterwards. Card identity is
/// the media id, so duplicates are rejected at construction. An empty deck is
/// legal; it surfaces as a "no data" display state downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Build a deck from its source cards.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::DuplicateMediaId` when two cards share a media id.
    pub fn new(cards: Vec<Card>) -> Result<Self, DeckError> {
        let mut seen = HashSet::new();
        for card in &cards {
            if !seen.insert(card.media_id.clone()) {
                return Err(DeckError::DuplicateMediaId(card.media_id.clone()));
            }
        }
        Ok(Self { cards })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Look up a card by its media id.
    #[must_use]
    pub fn find(&self, id: &MediaId) -> Option<&Card> {
        self.cards.iter().find(|card| &card.media_id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &MediaId) -> bool {
        self.find(id).is_some()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
