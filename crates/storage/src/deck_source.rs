use std::fs;
use std::path::Path;
use thiserror::Error;

use yomiage_core::model::{Card, Deck, DeckError};

/// Errors from loading a deck out of the static card data file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeckSourceError {
    #[error("failed to read deck file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse deck data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// Parse a deck from the card data file contents (a JSON array of cards).
///
/// # Errors
///
/// Returns `DeckSourceError` on malformed JSON or duplicate media ids.
pub fn deck_from_json(raw: &str) -> Result<Deck, DeckSourceError> {
    let cards: Vec<Card> = serde_json::from_str(raw)?;
    Ok(Deck::new(cards)?)
}

/// Read and parse a deck from `path`.
///
/// # Errors
///
/// Returns `DeckSourceError` if the file cannot be read or parsed.
pub fn deck_from_path(path: &Path) -> Result<Deck, DeckSourceError> {
    deck_from_json(&fs::read_to_string(path)?)
}
