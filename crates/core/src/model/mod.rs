mod card;
mod deck;
mod ids;
mod playlist;

pub use card::Card;
pub use deck::{Deck, DeckError};
pub use ids::MediaId;
pub use playlist::{Playlist, PlaylistItem};
