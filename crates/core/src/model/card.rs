use serde::Deserialize;

use crate::model::ids::MediaId;

/// A single reading card: a display title plus a playable media reference.
///
/// Cards are immutable value data; the deserialize shape matches the static
/// card data file (`youtubeId` carries the media id, the routing slug `id`
/// is ignored here).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub title: String,
    #[serde(rename = "youtubeId")]
    pub media_id: MediaId,
    pub start_seconds: u32,
}

impl Card {
    #[must_use]
    pub fn new(title: impl Into<String>, media_id: MediaId, start_seconds: u32) -> Self {
        Self {
            title: title.into(),
            media_id,
            start_seconds,
        }
    }
}
