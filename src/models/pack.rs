use serde::{Deserialize, Serialize};

use super::card::Card;

/// One generated pack: its cards in reveal order, the owning set, and the
/// creation time in milliseconds since the Unix epoch.
///
/// A pack is never edited after generation. Opening another pack produces a
/// new `PackResult`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackResult {
    pub cards: Vec<Card>,
    pub set_id: String,
    pub timestamp: u64,
}

impl PackResult {
    pub fn new(cards: Vec<Card>, set_id: impl Into<String>, timestamp: u64) -> Self {
        Self {
            cards,
            set_id: set_id.into(),
            timestamp,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The last card, which the sort order guarantees is the rarest.
    pub fn best_card(&self) -> Option<&Card> {
        self.cards.last()
    }
}
