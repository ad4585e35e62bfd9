//! End-of-pack summaries: rarity tally and pull value.

use serde::Serialize;

use crate::models::{Card, Rarity};

/// Number of cards per rarity, in canonical rarity order, zeros omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RarityTally(pub Vec<(Rarity, usize)>);

impl RarityTally {
    /// Tally `cards` by rarity.
    pub fn from_cards(cards: &[Card]) -> Self {
        let counts = Rarity::ALL
            .iter()
            .map(|&rarity| (rarity, cards.iter().filter(|c| c.rarity == rarity).count()))
            .filter(|(_, count)| *count > 0)
            .collect();
        Self(counts)
    }

    /// Cards of `rarity`, zero if none were pulled.
    pub fn count(&self, rarity: Rarity) -> usize {
        self.0
            .iter()
            .find(|(r, _)| *r == rarity)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedCard {
    pub id: String,
    pub name: String,
    pub market_price: f64,
}

/// Market value of a pack's pulls against what the pack cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBreakdown {
    /// Priced cards, most valuable first.
    pub priced: Vec<PricedCard>,
    pub unpriced: usize,
    pub pull_value: f64,
    pub pack_price: Option<f64>,
}

impl PriceBreakdown {
    /// Value `cards` at their market prices. Cards without a price are
    /// counted in `unpriced` and add nothing to the pull value.
    pub fn from_cards(cards: &[Card], pack_price: Option<f64>) -> Self {
        let mut priced: Vec<PricedCard> = cards
            .iter()
            .filter_map(|card| {
                card.market_price.map(|market_price| PricedCard {
                    id: card.id.clone(),
                    name: card.name.clone(),
                    market_price,
                })
            })
            .collect();
        priced.sort_by(|a, b| b.market_price.total_cmp(&a.market_price));

        let pull_value = priced.iter().map(|c| c.market_price).sum();
        Self {
            unpriced: cards.len() - priced.len(),
            priced,
            pull_value,
            pack_price,
        }
    }

    /// Pull value minus pack price; `None` when the pack price is unknown.
    pub fn profit(&self) -> Option<f64> {
        self.pack_price.map(|price| self.pull_value - price)
    }

    /// Whether the pulls are worth at least the pack price.
    pub fn is_profit(&self) -> Option<bool> {
        self.profit().map(|p| p >= 0.0)
    }
}
