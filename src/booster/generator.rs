//! Booster pack generator.
//!
//! Fills a pack from a set's card pool using the slot template in
//! [`PackConfig`]: guaranteed slots draw from a fixed rarity, variable slots
//! roll their rarity from a weighted table. Cards are drawn uniformly with
//! replacement, so duplicates within a pack are expected.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::seq::SliceRandom;
use rand::Rng;

use super::sampler::CumulativeSampler;
use crate::config::PackConfig;
use crate::error::{PackError, Result};
use crate::models::{Card, PackResult, Rarity};

/// Rarities tried, in order, when a variable slot's rolled rarity has no cards.
const FALLBACK_CHAIN: [Rarity; 2] = [Rarity::Common, Rarity::Uncommon];

/// Outcome of a variable-slot roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableTarget {
    Tier(Rarity),
    /// Common or Uncommon with equal odds.
    Filler,
}

/// Generates packs from a card pool according to a [`PackConfig`].
#[derive(Debug, Clone)]
pub struct PackGenerator {
    config: PackConfig,
    sampler: CumulativeSampler<VariableTarget>,
}

impl PackGenerator {
    /// Create a generator, rejecting configurations whose slots or odds
    /// don't add up.
    pub fn new(config: PackConfig) -> Result<Self> {
        config.validate()?;

        let mut tiers = config.variable_weights.tiers.clone();
        // rarest first
        tiers.sort_by(|a, b| b.0.cmp(&a.0));
        let sampler = CumulativeSampler::new(
            tiers
                .into_iter()
                .map(|(rarity, weight)| (VariableTarget::Tier(rarity), weight))
                .chain(std::iter::once((
                    VariableTarget::Filler,
                    config.variable_weights.filler,
                ))),
        );

        Ok(Self { config, sampler })
    }

    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    /// Generate the cards for one pack, sorted so the rarest card is last.
    ///
    /// Slots whose rarity has no cards (after the fallback chain, for variable
    /// slots) are skipped, so the pack can come up short. An empty pool yields
    /// an empty pack.
    pub fn generate<R: Rng + ?Sized>(&self, pool: &[Card], rng: &mut R) -> Vec<Card> {
        if pool.is_empty() {
            return Vec::new();
        }

        let by_rarity = partition(pool);
        let mut pack: Vec<Card> = Vec::with_capacity(self.config.pack_size);

        // 1. Guaranteed slots
        for &(rarity, count) in &self.config.guaranteed {
            for _ in 0..count {
                match draw(&by_rarity, rarity, rng) {
                    Some(card) => pack.push(card),
                    None => tracing::debug!(%rarity, "no cards for guaranteed slot, skipping"),
                }
            }
        }

        // 2. Variable slots
        for _ in 0..self.config.variable_slots {
            let rolled = self.roll_variable_slot(rng);
            let card = draw(&by_rarity, rolled, rng).or_else(|| {
                tracing::debug!(rarity = %rolled, "no cards for rolled rarity, falling back");
                FALLBACK_CHAIN
                    .iter()
                    .find_map(|&fallback| draw(&by_rarity, fallback, rng))
            });
            match card {
                Some(card) => pack.push(card),
                None => tracing::debug!("no fallback cards for variable slot, skipping"),
            }
        }

        // 3. Best card last; stable so equal rarities keep fill order
        pack.sort_by_key(|card| card.rarity.rank());
        pack
    }

    /// Roll the target rarity for one variable slot.
    pub fn roll_variable_slot<R: Rng + ?Sized>(&self, rng: &mut R) -> Rarity {
        match self.sampler.sample(rng) {
            Some(VariableTarget::Tier(rarity)) => *rarity,
            Some(VariableTarget::Filler) | None => {
                if rng.gen_bool(0.5) {
                    Rarity::Common
                } else {
                    Rarity::Uncommon
                }
            }
        }
    }

    /// Generate a timestamped pack for `set_id`.
    ///
    /// Returns [`PackError::DataUnavailable`] if the pool is empty.
    pub fn open_pack<R: Rng + ?Sized>(
        &self,
        set_id: &str,
        pool: &[Card],
        rng: &mut R,
    ) -> Result<PackResult> {
        if pool.is_empty() {
            return Err(PackError::DataUnavailable {
                set_id: set_id.to_string(),
                reason: "card pool is empty".into(),
            });
        }

        let cards = self.generate(pool, rng);
        if cards.len() < self.config.pack_size {
            tracing::warn!(
                set_id,
                len = cards.len(),
                expected = self.config.pack_size,
                "pool is missing rarities, pack came up short"
            );
        }
        tracing::info!(set_id, len = cards.len(), "generated pack");

        Ok(PackResult::new(cards, set_id, now_millis()))
    }

    /// Open a box containing `packs` booster packs.
    pub fn open_box<R: Rng + ?Sized>(
        &self,
        set_id: &str,
        pool: &[Card],
        packs: usize,
        rng: &mut R,
    ) -> Result<Vec<PackResult>> {
        let mut box_contents = Vec::with_capacity(packs);
        for _ in 0..packs {
            box_contents.push(self.open_pack(set_id, pool, rng)?);
        }
        Ok(box_contents)
    }
}

// ---------------------------------------------------------------------------
// Free-standing helpers
// ---------------------------------------------------------------------------

fn partition(pool: &[Card]) -> BTreeMap<Rarity, Vec<&Card>> {
    let mut by_rarity: BTreeMap<Rarity, Vec<&Card>> = BTreeMap::new();
    for card in pool {
        by_rarity.entry(card.rarity).or_default().push(card);
    }
    by_rarity
}

/// Uniform pick with replacement from one rarity's sub-pool.
fn draw<R: Rng + ?Sized>(
    by_rarity: &BTreeMap<Rarity, Vec<&Card>>,
    rarity: Rarity,
    rng: &mut R,
) -> Option<Card> {
    by_rarity
        .get(&rarity)
        .and_then(|cards| cards.choose(rng))
        .map(|card| (*card).clone())
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
