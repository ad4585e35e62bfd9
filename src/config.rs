use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PackError, Result};
use crate::models::Rarity;

pub const API_BASE_URL: &str = "https://optcgapi.com/api";

/// Cards per pack in the reference configuration.
pub const PACK_SIZE: usize = 12;

/// How long a cached catalog entry stays fresh.
pub const CACHE_TTL: Duration = Duration::from_secs(3600);

/// Bumped whenever the cached `Card` layout changes.
pub const CACHE_KEY_VERSION: &str = "v2";

/// Retail price of one booster pack in USD, used by the reference config.
pub const REFERENCE_PACK_PRICE: f64 = 3.99;

/// Longest delay accepted for any lifecycle timing.
pub const MAX_TIMING: Duration = Duration::from_secs(60);

const WEIGHT_EPSILON: f64 = 1e-6;

// ---------------------------------------------------------------------------
// PackConfig
// ---------------------------------------------------------------------------

/// Weighted distribution for the variable slots.
///
/// Each tier is checked rarest first against a single uniform roll. Whatever
/// probability mass is left after the tiers goes to `filler`, which picks
/// Common or Uncommon with equal odds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableWeights {
    pub tiers: Vec<(Rarity, f64)>,
    pub filler: f64,
}

impl VariableWeights {
    /// Sum of the tier weights and the filler weight.
    pub fn total(&self) -> f64 {
        self.tiers.iter().map(|(_, w)| w).sum::<f64>() + self.filler
    }
}

/// Slot template and odds for pack generation.
///
/// Changing these values changes pack statistics without touching the
/// generation algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackConfig {
    pub pack_size: usize,
    /// Guaranteed slots in fill order.
    pub guaranteed: Vec<(Rarity, usize)>,
    pub variable_slots: usize,
    pub variable_weights: VariableWeights,
    /// Retail price of one pack, used for the profit/loss summary.
    pub pack_price: Option<f64>,
}

impl PackConfig {
    /// 12 cards: 5 Common, 3 Uncommon, 1 Rare, 1 Leader and 2 variable slots,
    /// priced at [`REFERENCE_PACK_PRICE`].
    pub fn reference() -> Self {
        Self {
            pack_size: PACK_SIZE,
            guaranteed: vec![
                (Rarity::Common, 5),
                (Rarity::Uncommon, 3),
                (Rarity::Rare, 1),
                (Rarity::Leader, 1),
            ],
            variable_slots: 2,
            variable_weights: VariableWeights {
                tiers: vec![
                    (Rarity::SecretRare, 0.02),
                    (Rarity::SuperRare, 0.19),
                    (Rarity::Leader, 0.05),
                    (Rarity::Rare, 0.20),
                ],
                filler: 0.54,
            },
            pack_price: Some(REFERENCE_PACK_PRICE),
        }
    }

    /// Total number of guaranteed slots across all rarities.
    pub fn guaranteed_slots(&self) -> usize {
        self.guaranteed.iter().map(|(_, n)| n).sum()
    }

    /// Number of guaranteed slots whose rarity is at or above `floor`.
    pub fn guaranteed_at_or_above(&self, floor: Rarity) -> usize {
        self.guaranteed
            .iter()
            .filter(|(r, _)| *r >= floor)
            .map(|(_, n)| n)
            .sum()
    }

    /// Check that the slot template adds up and the odds form a distribution.
    pub fn validate(&self) -> Result<()> {
        let slots = self.guaranteed_slots() + self.variable_slots;
        if slots != self.pack_size {
            return Err(PackError::InvalidConfig(format!(
                "{} guaranteed + {} variable slots does not match pack size {}",
                self.guaranteed_slots(),
                self.variable_slots,
                self.pack_size
            )));
        }

        let weights = &self.variable_weights;
        let valid_weight = |w: f64| w.is_finite() && w >= 0.0;
        if !valid_weight(weights.filler) || weights.tiers.iter().any(|(_, w)| !valid_weight(*w)) {
            return Err(PackError::InvalidConfig(
                "variable slot weights must be finite and non-negative".into(),
            ));
        }

        let total = weights.total();
        let sums_to_one = (total - 1.0).abs() <= WEIGHT_EPSILON;
        if !sums_to_one {
            return Err(PackError::InvalidConfig(format!(
                "variable slot weights sum to {total}, expected 1.0"
            )));
        }

        if let Some(price) = self.pack_price {
            if !price.is_finite() || price < 0.0 {
                return Err(PackError::InvalidConfig(format!(
                    "pack price must be a non-negative amount, got {price}"
                )));
            }
        }

        Ok(())
    }
}

impl Default for PackConfig {
    fn default() -> Self {
        Self::reference()
    }
}

// ---------------------------------------------------------------------------
// LifecycleTimings
// ---------------------------------------------------------------------------

/// Delays for the time-driven lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleTimings {
    /// Tearing -> Fanning.
    pub tear: Duration,
    /// Fanning -> Revealing is `fan_base + fan_per_card * cards`.
    pub fan_base: Duration,
    pub fan_per_card: Duration,
    /// Revealing -> Summary after the last single reveal.
    pub reveal_settle: Duration,
    /// Revealing -> Summary after "reveal all".
    pub reveal_all_settle: Duration,
}

impl LifecycleTimings {
    /// How long the fan-out animation runs for a pack of `cards` cards.
    pub fn fan_duration(&self, cards: usize) -> Duration {
        let per_card = u32::try_from(cards).unwrap_or(u32::MAX);
        self.fan_base
            .saturating_add(self.fan_per_card.saturating_mul(per_card))
    }

    /// Reject delays longer than [`MAX_TIMING`]. The fan duration is checked
    /// for a full reference pack.
    pub fn validate(&self) -> Result<()> {
        let delays = [
            ("tear", self.tear),
            ("fan", self.fan_duration(PACK_SIZE)),
            ("reveal_settle", self.reveal_settle),
            ("reveal_all_settle", self.reveal_all_settle),
        ];
        for (name, delay) in delays {
            if delay > MAX_TIMING {
                return Err(PackError::InvalidConfig(format!(
                    "{name} delay of {delay:?} exceeds the {MAX_TIMING:?} limit"
                )));
            }
        }
        Ok(())
    }

    /// All delays zero; transitions fire on the next poll.
    pub fn immediate() -> Self {
        Self {
            tear: Duration::ZERO,
            fan_base: Duration::ZERO,
            fan_per_card: Duration::ZERO,
            reveal_settle: Duration::ZERO,
            reveal_all_settle: Duration::ZERO,
        }
    }
}

impl Default for LifecycleTimings {
    fn default() -> Self {
        Self {
            tear: Duration::from_millis(600),
            fan_base: Duration::from_millis(800),
            fan_per_card: Duration::from_millis(60),
            reveal_settle: Duration::from_millis(500),
            reveal_all_settle: Duration::from_millis(300),
        }
    }
}

// ---------------------------------------------------------------------------
// Paths and URLs
// ---------------------------------------------------------------------------

/// Platform cache directory for the SDK, e.g. `~/.cache/optcg-pack-sdk`.
pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("optcg-pack-sdk")
    } else {
        PathBuf::from(".optcg-pack-sdk-cache")
    }
}

fn tcgplayer_pack_id(set_id: &str) -> Option<&'static str> {
    let id = match set_id {
        "OP-01" => "450085",
        "OP-02" => "455865",
        "OP-03" => "477175",
        "OP-04" => "485832",
        "OP-05" => "498733",
        "OP-06" => "515077",
        "OP-07" => "532104",
        "OP-08" => "542502",
        "OP-09" => "563833",
        "OP-10" => "586670",
        "OP-11" => "620179",
        "OP-12" => "628345",
        "OP-13" => "628351",
        "OP14-EB04" => "666577",
        "EB-01" => "521160",
        "EB-02" => "594068",
        "EB-03" => "666727",
        "PRB-01" => "545398",
        "PRB-02" => "628451",
        _ => return None,
    };
    Some(id)
}

/// Pack artwork for a set: the TCGplayer product image when known, else the
/// official site thumbnail.
pub fn pack_image_url(set_id: &str) -> String {
    match tcgplayer_pack_id(set_id) {
        Some(product) => {
            format!("https://product-images.tcgplayer.com/fit-in/400x400/{product}.jpg")
        }
        None => {
            let slug = set_id.to_lowercase().replace('-', "");
            format!("https://en.onepiece-cardgame.com/images/products/boosters/{slug}/img_thumbnail.png")
        }
    }
}
