//! Rarity classification.
//!
//! Normalizes the free-text rarity labels served by the catalog into the
//! canonical [`Rarity`] scale and derives the [`HoloTier`] used for rendering.

use crate::models::{HoloTier, Rarity};

/// Marker embedded in the display name of parallel (alternate art) prints.
pub const PARALLEL_MARKER: &str = "(Parallel)";

impl Rarity {
    /// Every rarity from most to least common.
    pub const ALL: [Rarity; 7] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Leader,
        Rarity::SuperRare,
        Rarity::SecretRare,
        Rarity::AltArt,
    ];

    /// Position on the rarity scale, 0 for `Common`.
    pub fn rank(self) -> usize {
        match self {
            Rarity::Common => 0,
            Rarity::Uncommon => 1,
            Rarity::Rare => 2,
            Rarity::Leader => 3,
            Rarity::SuperRare => 4,
            Rarity::SecretRare => 5,
            Rarity::AltArt => 6,
        }
    }

    /// Short badge label.
    pub fn label(self) -> &'static str {
        match self {
            Rarity::Common => "C",
            Rarity::Uncommon => "UC",
            Rarity::Rare => "R",
            Rarity::Leader => "L",
            Rarity::SuperRare => "SR",
            Rarity::SecretRare => "SEC",
            Rarity::AltArt => "ALT",
        }
    }

    /// Holo treatment for a card of this rarity, before the parallel override.
    pub fn holo_tier(self) -> HoloTier {
        match self {
            Rarity::Common | Rarity::Uncommon => HoloTier::None,
            Rarity::Rare => HoloTier::Rare,
            Rarity::Leader => HoloTier::Leader,
            Rarity::SuperRare => HoloTier::SuperRare,
            Rarity::SecretRare => HoloTier::SecretRare,
            Rarity::AltArt => HoloTier::AltArt,
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl HoloTier {
    /// Serialized slug, e.g. `super-rare`.
    pub fn as_str(self) -> &'static str {
        match self {
            HoloTier::None => "none",
            HoloTier::Rare => "rare",
            HoloTier::Leader => "leader",
            HoloTier::SuperRare => "super-rare",
            HoloTier::SecretRare => "secret-rare",
            HoloTier::AltArt => "alt-art",
        }
    }
}

/// Map a raw catalog label to a rarity. Unknown labels fall back to `Common`.
pub fn parse_rarity(raw: &str) -> Rarity {
    match raw.trim() {
        "C" | "Common" => Rarity::Common,
        "UC" | "Uncommon" => Rarity::Uncommon,
        "R" | "Rare" => Rarity::Rare,
        "L" | "Leader" => Rarity::Leader,
        "SR" | "Super Rare" => Rarity::SuperRare,
        "SEC" | "Secret Rare" => Rarity::SecretRare,
        "SP" | "Special Art" | "Alternate Art" | "ALT" => Rarity::AltArt,
        "P" | "Promo" => Rarity::Common,
        other => {
            tracing::debug!(label = other, "unrecognized rarity label, treating as common");
            Rarity::Common
        }
    }
}

/// Whether the display name marks a parallel (alternate art) print.
pub fn is_parallel(card_name: &str) -> bool {
    card_name.contains(PARALLEL_MARKER)
}

/// Classify a card from its raw rarity label and display name.
///
/// Parallel prints always get the alt-art holo treatment, but keep their base
/// rarity for pack-slot accounting.
pub fn classify(raw_rarity: &str, card_name: &str) -> (Rarity, HoloTier) {
    let rarity = parse_rarity(raw_rarity);
    let holo_tier = if is_parallel(card_name) {
        HoloTier::AltArt
    } else {
        rarity.holo_tier()
    };
    (rarity, holo_tier)
}
