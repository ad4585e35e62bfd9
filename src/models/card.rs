use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Rarity — canonical rarity scale, most to least common
// ---------------------------------------------------------------------------

/// Canonical rarity tier used for pack-slot accounting.
///
/// Declaration order is the rarity rank: `Common` is the lowest and `AltArt`
/// the highest, so the derived `Ord` sorts from most to least common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    #[serde(rename = "C")]
    Common,
    #[serde(rename = "UC")]
    Uncommon,
    #[serde(rename = "R")]
    Rare,
    #[serde(rename = "L")]
    Leader,
    #[serde(rename = "SR")]
    SuperRare,
    #[serde(rename = "SEC")]
    SecretRare,
    #[serde(rename = "ALT")]
    AltArt,
}

// ---------------------------------------------------------------------------
// HoloTier — visual treatment tier
// ---------------------------------------------------------------------------

/// Visual holo treatment applied when rendering a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HoloTier {
    None,
    Rare,
    Leader,
    SuperRare,
    SecretRare,
    AltArt,
}

// ---------------------------------------------------------------------------
// Card — a classified card belonging to one set
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub card_number: String,
    pub rarity: Rarity,
    pub holo_tier: HoloTier,
    pub image_url: String,
    pub set_id: String,
    pub color: Option<String>,
    #[serde(rename = "type")]
    pub card_type: Option<String>,
    pub cost: Option<String>,
    pub power: Option<String>,
    pub attribute: Option<String>,
    pub market_price: Option<f64>,
}

impl Card {
    /// Build a card from a raw catalog row, classifying its rarity label.
    pub fn from_api(raw: ApiCard) -> Self {
        let (rarity, holo_tier) = crate::rarity::classify(&raw.rarity, &raw.card_name);
        let market_price = raw.market_price.as_ref().and_then(parse_price);
        let image_url = if raw.card_image.is_empty() {
            raw.card_image_id.clone()
        } else {
            raw.card_image
        };
        // card_set_id is shared between a card and its parallel print
        let id = if raw.card_image_id.is_empty() {
            raw.card_set_id.clone()
        } else {
            raw.card_image_id
        };

        Self {
            id,
            name: raw.card_name,
            card_number: raw.card_set_id,
            rarity,
            holo_tier,
            image_url,
            set_id: raw.set_id,
            color: non_empty(raw.card_color),
            card_type: non_empty(raw.card_type),
            cost: raw.card_cost.and_then(non_empty),
            power: raw.card_power.and_then(non_empty),
            attribute: raw.attribute.and_then(non_empty),
            market_price,
        }
    }
}

// ---------------------------------------------------------------------------
// ApiCard — raw card row as served by the catalog API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiCard {
    pub card_name: String,
    pub card_set_id: String,
    #[serde(default)]
    pub rarity: String,
    #[serde(default)]
    pub card_image: String,
    #[serde(default)]
    pub card_image_id: String,
    #[serde(default)]
    pub set_id: String,
    #[serde(default)]
    pub set_name: String,
    #[serde(default)]
    pub card_color: String,
    #[serde(default)]
    pub card_type: String,
    pub card_cost: Option<String>,
    pub card_power: Option<String>,
    pub attribute: Option<String>,
    pub card_text: Option<String>,
    pub life: Option<String>,
    /// Served either as a JSON number or as a numeric string.
    pub market_price: Option<serde_json::Value>,
}

fn parse_price(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().trim_start_matches('$').parse().ok(),
        _ => None,
    }
    .filter(|p: &f64| p.is_finite() && *p >= 0.0)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
