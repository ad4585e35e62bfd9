use serde::{Deserialize, Serialize};

use crate::config;

// ---------------------------------------------------------------------------
// CardSet — a set that packs can be opened from
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSet {
    pub id: String,
    pub name: String,
    /// Pack artwork URL.
    pub cover_image: Option<String>,
}

impl CardSet {
    /// Build a set from a raw catalog row, attaching its pack artwork.
    pub fn from_api(raw: ApiSet) -> Self {
        let cover_image = Some(config::pack_image_url(&raw.set_id));
        Self {
            id: raw.set_id,
            name: raw.set_name,
            cover_image,
        }
    }
}

// ---------------------------------------------------------------------------
// ApiSet — raw set row as served by the catalog API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSet {
    pub set_name: String,
    pub set_id: String,
}
