//! One Piece TCG booster pack simulator.
//!
//! Generates booster packs from a set's card pool with the retail slot
//! template and odds, then drives the pack through its reveal sequence:
//! sealed, torn, fanned out, revealed card by card, summarized. Card data is
//! fetched from optcgapi.com and cached locally.
//!
//! # Quick start
//!
//! ```no_run
//! use optcg_pack_sdk::PackSdk;
//! use std::time::Instant;
//!
//! let mut sdk = PackSdk::builder().build().unwrap();
//!
//! let mut pack = sdk.open_pack("OP-01").unwrap();
//! pack.tear(Instant::now());
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod booster;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod rarity;
pub mod reveal;
pub mod summary;

#[cfg(feature = "async")]
pub use async_client::{AsyncPackSdk, LifecycleDriver};
pub use booster::PackGenerator;
pub use cache::{CatalogCache, FileStore, MemoryStore};
pub use catalog::{ApiCatalog, CachedCatalog, CardCatalog};
pub use config::{LifecycleTimings, PackConfig};
pub use error::{PackError, Result};
pub use lifecycle::{PackLifecycle, Stage};
pub use models::{Card, CardSet, HoloTier, PackResult, Rarity};
pub use reveal::RevealState;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::cache::SystemClock;
use crate::summary::{PriceBreakdown, RarityTally};

// ---------------------------------------------------------------------------
// PackSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`PackSdk`] instance.
///
/// Use [`PackSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](PackSdkBuilder::build) to create the SDK.
pub struct PackSdkBuilder {
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    base_url: String,
    cache_ttl: Duration,
    pack_config: PackConfig,
    timings: LifecycleTimings,
    seed: Option<u64>,
}

impl Default for PackSdkBuilder {
    fn default() -> Self {
        Self {
            cache_dir: None,
            offline: false,
            timeout: Duration::from_secs(30),
            base_url: config::API_BASE_URL.to_string(),
            cache_ttl: config::CACHE_TTL,
            pack_config: PackConfig::reference(),
            timings: LifecycleTimings::default(),
            seed: None,
        }
    }
}

impl PackSdkBuilder {
    /// Set a custom cache directory.
    ///
    /// If not set, the platform-appropriate default cache directory is used
    /// (e.g. `~/.cache/optcg-pack-sdk` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    ///
    /// When offline, the SDK never calls the API and only serves previously
    /// cached catalog data. Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the catalog API base URL. Defaults to [`config::API_BASE_URL`].
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// How long cached catalog data stays fresh. Defaults to one hour.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the slot template and odds. Defaults to [`PackConfig::reference()`].
    pub fn pack_config(mut self, config: PackConfig) -> Self {
        self.pack_config = config;
        self
    }

    /// Set the lifecycle animation delays. Defaults to
    /// [`LifecycleTimings::default()`].
    pub fn timings(mut self, timings: LifecycleTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Seed the pack RNG so the same sequence of packs is produced every run.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the SDK against the HTTP catalog with a file-backed cache.
    ///
    /// Validates the pack configuration and creates the cache directory, but
    /// does not fetch anything.
    pub fn build(self) -> Result<PackSdk> {
        let api = ApiCatalog::new(self.base_url.clone(), self.offline, self.timeout);
        let store = FileStore::new(self.cache_dir.clone())?;
        let cache = CatalogCache::new(store, SystemClock, self.cache_ttl);
        let catalog = CachedCatalog::new(api, cache);
        self.build_with_catalog(catalog)
    }

    /// Build the SDK against a caller-supplied catalog provider.
    ///
    /// Fails with [`PackError::InvalidConfig`] if the pack configuration or
    /// the lifecycle timings are invalid.
    pub fn build_with_catalog<P>(self, catalog: P) -> Result<PackSdk>
    where
        P: CardCatalog + Send + 'static,
    {
        self.timings.validate()?;
        let generator = PackGenerator::new(self.pack_config)?;
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(PackSdk {
            catalog: Box::new(catalog),
            generator,
            timings: self.timings,
            rng: Box::new(rng),
        })
    }
}

// ---------------------------------------------------------------------------
// PackSdk
// ---------------------------------------------------------------------------

/// The main entry point: fetches card pools and opens packs.
///
/// Created via [`PackSdk::builder()`].
pub struct PackSdk {
    catalog: Box<dyn CardCatalog + Send>,
    generator: PackGenerator,
    timings: LifecycleTimings,
    rng: Box<dyn RngCore + Send>,
}

impl PackSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> PackSdkBuilder {
        PackSdkBuilder::default()
    }

    /// The pack generator and, through it, the active [`PackConfig`].
    pub fn generator(&self) -> &PackGenerator {
        &self.generator
    }

    /// Delays handed to every lifecycle this SDK opens.
    pub fn timings(&self) -> &LifecycleTimings {
        &self.timings
    }

    /// List every set packs can be opened from.
    pub fn sets(&self) -> Result<Vec<CardSet>> {
        self.catalog.sets()
    }

    /// Look up one set by id.
    ///
    /// Returns [`PackError::NotFound`] if the catalog does not list it.
    pub fn set(&self, set_id: &str) -> Result<CardSet> {
        self.catalog
            .sets()?
            .into_iter()
            .find(|set| set.id == set_id)
            .ok_or_else(|| PackError::NotFound(format!("set '{}'", set_id)))
    }

    /// Fetch the classified card pool for a set.
    pub fn cards(&self, set_id: &str) -> Result<Vec<Card>> {
        self.catalog.cards(set_id)
    }

    /// Fetch the pool for `set_id`, turning any failure or an empty pool into
    /// [`PackError::DataUnavailable`].
    fn pool(&self, set_id: &str) -> Result<Vec<Card>> {
        let pool = match self.catalog.cards(set_id) {
            Ok(pool) => pool,
            Err(PackError::DataUnavailable { set_id, reason }) => {
                tracing::warn!(%set_id, %reason, "card data unavailable");
                return Err(PackError::DataUnavailable { set_id, reason });
            }
            Err(e) => {
                tracing::warn!(set_id, error = %e, "failed to load card pool");
                return Err(PackError::DataUnavailable {
                    set_id: set_id.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        if pool.is_empty() {
            tracing::warn!(set_id, "set has no cards");
            return Err(PackError::DataUnavailable {
                set_id: set_id.to_string(),
                reason: "set has no cards".into(),
            });
        }
        Ok(pool)
    }

    /// Generate one pack from `set_id` without wrapping it in a lifecycle.
    pub fn generate_pack(&mut self, set_id: &str) -> Result<PackResult> {
        let pool = self.pool(set_id)?;
        self.generator.open_pack(set_id, &pool, &mut *self.rng)
    }

    /// Generate `packs` packs from `set_id`.
    pub fn open_box(&mut self, set_id: &str, packs: usize) -> Result<Vec<PackResult>> {
        let pool = self.pool(set_id)?;
        self.generator.open_box(set_id, &pool, packs, &mut *self.rng)
    }

    /// Generate a pack from `set_id` and start it `Sealed`.
    pub fn open_pack(&mut self, set_id: &str) -> Result<PackLifecycle> {
        let pack = self.generate_pack(set_id)?;
        Ok(PackLifecycle::new(pack, self.timings))
    }

    /// Replace a summarized pack with a fresh one from the same set.
    ///
    /// Returns `Ok(false)` without generating anything unless the lifecycle is
    /// in `Summary`.
    pub fn open_another(&mut self, lifecycle: &mut PackLifecycle) -> Result<bool> {
        if lifecycle.stage() != Stage::Summary || lifecycle.is_disposed() {
            return Ok(false);
        }
        let set_id = lifecycle.pack().set_id.clone();
        let pack = self.generate_pack(&set_id)?;
        Ok(lifecycle.open_another(pack))
    }

    /// Count the cards of `pack` per rarity.
    pub fn rarity_tally(&self, pack: &PackResult) -> RarityTally {
        RarityTally::from_cards(&pack.cards)
    }

    /// Pull value of `pack` against the configured pack price.
    pub fn price_breakdown(&self, pack: &PackResult) -> PriceBreakdown {
        PriceBreakdown::from_cards(&pack.cards, self.generator.config().pack_price)
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for PackSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.generator.config();
        write!(
            f,
            "PackSdk(pack_size={}, variable_slots={})",
            config.pack_size, config.variable_slots
        )
    }
}
