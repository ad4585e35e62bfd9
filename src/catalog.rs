//! Card catalog providers.
//!
//! [`ApiCatalog`] fetches sets and cards from the optcgapi.com REST API.
//! [`CachedCatalog`] puts a [`CatalogCache`] in front of any provider.

use std::cell::RefCell;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::cache::{self, CacheStore, CatalogCache, Clock};
use crate::config;
use crate::error::{PackError, Result};
use crate::models::{ApiCard, ApiSet, Card, CardSet};

/// Source of sets and their classified card pools.
pub trait CardCatalog {
    fn sets(&self) -> Result<Vec<CardSet>>;
    fn cards(&self, set_id: &str) -> Result<Vec<Card>>;
}

// ---------------------------------------------------------------------------
// ApiCatalog
// ---------------------------------------------------------------------------

/// Fetches catalog data over HTTP.
pub struct ApiCatalog {
    base_url: String,
    /// If true, never touch the network.
    pub offline: bool,
    timeout: Duration,
    client: RefCell<Option<Client>>,
}

impl ApiCatalog {
    pub fn new(base_url: impl Into<String>, offline: bool, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            offline,
            timeout,
            client: RefCell::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lazy HTTP client, created on first use.
    fn client(&self) -> Result<Client> {
        let mut slot = self.client.borrow_mut();
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        *slot = Some(client.clone());
        Ok(client)
    }

    fn fetch<T: DeserializeOwned>(&self, path: &str, set_id: &str) -> Result<T> {
        if self.offline {
            return Err(PackError::DataUnavailable {
                set_id: set_id.to_string(),
                reason: "offline mode is enabled".into(),
            });
        }

        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%url, "fetching catalog data");
        let resp = self.client()?.get(&url).send()?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PackError::NotFound(url));
        }
        Ok(resp.error_for_status()?.json()?)
    }

    /// Close the HTTP client, if open.
    pub fn close(&self) {
        self.client.borrow_mut().take();
    }
}

impl Default for ApiCatalog {
    fn default() -> Self {
        Self::new(config::API_BASE_URL, false, Duration::from_secs(30))
    }
}

impl CardCatalog for ApiCatalog {
    fn sets(&self) -> Result<Vec<CardSet>> {
        let raw: Vec<ApiSet> = self.fetch("allSets/", "*")?;
        Ok(raw.into_iter().map(CardSet::from_api).collect())
    }

    fn cards(&self, set_id: &str) -> Result<Vec<Card>> {
        let raw: Vec<ApiCard> = self.fetch(&format!("sets/{}/", set_id), set_id)?;
        Ok(raw.into_iter().map(Card::from_api).collect())
    }
}

// ---------------------------------------------------------------------------
// CachedCatalog
// ---------------------------------------------------------------------------

/// Read-through cache in front of another provider.
///
/// Successful non-empty results are written back; failures are never cached.
pub struct CachedCatalog<P, S, C> {
    inner: P,
    cache: RefCell<CatalogCache<S, C>>,
}

impl<P, S, C> CachedCatalog<P, S, C>
where
    P: CardCatalog,
    S: CacheStore,
    C: Clock,
{
    pub fn new(inner: P, cache: CatalogCache<S, C>) -> Self {
        Self {
            inner,
            cache: RefCell::new(cache),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Drop every cached entry.
    pub fn clear(&self) -> Result<()> {
        self.cache.borrow_mut().clear()
    }

    fn read_through<T, F>(&self, key: &str, fetch: F) -> Result<Vec<T>>
    where
        T: serde::Serialize + DeserializeOwned,
        F: FnOnce(&P) -> Result<Vec<T>>,
    {
        if let Some(hit) = self.cache.borrow_mut().get::<Vec<T>>(key) {
            return Ok(hit);
        }

        let fresh = fetch(&self.inner)?;
        if !fresh.is_empty() {
            if let Err(e) = self.cache.borrow_mut().put(key, &fresh) {
                tracing::warn!(key, error = %e, "failed to write cache entry");
            }
        }
        Ok(fresh)
    }
}

impl<P, S, C> CardCatalog for CachedCatalog<P, S, C>
where
    P: CardCatalog,
    S: CacheStore,
    C: Clock,
{
    fn sets(&self) -> Result<Vec<CardSet>> {
        self.read_through(&cache::sets_key(), |inner| inner.sets())
    }

    fn cards(&self, set_id: &str) -> Result<Vec<Card>> {
        self.read_through(&cache::cards_key(set_id), |inner| inner.cards(set_id))
    }
}
