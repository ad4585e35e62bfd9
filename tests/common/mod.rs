//! Shared test fixtures: sample card pools and an in-memory catalog.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use optcg_pack_sdk::catalog::CardCatalog;
use optcg_pack_sdk::models::{Card, CardSet, Rarity};
use optcg_pack_sdk::{PackError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const SET_ID: &str = "OP-01";

pub fn card(id: &str, rarity: Rarity) -> Card {
    Card {
        id: id.to_string(),
        name: format!("Card {}", id),
        card_number: id.to_string(),
        rarity,
        holo_tier: rarity.holo_tier(),
        image_url: format!("https://example.test/{}.png", id),
        set_id: SET_ID.to_string(),
        color: Some("Red".into()),
        card_type: Some("CHARACTER".into()),
        cost: Some("3".into()),
        power: Some("5000".into()),
        attribute: None,
        market_price: None,
    }
}

pub fn priced(id: &str, rarity: Rarity, price: f64) -> Card {
    Card {
        market_price: Some(price),
        ..card(id, rarity)
    }
}

/// 5 Common, 3 Uncommon, 1 Rare, 1 Leader and nothing rarer.
pub fn basic_pool() -> Vec<Card> {
    let mut pool = Vec::new();
    for i in 1..=5 {
        pool.push(card(&format!("C{}", i), Rarity::Common));
    }
    for i in 1..=3 {
        pool.push(card(&format!("U{}", i), Rarity::Uncommon));
    }
    pool.push(card("R1", Rarity::Rare));
    pool.push(card("L1", Rarity::Leader));
    pool
}

/// A pool with at least one card of every rarity.
pub fn full_pool() -> Vec<Card> {
    let mut pool = basic_pool();
    pool.push(card("R2", Rarity::Rare));
    pool.push(card("L2", Rarity::Leader));
    pool.push(card("SR1", Rarity::SuperRare));
    pool.push(card("SR2", Rarity::SuperRare));
    pool.push(card("SEC1", Rarity::SecretRare));
    pool.push(card("ALT1", Rarity::AltArt));
    pool
}

/// Route library logs to the test harness output. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn unreachable_error() -> PackError {
    PackError::Io(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "catalog unreachable",
    ))
}

/// In-memory catalog that counts fetches and can be told to fail.
#[derive(Clone, Default)]
pub struct FakeCatalog {
    pub sets: Vec<CardSet>,
    pub cards: HashMap<String, Vec<Card>>,
    pub fail: bool,
    pub fetches: Arc<AtomicUsize>,
}

impl FakeCatalog {
    pub fn with_pool(set_id: &str, pool: Vec<Card>) -> Self {
        let mut cards = HashMap::new();
        cards.insert(set_id.to_string(), pool);
        Self {
            sets: vec![CardSet {
                id: set_id.to_string(),
                name: "Romance Dawn".into(),
                cover_image: None,
            }],
            cards,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl CardCatalog for FakeCatalog {
    fn sets(&self) -> Result<Vec<CardSet>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(unreachable_error());
        }
        Ok(self.sets.clone())
    }

    fn cards(&self, set_id: &str) -> Result<Vec<Card>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(unreachable_error());
        }
        Ok(self.cards.get(set_id).cloned().unwrap_or_default())
    }
}
