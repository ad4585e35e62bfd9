//! Property-based tests for classification, generation and reveal tracking.

mod common;

use optcg_pack_sdk::booster::PackGenerator;
use optcg_pack_sdk::config::PackConfig;
use optcg_pack_sdk::models::{Card, Rarity};
use optcg_pack_sdk::rarity::{classify, PARALLEL_MARKER};
use optcg_pack_sdk::reveal::RevealState;
use proptest::prelude::*;

fn rarity_strategy() -> impl Strategy<Value = Rarity> {
    prop::sample::select(Rarity::ALL.to_vec())
}

/// Pools with at least one card of each guaranteed rarity plus random extras.
fn stocked_pool_strategy() -> impl Strategy<Value = Vec<Card>> {
    prop::collection::vec(rarity_strategy(), 0..40).prop_map(|extras| {
        let mut pool = common::basic_pool();
        pool.extend(
            extras
                .into_iter()
                .enumerate()
                .map(|(i, rarity)| common::card(&format!("X{}", i), rarity)),
        );
        pool
    })
}

proptest! {
    #[test]
    fn classify_is_total(label in ".*", name in ".*") {
        let (rarity, tier) = classify(&label, &name);
        prop_assert!(Rarity::ALL.contains(&rarity));
        if name.contains(PARALLEL_MARKER) {
            prop_assert_eq!(tier, optcg_pack_sdk::HoloTier::AltArt);
        } else {
            prop_assert_eq!(tier, rarity.holo_tier());
        }
    }

    #[test]
    fn stocked_pool_fills_every_slot(pool in stocked_pool_strategy(), seed in any::<u64>()) {
        let gen = PackGenerator::new(PackConfig::reference()).unwrap();
        let pack = gen.generate(&pool, &mut common::rng(seed));
        prop_assert_eq!(pack.len(), 12);
    }

    #[test]
    fn high_rarity_count_is_bounded(pool in stocked_pool_strategy(), seed in any::<u64>()) {
        let gen = PackGenerator::new(PackConfig::reference()).unwrap();
        let config = gen.config();
        let min = config.guaranteed_at_or_above(Rarity::Leader);
        let max = min + config.variable_slots;

        let pack = gen.generate(&pool, &mut common::rng(seed));
        let high = pack.iter().filter(|c| c.rarity >= Rarity::Leader).count();
        prop_assert!(high >= min && high <= max);
    }

    #[test]
    fn any_pool_never_overfills(
        rarities in prop::collection::vec(rarity_strategy(), 0..30),
        seed in any::<u64>(),
    ) {
        let pool: Vec<Card> = rarities
            .into_iter()
            .enumerate()
            .map(|(i, r)| common::card(&format!("P{}", i), r))
            .collect();
        let gen = PackGenerator::new(PackConfig::reference()).unwrap();
        let pack = gen.generate(&pool, &mut common::rng(seed));

        prop_assert!(pack.len() <= 12);
        if pool.is_empty() {
            prop_assert!(pack.is_empty());
        }
        prop_assert!(pack.windows(2).all(|w| w[0].rarity <= w[1].rarity));
    }

    #[test]
    fn generation_is_deterministic(pool in stocked_pool_strategy(), seed in any::<u64>()) {
        let gen = PackGenerator::new(PackConfig::reference()).unwrap();
        let a = gen.generate(&pool, &mut common::rng(seed));
        let b = gen.generate(&pool, &mut common::rng(seed));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn reveal_is_idempotent(len in 1usize..20, picks in prop::collection::vec(0usize..20, 0..30)) {
        let mut state = RevealState::new(len);
        for i in picks.into_iter().filter(|i| *i < len) {
            let once = state.reveal(i).unwrap();
            let twice = once.reveal(i).unwrap();
            prop_assert_eq!(&once, &twice);
            state = once;
        }
    }

    #[test]
    fn completion_law(len in 0usize..20, picks in prop::collection::vec(0usize..20, 0..60)) {
        let mut state = RevealState::new(len);
        for i in picks {
            match state.reveal(i) {
                Ok(next) => state = next,
                Err(_) => prop_assert!(i >= len),
            }
            prop_assert_eq!(state.is_complete(), state.len() == len);
        }
    }
}
