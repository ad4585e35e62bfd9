//! Configuration tests.

use std::time::Duration;

use optcg_pack_sdk::config::{
    pack_image_url, LifecycleTimings, PackConfig, VariableWeights, MAX_TIMING,
    REFERENCE_PACK_PRICE,
};
use optcg_pack_sdk::models::{ApiSet, CardSet, Rarity};
use optcg_pack_sdk::PackError;

// ---------------------------------------------------------------------------
// PackConfig
// ---------------------------------------------------------------------------

#[test]
fn reference_config_is_valid() {
    let config = PackConfig::reference();
    config.validate().unwrap();
    assert_eq!(config.pack_size, 12);
    assert_eq!(config.guaranteed_slots(), 10);
    assert_eq!(config.variable_slots, 2);
    assert_eq!(config.guaranteed_at_or_above(Rarity::Leader), 1);
    assert!((config.variable_weights.total() - 1.0).abs() < 1e-9);
    assert_eq!(config.pack_price, Some(REFERENCE_PACK_PRICE));
}

#[test]
fn slot_count_must_match_pack_size() {
    let config = PackConfig {
        pack_size: 13,
        ..PackConfig::reference()
    };
    assert!(matches!(config.validate(), Err(PackError::InvalidConfig(_))));
}

#[test]
fn weights_must_sum_to_one() {
    let config = PackConfig {
        variable_weights: VariableWeights {
            tiers: vec![(Rarity::SecretRare, 0.015), (Rarity::SuperRare, 0.12)],
            filler: 0.8,
        },
        ..PackConfig::reference()
    };
    assert!(matches!(config.validate(), Err(PackError::InvalidConfig(_))));
}

#[test]
fn negative_weights_are_rejected() {
    let config = PackConfig {
        variable_weights: VariableWeights {
            tiers: vec![(Rarity::SecretRare, -0.1)],
            filler: 1.1,
        },
        ..PackConfig::reference()
    };
    assert!(matches!(config.validate(), Err(PackError::InvalidConfig(_))));
}

#[test]
fn nan_filler_is_rejected() {
    let config = PackConfig {
        variable_weights: VariableWeights {
            tiers: vec![(Rarity::SecretRare, 0.0)],
            filler: f64::NAN,
        },
        ..PackConfig::reference()
    };
    assert!(matches!(config.validate(), Err(PackError::InvalidConfig(_))));
}

#[test]
fn infinite_tier_weight_is_rejected() {
    let config = PackConfig {
        variable_weights: VariableWeights {
            tiers: vec![(Rarity::SuperRare, f64::INFINITY)],
            filler: 0.5,
        },
        ..PackConfig::reference()
    };
    assert!(matches!(config.validate(), Err(PackError::InvalidConfig(_))));
}

#[test]
fn negative_pack_price_is_rejected() {
    let config = PackConfig {
        pack_price: Some(-1.0),
        ..PackConfig::reference()
    };
    assert!(config.validate().is_err());
}

#[test]
fn config_is_versionable_json() {
    let config = PackConfig::reference();
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"SEC\""));
    let back: PackConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.guaranteed, config.guaranteed);
    assert_eq!(back.variable_slots, config.variable_slots);
    back.validate().unwrap();
}

// ---------------------------------------------------------------------------
// LifecycleTimings
// ---------------------------------------------------------------------------

#[test]
fn reference_timings() {
    let timings = LifecycleTimings::default();
    assert_eq!(timings.tear, Duration::from_millis(600));
    assert_eq!(timings.fan_duration(12), Duration::from_millis(1520));
    assert_eq!(timings.fan_duration(0), Duration::from_millis(800));
    assert_eq!(timings.reveal_settle, Duration::from_millis(500));
    assert_eq!(timings.reveal_all_settle, Duration::from_millis(300));
    timings.validate().unwrap();
    LifecycleTimings::immediate().validate().unwrap();
}

#[test]
fn fan_duration_saturates() {
    let timings = LifecycleTimings {
        fan_base: Duration::MAX,
        fan_per_card: Duration::MAX,
        ..LifecycleTimings::default()
    };
    assert_eq!(timings.fan_duration(12), Duration::MAX);
}

#[test]
fn overlong_timings_are_rejected() {
    let timings = LifecycleTimings {
        tear: MAX_TIMING + Duration::from_millis(1),
        ..LifecycleTimings::default()
    };
    assert!(matches!(timings.validate(), Err(PackError::InvalidConfig(_))));

    let timings = LifecycleTimings {
        fan_per_card: MAX_TIMING,
        ..LifecycleTimings::default()
    };
    assert!(timings.validate().is_err());
}

// ---------------------------------------------------------------------------
// Pack artwork
// ---------------------------------------------------------------------------

#[test]
fn known_sets_use_tcgplayer_artwork() {
    assert_eq!(
        pack_image_url("OP-01"),
        "https://product-images.tcgplayer.com/fit-in/400x400/450085.jpg"
    );
}

#[test]
fn unknown_sets_use_official_thumbnail() {
    assert_eq!(
        pack_image_url("ST-21"),
        "https://en.onepiece-cardgame.com/images/products/boosters/st21/img_thumbnail.png"
    );
}

#[test]
fn card_set_from_api_gets_cover() {
    let set = CardSet::from_api(ApiSet {
        set_name: "Romance Dawn".into(),
        set_id: "OP-01".into(),
    });
    assert_eq!(set.id, "OP-01");
    assert!(set.cover_image.unwrap().ends_with("450085.jpg"));
}
