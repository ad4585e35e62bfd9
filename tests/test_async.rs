//! Async wrapper and timer driver tests. Run with `--features async`.

#![cfg(feature = "async")]

mod common;

use std::time::Duration;

use optcg_pack_sdk::config::LifecycleTimings;
use optcg_pack_sdk::lifecycle::{PackLifecycle, Stage};
use optcg_pack_sdk::models::{PackResult, Rarity};
use optcg_pack_sdk::{AsyncPackSdk, LifecycleDriver, PackError, PackSdk};

fn pack(len: usize) -> PackResult {
    let cards = (0..len)
        .map(|i| common::card(&format!("C{}", i), Rarity::Common))
        .collect();
    PackResult::new(cards, common::SET_ID, 1)
}

fn driver(len: usize) -> LifecycleDriver {
    LifecycleDriver::new(PackLifecycle::new(pack(len), LifecycleTimings::default()))
}

async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

fn stage(driver: &LifecycleDriver) -> Stage {
    driver.snapshot().unwrap().stage
}

#[tokio::test(start_paused = true)]
async fn timers_advance_through_fanning_to_revealing() {
    let mut driver = driver(12);
    assert!(driver.tear().unwrap());
    assert_eq!(stage(&driver), Stage::Tearing);

    sleep_ms(599).await;
    assert_eq!(stage(&driver), Stage::Tearing);

    sleep_ms(2).await;
    assert_eq!(stage(&driver), Stage::Fanning);

    sleep_ms(800 + 12 * 60).await;
    assert_eq!(stage(&driver), Stage::Revealing);
}

#[tokio::test(start_paused = true)]
async fn double_tear_schedules_one_transition() {
    let mut driver = driver(12);
    assert!(driver.tear().unwrap());
    assert!(!driver.tear().unwrap());

    sleep_ms(601).await;
    assert_eq!(stage(&driver), Stage::Fanning);
    sleep_ms(100).await;
    assert_eq!(stage(&driver), Stage::Fanning);
}

#[tokio::test(start_paused = true)]
async fn last_reveal_reaches_summary_after_settle() {
    let mut driver = driver(12);
    driver.tear().unwrap();
    sleep_ms(600 + 800 + 12 * 60 + 1).await;
    assert_eq!(stage(&driver), Stage::Revealing);

    for i in 0..11 {
        assert!(driver.reveal_card(i).unwrap());
    }
    assert!(driver.reveal_card(11).unwrap());
    assert!(driver.snapshot().unwrap().reveal.is_complete());

    sleep_ms(499).await;
    assert_eq!(stage(&driver), Stage::Revealing);
    sleep_ms(2).await;
    assert_eq!(stage(&driver), Stage::Summary);
}

#[tokio::test(start_paused = true)]
async fn invalid_reveal_index_is_reported() {
    let mut driver = driver(12);
    driver.tear().unwrap();
    sleep_ms(3000).await;

    let err = driver.reveal_card(40).unwrap_err();
    assert!(matches!(err, PackError::InvalidRevealIndex { index: 40, len: 12 }));
}

#[tokio::test(start_paused = true)]
async fn open_another_discards_old_timers() {
    let mut driver = driver(12);
    driver.tear().unwrap();
    sleep_ms(3000).await;
    driver.reveal_all().unwrap();
    sleep_ms(301).await;
    assert_eq!(stage(&driver), Stage::Summary);

    assert!(driver.open_another(pack(4)).unwrap());
    let snapshot = driver.snapshot().unwrap();
    assert_eq!(snapshot.stage, Stage::Sealed);
    assert_eq!(snapshot.pack.len(), 4);
    assert_eq!(snapshot.generation, 1);

    sleep_ms(5000).await;
    assert_eq!(stage(&driver), Stage::Sealed);
}

#[tokio::test(start_paused = true)]
async fn dispose_stops_pending_transition() {
    let mut driver = driver(12);
    driver.tear().unwrap();
    driver.dispose();

    sleep_ms(5000).await;
    assert_eq!(stage(&driver), Stage::Tearing);
}

#[tokio::test]
async fn async_sdk_opens_packs() {
    let sdk = PackSdk::builder()
        .seed(3)
        .build_with_catalog(common::FakeCatalog::with_pool(
            common::SET_ID,
            common::full_pool(),
        ))
        .unwrap();
    let sdk = AsyncPackSdk::from_sdk(sdk);

    assert_eq!(sdk.sets().await.unwrap().len(), 1);
    let lifecycle = sdk.open_pack(common::SET_ID).await.unwrap();
    assert_eq!(lifecycle.stage(), Stage::Sealed);
    assert_eq!(lifecycle.pack().len(), 12);

    let err = sdk.generate_pack("ZZ-99").await.unwrap_err();
    assert!(matches!(err, PackError::DataUnavailable { .. }));
}
