//! Raid catalog persistence and the payout resync that runs at startup.

mod common;

use std::sync::Arc;

use raidledger::roster::{CharacterStoreBuilder, RaidCatalog};
use raidledger::storage::{keys, KvStore};
use tempfile::TempDir;

use common::{at, character, two_stage_raid};

#[tokio::test]
async fn catalog_seeds_once_and_persists() {
    let dir = TempDir::new().expect("tempdir");
    let kv = Arc::new(KvStore::open(dir.path()).expect("open"));

    let seeded = RaidCatalog::load_or_seed(&kv).await.expect("seed");
    assert!(!seeded.raids.is_empty());

    // Mutate the persisted table; a reload must return the stored version,
    // not the built-in one.
    let mut edited = seeded.clone();
    edited.raids[0].difficulties[0].stages[0].gold = 12345;
    kv.put_json(keys::RAID_DATA, &edited).await.expect("store");

    let reloaded = RaidCatalog::load_or_seed(&kv).await.expect("reload");
    assert_eq!(reloaded.raids[0].difficulties[0].stages[0].gold, 12345);
}

#[tokio::test]
async fn startup_resyncs_stale_payouts_from_the_catalog() {
    let dir = TempDir::new().expect("tempdir");
    let kv = Arc::new(KvStore::open(dir.path()).expect("open"));

    // Persist a character whose stored payouts predate the current table.
    let mut ch = character("Arkanis", "Luterra", "1,540");
    let mut raid = two_stage_raid("Valtan", (1, 2), true);
    raid.stages[0].chest_cost = Some(9);
    ch.selected_raids = vec![raid];
    kv.put_json(keys::CHARACTERS, &vec![ch]).await.expect("seed");

    let store = CharacterStoreBuilder::new(kv.clone())
        .at(at(2026, 8, 7, 12, 0))
        .open()
        .await
        .expect("store");

    let roster = store.characters().await;
    let stages = &roster[0].selected_raids[0].stages;
    let catalog = store.catalog();
    let tier = catalog.find("Valtan", "normal").expect("tier");
    assert_eq!(stages[0].gold, tier.stages[0].gold);
    assert_eq!(stages[0].chest_cost, tier.stages[0].chest_cost);
    assert_eq!(stages[1].gold, tier.stages[1].gold);

    // Corrected values are persisted, not just in memory.
    let persisted: Vec<raidledger::roster::Character> = kv
        .get_json(keys::CHARACTERS)
        .await
        .expect("read")
        .expect("present");
    assert_eq!(persisted[0].selected_raids[0].stages[0].gold, tier.stages[0].gold);
}

#[tokio::test]
async fn selections_outside_the_catalog_survive_resync() {
    let dir = TempDir::new().expect("tempdir");
    let kv = Arc::new(KvStore::open(dir.path()).expect("open"));

    let mut ch = character("Arkanis", "Luterra", "1,540");
    ch.selected_raids = vec![two_stage_raid("Retired Raid", (111, 222), false)];
    kv.put_json(keys::CHARACTERS, &vec![ch]).await.expect("seed");

    let store = CharacterStoreBuilder::new(kv.clone())
        .at(at(2026, 8, 7, 12, 0))
        .open()
        .await
        .expect("store");

    let roster = store.characters().await;
    assert_eq!(roster[0].selected_raids[0].stages[0].gold, 111);
    assert_eq!(roster[0].selected_raids[0].stages[1].gold, 222);
}
