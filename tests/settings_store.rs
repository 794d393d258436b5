//! Settings persistence across process restarts.

use std::sync::Arc;

use raidledger::roster::{SettingsStore, SortOrder};
use raidledger::storage::KvStore;
use tempfile::TempDir;

#[tokio::test]
async fn preferences_survive_reopen() {
    let dir = TempDir::new().expect("tempdir");
    {
        let kv = Arc::new(KvStore::open(dir.path()).expect("open"));
        let settings = SettingsStore::new(kv);
        settings.set_sort_order(SortOrder::Level).await.expect("sort");
        settings.set_info_visible(false).await.expect("visible");
        settings
            .record_activity_name("Adventure Island")
            .await
            .expect("record");
    }

    let kv = Arc::new(KvStore::open(dir.path()).expect("reopen"));
    let settings = SettingsStore::new(kv).load().await;
    assert_eq!(settings.sort_order, SortOrder::Level);
    assert!(!settings.is_info_visible);
    assert_eq!(settings.activity_name_history, vec!["Adventure Island"]);
}

#[tokio::test]
async fn corrupt_preference_falls_back_to_default() {
    let dir = TempDir::new().expect("tempdir");
    let kv = Arc::new(KvStore::open(dir.path()).expect("open"));
    kv.put(raidledger::storage::keys::CHARACTER_SORT_ORDER, "not json")
        .await
        .expect("put");

    let settings = SettingsStore::new(kv).load().await;
    assert_eq!(settings.sort_order, SortOrder::AddedAt);
}
