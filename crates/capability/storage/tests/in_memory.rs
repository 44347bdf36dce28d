use domain::FavoriteStreamer;
use fleet_storage::{FavoriteStore, InMemoryFavoriteStore, StorageError};

fn favorite(uuid: &str, added_at_ms: i64) -> FavoriteStreamer {
    FavoriteStreamer {
        streamer_uuid: uuid.to_string(),
        streamer_hr_name: format!("cam-{uuid}"),
        streamer_type: "rtsp".to_string(),
        config_template_name: "default".to_string(),
        compute_unit_ip: "10.0.0.5".to_string(),
        is_alive: true,
        features: vec![],
        added_at_ms,
    }
}

#[tokio::test]
async fn list_newest_first() {
    let store = InMemoryFavoriteStore::new();
    store.add(favorite("a", 100)).await.expect("add a");
    store.add(favorite("b", 300)).await.expect("add b");
    store.add(favorite("c", 200)).await.expect("add c");
    let uuids: Vec<String> = store
        .list()
        .await
        .expect("list")
        .into_iter()
        .map(|item| item.streamer_uuid)
        .collect();
    assert_eq!(uuids, vec!["b", "c", "a"]);
}

#[tokio::test]
async fn duplicate_add_conflicts() {
    let store = InMemoryFavoriteStore::new();
    store.add(favorite("a", 1)).await.expect("add");
    let err = store.add(favorite("a", 2)).await.expect_err("duplicate");
    assert!(matches!(err, StorageError::Conflict(uuid) if uuid == "a"));
    assert_eq!(store.list().await.expect("list").len(), 1);
}

#[tokio::test]
async fn update_and_remove_report_presence() {
    let store = InMemoryFavoriteStore::with_items(vec![favorite("a", 1)]);
    let mut changed = favorite("a", 1);
    changed.streamer_hr_name = "gate".to_string();
    assert!(store.update(changed).await.expect("update"));
    assert!(!store.update(favorite("zz", 1)).await.expect("update missing"));

    let found = store.find("a").await.expect("find").expect("present");
    assert_eq!(found.streamer_hr_name, "gate");

    assert!(store.remove("a").await.expect("remove"));
    assert!(!store.remove("a").await.expect("remove again"));
    assert!(store.find("a").await.expect("find").is_none());
}
