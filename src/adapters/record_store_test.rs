use super::record_store::RecordStore;
use serde_json::json;

#[tokio::test]
async fn test_store_assigns_sequential_ids() {
    let store = RecordStore::new();
    let a = store.store_record("pet", json!({ "name": "Rex" })).await;
    let b = store.store_record("pet", json!({ "name": "Milo" })).await;
    // Counter is process-wide, never reused across entity types.
    let c = store.store_record("user", json!({ "name": "Ada" })).await;

    assert_eq!(a["id"], json!(1));
    assert_eq!(b["id"], json!(2));
    assert_eq!(c["id"], json!(3));
}

#[tokio::test]
async fn test_lookup_is_representation_agnostic() {
    let store = RecordStore::new();
    store.store_record("pet", json!({ "id": 7, "name": "Rex" })).await;

    let by_string = store.get_record("pet", "7").await.unwrap();
    assert_eq!(by_string["name"], json!("Rex"));
    // Leading zeros normalize through the numeric form.
    assert!(store.get_record("pet", "07").await.is_some());
    assert!(store.get_record("pet", "8").await.is_none());
}

#[tokio::test]
async fn test_string_ids_kept_literal() {
    let store = RecordStore::new();
    store
        .store_record("pet", json!({ "id": "a1b2", "name": "Rex" }))
        .await;
    assert!(store.get_record("pet", "a1b2").await.is_some());
    assert!(store.get_record("pet", "A1B2").await.is_none());
}

#[tokio::test]
async fn test_update_merges_and_keeps_id() {
    let store = RecordStore::new();
    store
        .store_record("pet", json!({ "id": 7, "name": "Rex", "age": 3 }))
        .await;

    let updated = store
        .update_record("pet", "7", &json!({ "name": "Max", "id": 999 }))
        .await
        .unwrap();
    assert_eq!(updated["name"], json!("Max"));
    assert_eq!(updated["age"], json!(3));
    assert_eq!(updated["id"], json!(7));

    assert!(store.update_record("pet", "42", &json!({})).await.is_none());
}

#[tokio::test]
async fn test_store_value_keyed_by_explicit_id() {
    let store = RecordStore::new();
    store.store_value("token", "7", json!("abc123")).await;

    assert_eq!(store.get_record("token", "7").await.unwrap(), json!("abc123"));
    assert_eq!(store.get_record("token", "07").await.unwrap(), json!("abc123"));

    // Keyed values never touch the sequential counter.
    let record = store.store_record("pet", json!({ "name": "Rex" })).await;
    assert_eq!(record["id"], json!(1));

    assert!(store.delete_record("token", "7").await);
    assert!(store.is_record_deleted("token", "7").await);
}

#[tokio::test]
async fn test_delete_permanence() {
    let store = RecordStore::new();
    store.store_record("pet", json!({ "id": 7, "name": "Rex" })).await;

    assert!(store.delete_record("pet", "7").await);
    assert!(store.is_record_deleted("pet", "7").await);
    assert!(store.get_record("pet", "7").await.is_none());

    // Creating more records of the same type does not resurrect the id.
    store.store_record("pet", json!({ "name": "Milo" })).await;
    assert!(store.is_record_deleted("pet", "7").await);

    // Second delete finds nothing.
    assert!(!store.delete_record("pet", "7").await);
}

#[tokio::test]
async fn test_tombstones_are_scoped_by_entity_type() {
    let store = RecordStore::new();
    store.store_record("pet", json!({ "id": 7 })).await;
    store.store_record("user", json!({ "id": 7 })).await;

    store.delete_record("pet", "7").await;
    assert!(store.is_record_deleted("pet", "7").await);
    assert!(!store.is_record_deleted("user", "7").await);
    assert!(store.get_record("user", "7").await.is_some());
}

#[tokio::test]
async fn test_get_all_records() {
    let store = RecordStore::new();
    assert!(store.get_all_records("pet").await.is_empty());

    store.store_record("pet", json!({ "id": 1 })).await;
    store.store_record("pet", json!({ "id": 2 })).await;
    store.delete_record("pet", "1").await;

    let all = store.get_all_records("pet").await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["id"], json!(2));
}
