use serde_json::json;

use super::*;

#[tokio::test]
async fn test_memory_store_round_trip() {
    let store = MemorySettingsStore::new("test");
    assert_eq!(store.namespace(), "test");
    assert!(store.get_raw("autoLearn").await.unwrap().is_none());

    store.set_raw("autoLearn", json!(true)).await.unwrap();
    assert_eq!(store.get_raw("autoLearn").await.unwrap(), Some(json!(true)));

    store.remove("autoLearn").await.unwrap();
    assert!(store.get_raw("autoLearn").await.unwrap().is_none());
}

#[tokio::test]
async fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = FileSettingsStore::new(dir.path(), "coursepilot")
            .await
            .unwrap();
        store.set_raw("autoLearn", json!(true)).await.unwrap();
        store.set_raw("language", json!("zh")).await.unwrap();
    }

    let store = FileSettingsStore::new(dir.path(), "coursepilot")
        .await
        .unwrap();
    assert_eq!(store.get_raw("autoLearn").await.unwrap(), Some(json!(true)));
    assert_eq!(store.get_raw("language").await.unwrap(), Some(json!("zh")));
}

#[tokio::test]
async fn test_file_store_namespaces_are_isolated() {
    let dir = tempfile::tempdir().unwrap();

    let a = FileSettingsStore::new(dir.path(), "a").await.unwrap();
    let b = FileSettingsStore::new(dir.path(), "b").await.unwrap();

    a.set_raw("darkMode", json!(true)).await.unwrap();
    assert!(b.get_raw("darkMode").await.unwrap().is_none());
}

#[tokio::test]
async fn test_file_store_remove_persists() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = FileSettingsStore::new(dir.path(), "ns").await.unwrap();
        store.set_raw("k", json!(1)).await.unwrap();
        store.remove("k").await.unwrap();
    }

    let store = FileSettingsStore::new(dir.path(), "ns").await.unwrap();
    assert!(store.get_raw("k").await.unwrap().is_none());
}

#[tokio::test]
async fn test_handle_typed_access() {
    let handle = SettingsHandle::in_memory();

    assert_eq!(handle.get::<bool>("autoLearn").await.unwrap(), None);
    assert!(!handle.get_or("autoLearn", false).await.unwrap());

    handle.set("autoLearn", &true).await.unwrap();
    assert_eq!(handle.get::<bool>("autoLearn").await.unwrap(), Some(true));

    // Type mismatches surface as serialization errors, not panics.
    let err = handle.get::<String>("autoLearn").await.unwrap_err();
    assert!(matches!(err, crate::SettingsError::Serialization(_)));
}
