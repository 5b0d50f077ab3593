//! Contract tests run against every local backend.

use super::*;
use std::time::Duration;
use tempfile::TempDir;

/// Stores built for one test; the temp dir must outlive the store.
fn local_stores() -> (Vec<PresenceStore>, TempDir) {
    let tmp = TempDir::new().unwrap();
    let stores = vec![
        PresenceStore::memory(),
        PresenceStore::redb(tmp.path().join("presence.redb")).unwrap(),
        PresenceStore::blob(tmp.path().join("blobs")).unwrap(),
    ];
    (stores, tmp)
}

#[tokio::test]
async fn test_put_and_get() {
    let (stores, _tmp) = local_stores();
    for store in stores {
        store.put("key1", b"value1", None).await.unwrap();
        assert_eq!(
            store.get("key1").await.unwrap(),
            Some(b"value1".to_vec()),
            "backend {}",
            store.backend_name()
        );
    }
}

#[tokio::test]
async fn test_get_nonexistent_is_none() {
    let (stores, _tmp) = local_stores();
    for store in stores {
        assert!(
            store.get("missing").await.unwrap().is_none(),
            "backend {}",
            store.backend_name()
        );
    }
}

#[tokio::test]
async fn test_overwrite_replaces_value() {
    let (stores, _tmp) = local_stores();
    for store in stores {
        store.put("key", b"first", None).await.unwrap();
        store.put("key", b"second", None).await.unwrap();
        assert_eq!(
            store.get("key").await.unwrap(),
            Some(b"second".to_vec()),
            "backend {}",
            store.backend_name()
        );
    }
}

#[tokio::test]
async fn test_delete() {
    let (stores, _tmp) = local_stores();
    for store in stores {
        store.put("key", b"value", None).await.unwrap();
        assert!(store.delete("key").await.unwrap());
        assert!(store.get("key").await.unwrap().is_none());
        assert!(
            !store.delete("key").await.unwrap(),
            "backend {}",
            store.backend_name()
        );
    }
}

#[tokio::test]
async fn test_ttl_expiration() {
    let (stores, _tmp) = local_stores();
    for store in &stores {
        store
            .put("expiring", b"value", Some(Duration::from_millis(50)))
            .await
            .unwrap();
        assert!(store.get("expiring").await.unwrap().is_some());
    }

    tokio::time::sleep(Duration::from_millis(120)).await;

    for store in &stores {
        assert!(
            store.get("expiring").await.unwrap().is_none(),
            "backend {} kept an expired key",
            store.backend_name()
        );
    }
}

#[tokio::test]
async fn test_overwrite_extends_ttl() {
    let (stores, _tmp) = local_stores();
    for store in &stores {
        store
            .put("key", b"old", Some(Duration::from_millis(50)))
            .await
            .unwrap();
        store
            .put("key", b"new", Some(Duration::from_secs(300)))
            .await
            .unwrap();
    }

    tokio::time::sleep(Duration::from_millis(120)).await;

    for store in &stores {
        assert_eq!(
            store.get("key").await.unwrap(),
            Some(b"new".to_vec()),
            "backend {}",
            store.backend_name()
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_read_of_expired_entry_never_drops_concurrent_put() {
    let (stores, _tmp) = local_stores();
    for store in stores {
        for _ in 0..200 {
            store.put("racy", b"old", Some(Duration::ZERO)).await.unwrap();

            let reader = {
                let store = store.clone();
                tokio::spawn(async move { store.get("racy").await })
            };
            let writer = {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .put("racy", b"fresh", Some(Duration::from_secs(300)))
                        .await
                })
            };

            let seen = reader.await.unwrap().unwrap();
            writer.await.unwrap().unwrap();

            assert!(seen.is_none() || seen.as_deref() == Some(&b"fresh"[..]));
            assert_eq!(
                store.get("racy").await.unwrap(),
                Some(b"fresh".to_vec()),
                "backend {} lost an acknowledged write",
                store.backend_name()
            );
        }
    }
}

#[tokio::test]
async fn test_binary_and_empty_values() {
    let (stores, _tmp) = local_stores();
    for store in stores {
        store.put("bin", &[0u8, 1, 255, 128], None).await.unwrap();
        store.put("empty", b"", None).await.unwrap();
        assert_eq!(store.get("bin").await.unwrap(), Some(vec![0u8, 1, 255, 128]));
        assert_eq!(store.get("empty").await.unwrap(), Some(Vec::new()));
    }
}

#[tokio::test]
async fn test_redb_persists_across_reopens() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("presence.redb");

    {
        let store = PresenceStore::redb(&path).unwrap();
        store
            .put("srv_pub_a3a9e1ed9732", b"{}", Some(Duration::from_secs(300)))
            .await
            .unwrap();
    }

    let store = PresenceStore::redb(&path).unwrap();
    assert_eq!(
        store.get("srv_pub_a3a9e1ed9732").await.unwrap(),
        Some(b"{}".to_vec())
    );
}

#[tokio::test]
async fn test_blob_persists_across_reopens() {
    let tmp = TempDir::new().unwrap();

    {
        let store = PresenceStore::blob(tmp.path()).unwrap();
        store.put("key", b"value", None).await.unwrap();
    }

    let store = PresenceStore::blob(tmp.path()).unwrap();
    assert_eq!(store.get("key").await.unwrap(), Some(b"value".to_vec()));
}

#[tokio::test]
async fn test_from_config_memory() {
    let config = crate::config::StoreConfig::default();
    let store = PresenceStore::from_config(&config).await.unwrap();
    assert_eq!(store.backend_name(), "memory");
}

#[tokio::test]
async fn test_from_config_blob() {
    let tmp = TempDir::new().unwrap();
    let config = crate::config::StoreConfig {
        backend: crate::config::BackendKind::Blob,
        path: Some(tmp.path().join("blobs")),
        ..Default::default()
    };
    let store = PresenceStore::from_config(&config).await.unwrap();
    assert_eq!(store.backend_name(), "blob");
}
