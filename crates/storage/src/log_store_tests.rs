use super::*;

#[test]
fn put_get_has_delete_round_trip_in_memory() {
    let store = LogKvStore::in_memory();
    assert!(!store.has(b"k").unwrap());
    store.put(b"k", b"v").unwrap();
    assert!(store.has(b"k").unwrap());
    assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));
    store.delete(b"k").unwrap();
    assert!(!store.has(b"k").unwrap());
    assert_eq!(store.get(b"k").unwrap(), None);
}

#[test]
fn replays_log_on_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.log");

    {
        let store = LogKvStore::open(&path).unwrap();
        store.put(b"a", b"1").unwrap();
        store.put(b"b", b"2").unwrap();
        store.delete(b"a").unwrap();
    }

    let reopened = LogKvStore::open(&path).unwrap();
    assert_eq!(reopened.get(b"a").unwrap(), None);
    assert_eq!(reopened.get(b"b").unwrap(), Some(b"2".to_vec()));
    assert_eq!(reopened.len(), 1);
}

#[test]
fn empty_log_file_replays_to_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.log");
    let store = LogKvStore::open(&path).unwrap();
    assert!(store.is_empty());
}
