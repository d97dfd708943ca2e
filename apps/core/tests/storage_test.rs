use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use calcfind_core::storage::{JsonFileStore, KeyValueStore, ResilientStore, SqliteStore};

fn scratch_dir(name: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir()
        .join("calcfind-tests")
        .join(format!("{name}-{unique}"))
}

#[test]
fn sqlite_file_store_survives_reopen() {
    let dir = scratch_dir("sqlite-reopen");
    let path = dir.join("nested").join("history.sqlite3");
    {
        let store = SqliteStore::open_file(&path).unwrap();
        store.set("greeting", "merhaba").unwrap();
    }

    let reopened = SqliteStore::open_file(&path).unwrap();
    assert_eq!(reopened.get("greeting").unwrap().as_deref(), Some("merhaba"));
    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn json_file_store_keeps_keys_independent() {
    let dir = scratch_dir("json-store");
    let store = JsonFileStore::new(dir.join("history.json"));
    assert_eq!(store.get("a").unwrap(), None);

    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    store.remove("a").unwrap();
    store.remove("never-set").unwrap();

    let reopened = JsonFileStore::new(store.path());
    assert_eq!(reopened.get("a").unwrap(), None);
    assert_eq!(reopened.get("b").unwrap().as_deref(), Some("2"));
    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn corrupt_json_file_degrades_resilient_store() {
    let dir = scratch_dir("json-corrupt");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("history.json");
    std::fs::write(&path, "[not an object").unwrap();

    let store = ResilientStore::new(Box::new(JsonFileStore::new(&path)));
    assert_eq!(store.get("k"), None);
    assert!(store.is_degraded());
    store.set("k", "v");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[not an object");
    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn unopenable_sqlite_path_yields_unavailable_store() {
    let dir = scratch_dir("sqlite-blocked");
    std::fs::create_dir_all(&dir).unwrap();
    let blocker = dir.join("file");
    std::fs::write(&blocker, "x").unwrap();

    let store = ResilientStore::open_or_noop(SqliteStore::open_file(&blocker.join("history.sqlite3")));
    assert!(store.is_degraded());
    store.set("k", "v");
    assert_eq!(store.get("k"), None);
    std::fs::remove_dir_all(dir).unwrap();
}
