use ndbm::{Dbm, Error, Item};
use std::collections::BTreeSet;
use tempfile::TempDir;

// Common test setup
fn setup_populated_db() -> (TempDir, Dbm) {
    let temp_dir = TempDir::new().unwrap();
    let db = Dbm::open_default(temp_dir.path().join("test")).unwrap();
    db.update(&[
        Item::new(b"a".as_slice(), b"alphabet".as_slice()),
        Item::new(b"b".as_slice(), b"battlement".as_slice()),
        Item::new(b"c".as_slice(), b"carnival".as_slice()),
    ])
    .unwrap();
    (temp_dir, db)
}

#[test]
fn test_first_next_protocol() {
    let temp_dir = TempDir::new().unwrap();
    let db = Dbm::open_default(temp_dir.path().join("test")).unwrap();

    // Empty database: the traversal ends immediately.
    assert_eq!(db.first_key().unwrap(), None);

    db.insert(b"only", b"one").unwrap();
    assert_eq!(db.first_key().unwrap(), Some(b"only".to_vec()));
    assert_eq!(db.next_key().unwrap(), None);

    // first_key resets the cursor for a fresh traversal.
    assert_eq!(db.first_key().unwrap(), Some(b"only".to_vec()));
}

#[test]
fn test_keys_iterator_is_restartable_from_scratch() {
    let (_dir, db) = setup_populated_db();

    let expected: BTreeSet<Vec<u8>> =
        [b"a".to_vec(), b"b".to_vec(), b"c".to_vec()].into_iter().collect();

    let first: BTreeSet<Vec<u8>> = db.keys().map(|key| key.unwrap()).collect();
    let second: BTreeSet<Vec<u8>> = db.keys().map(|key| key.unwrap()).collect();
    assert_eq!(first, expected);
    assert_eq!(second, expected);
}

#[test]
fn test_for_each_key_short_circuits_on_visitor_error() {
    let (_dir, db) = setup_populated_db();

    let mut visited = 0;
    let err = db
        .for_each_key(|_| {
            visited += 1;
            Err(Error::KeyNotFound(b"stop".to_vec()))
        })
        .unwrap_err();
    assert_eq!(err, Error::KeyNotFound(b"stop".to_vec()));
    assert_eq!(visited, 1);
}

#[test]
fn test_for_each_item_pairs_keys_with_values() {
    let (_dir, db) = setup_populated_db();

    let mut items = Vec::new();
    db.for_each_item(|key, value| {
        items.push(Item::new(key, value));
        Ok(())
    })
    .unwrap();
    items.sort();
    assert_eq!(
        items,
        vec![
            Item::new(b"a".as_slice(), b"alphabet".as_slice()),
            Item::new(b"b".as_slice(), b"battlement".as_slice()),
            Item::new(b"c".as_slice(), b"carnival".as_slice()),
        ]
    );
}

#[test]
fn test_value_traversal_and_aggregates() {
    let (_dir, db) = setup_populated_db();

    let mut values: Vec<Vec<u8>> = db.all_values();
    values.sort();
    assert_eq!(values, vec![b"alphabet".to_vec(), b"battlement".to_vec(), b"carnival".to_vec()]);

    let mut keys = db.all_keys();
    keys.sort();
    assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);

    assert_eq!(db.count(), 3);
    assert_eq!(db.all_items().len(), 3);
}

#[test]
fn test_advisory_lock_contention() {
    let (_dir, db) = setup_populated_db();
    let second = Dbm::open_default(db.path()).unwrap();

    db.try_lock_exclusive().unwrap();
    assert_eq!(second.try_lock_exclusive().unwrap_err(), Error::AlreadyLocked);
    assert_eq!(second.try_lock_shared().unwrap_err(), Error::AlreadyLocked);

    db.unlock().unwrap();
    second.try_lock_exclusive().unwrap();
    second.unlock().unwrap();
}

#[test]
fn test_shared_locks_coexist() {
    let (_dir, db) = setup_populated_db();
    let second = Dbm::open_default(db.path()).unwrap();

    db.try_lock_shared().unwrap();
    second.try_lock_shared().unwrap();
    assert_eq!(db.try_lock_exclusive().unwrap_err(), Error::AlreadyLocked);

    second.unlock().unwrap();
    db.unlock().unwrap();
}