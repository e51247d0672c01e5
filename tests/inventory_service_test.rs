//! Tests for InventoryService: merge-on-write and the persistence contract

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use rstest::rstest;
use tempfile::TempDir;

use groc::application::services::{InventoryService, Submission};
use groc::application::ApplicationError;
use groc::domain::{DomainError, Entry, Ledger, MergeMode, MergeOutcome, Quantity};
use groc::infrastructure::store::FileKeyValueStore;
use groc::infrastructure::traits::{KeyValueStore, RealFileSystem};
use groc::util::testing;

const KEY: &str = "tableData";

/// In-memory store that can be told to fail writes.
#[derive(Default)]
struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    fail_writes: bool,
}

impl MemoryStore {
    fn with(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        store
    }

    fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }

    fn describe(&self, key: &str) -> String {
        format!("memory:{key}")
    }
}

fn file_service(temp: &TempDir) -> InventoryService {
    testing::init_test_setup();
    let store = FileKeyValueStore::new(Arc::new(RealFileSystem), temp.path().join("data"));
    InventoryService::new(Arc::new(store), KEY)
}

fn entry(item: &str, brand: &str, available: i64) -> Entry {
    Entry::new(item, brand, Quantity::new(available)).unwrap()
}

// ============================================================
// submit() tests
// ============================================================

#[test]
fn given_two_add_submissions_when_submit_then_single_summed_entry() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let service = file_service(&temp);
    let mut ledger = service.load().unwrap();

    // Act
    service
        .submit(&mut ledger, Submission::new("Milk", "A", "2"), MergeMode::Add)
        .unwrap();
    let outcome = service
        .submit(&mut ledger, Submission::new("Milk", "A", "3"), MergeMode::Add)
        .unwrap();

    // Assert
    assert_eq!(
        outcome,
        MergeOutcome::Incremented {
            previous: 2,
            entry: entry("Milk", "A", 5)
        }
    );
    assert_eq!(ledger.entries(), &[entry("Milk", "A", 5)]);
    assert_eq!(service.load().unwrap(), ledger);
}

#[test]
fn given_replace_submissions_when_submit_then_last_quantity_persisted() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let service = file_service(&temp);
    let mut ledger = Ledger::new();

    // Act
    for q in ["4", "9", "1"] {
        service
            .submit(&mut ledger, Submission::new("Eggs", "B", q), MergeMode::Replace)
            .unwrap();
    }

    // Assert
    let reloaded = service.load().unwrap();
    assert_eq!(reloaded.entries(), &[entry("Eggs", "B", 1)]);
}

#[rstest]
#[case("")]
#[case("two")]
#[case("2.5")]
#[case("3 apples")]
fn given_invalid_quantity_when_submit_then_rejected_and_nothing_written(#[case] available: &str) {
    // Arrange
    let store = Arc::new(MemoryStore::default());
    let service = InventoryService::new(store.clone(), KEY);
    let mut ledger = Ledger::new();

    // Act
    let err = service
        .submit(
            &mut ledger,
            Submission::new("Milk", "A", available),
            MergeMode::Add,
        )
        .unwrap_err();

    // Assert
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::InvalidQuantity { .. })
    ));
    assert!(ledger.is_empty());
    assert_eq!(store.raw(KEY), None);
}

#[test]
fn given_empty_item_when_submit_then_rejected() {
    let store = Arc::new(MemoryStore::default());
    let service = InventoryService::new(store.clone(), KEY);
    let mut ledger = Ledger::new();

    let err = service
        .submit(&mut ledger, Submission::new("", "A", "1"), MergeMode::Add)
        .unwrap_err();

    assert!(matches!(err, ApplicationError::Domain(DomainError::EmptyItem)));
    assert_eq!(store.raw(KEY), None);
}

#[test]
fn given_failing_store_when_submit_then_error_and_ledger_unchanged() {
    // Arrange
    let service = InventoryService::new(Arc::new(MemoryStore::failing()), KEY);
    let mut ledger = Ledger::from_entries(vec![entry("Milk", "A", 1)]).unwrap();
    let before = ledger.clone();

    // Act
    let err = service
        .submit(&mut ledger, Submission::new("Milk", "A", "5"), MergeMode::Add)
        .unwrap_err();

    // Assert
    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert_eq!(ledger, before);
}

#[test]
fn given_submit_when_saved_then_snapshot_uses_browser_format() {
    let store = Arc::new(MemoryStore::default());
    let service = InventoryService::new(store.clone(), KEY);
    let mut ledger = Ledger::new();

    service
        .submit(&mut ledger, Submission::new("Milk", "", "2"), MergeMode::Add)
        .unwrap();

    assert_eq!(
        store.raw(KEY).as_deref(),
        Some(r#"[{"item":"Milk","brand":"","available":2}]"#)
    );
}

// ============================================================
// load() tests
// ============================================================

#[test]
fn given_no_snapshot_when_load_then_empty_ledger() {
    let temp = TempDir::new().unwrap();
    let service = file_service(&temp);
    assert!(service.load().unwrap().is_empty());
}

#[rstest]
#[case("not json")]
#[case(r#"{"item":"Milk"}"#)]
#[case(r#"[{"item":"Milk","brand":"A","available":null}]"#)]
#[case(r#"[{"item":"Milk","brand":"A","available":1.5}]"#)]
#[case(r#"[{"item":"","brand":"A","available":1}]"#)]
fn given_undecodable_snapshot_when_load_then_empty_ledger(#[case] raw: &str) {
    let service = InventoryService::new(Arc::new(MemoryStore::with(KEY, raw)), KEY);
    assert!(service.load().unwrap().is_empty());
}

#[test]
fn given_non_utf8_snapshot_file_when_load_then_empty_ledger_and_clear_recovers() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let service = file_service(&temp);
    let path = temp.path().join("data/tableData.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"[\xff\xfe]").unwrap();

    // Act
    let mut ledger = service.load().unwrap();
    service.clear(&mut ledger).unwrap();

    // Assert
    assert!(ledger.is_empty());
    assert!(!path.exists());
}

#[test]
fn given_snapshot_from_browser_when_load_then_order_preserved() {
    let raw = r#"[
        {"item":"Milk","brand":"A","available":2},
        {"item":"Bread","brand":"B","available":0},
        {"item":"Apple","brand":"C","available":-1}
    ]"#;
    let service = InventoryService::new(Arc::new(MemoryStore::with(KEY, raw)), KEY);

    let ledger = service.load().unwrap();

    assert_eq!(
        ledger.entries(),
        &[
            entry("Milk", "A", 2),
            entry("Bread", "B", 0),
            entry("Apple", "C", -1)
        ]
    );
}

#[test]
fn given_ledger_when_saved_and_reloaded_then_identical_sequence() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let service = file_service(&temp);
    let ledger = Ledger::from_entries(vec![
        entry("Zucchini", "Farm", 3),
        entry("Apple", "Zespri", 2),
        entry("Apple", "Ambrosia", 7),
        entry("Café", "Ünique", -4),
    ])
    .unwrap();

    // Act
    service.save(&ledger).unwrap();
    let reloaded = service.load().unwrap();

    // Assert
    assert_eq!(reloaded, ledger);
}

// ============================================================
// clear() tests
// ============================================================

#[test]
fn given_stored_ledger_when_clear_then_empty_and_fresh_load_finds_nothing() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let service = file_service(&temp);
    let mut ledger = Ledger::new();
    service
        .submit(&mut ledger, Submission::new("Milk", "A", "2"), MergeMode::Add)
        .unwrap();
    assert!(temp.path().join("data/tableData.json").exists());

    // Act
    service.clear(&mut ledger).unwrap();

    // Assert
    assert!(ledger.is_empty());
    assert!(!temp.path().join("data/tableData.json").exists());
    assert!(file_service(&temp).load().unwrap().is_empty());
}

#[test]
fn given_nothing_stored_when_clear_then_ok() {
    let temp = TempDir::new().unwrap();
    let service = file_service(&temp);
    let mut ledger = Ledger::new();
    service.clear(&mut ledger).unwrap();
}
