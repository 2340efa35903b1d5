//! Tests for Registry
//!
//! These tests verify:
//! - Table creation and configuration validation
//! - Resolving ids into additional handles
//! - Explicit destruction
//! - Registry drop ending every table it owns

use std::thread;

use sharedmap::{Concurrency, Config, MapError, Registry, SharedMap};

// =============================================================================
// Creation Tests
// =============================================================================

#[test]
fn test_create_registers_table() {
    let registry = Registry::new();
    let map: SharedMap<u32, u32> = registry.create(&Config::default()).unwrap();

    assert!(registry.contains(map.id()));
    assert_eq!(registry.table_count(), 1);
    assert_eq!(registry.table_ids(), vec![map.id()]);
}

#[test]
fn test_create_distinct_ids() {
    let registry = Registry::new();
    let a: SharedMap<u32, u32> = registry.create(&Config::default()).unwrap();
    let b: SharedMap<u32, u32> = registry.create(&Config::default()).unwrap();

    assert_ne!(a.id(), b.id());
    assert!(!a.same_table(&b));
}

#[test]
fn test_create_rejects_invalid_configuration() {
    let registry = Registry::new();
    let config = Config::builder()
        .concurrency(Concurrency::ExclusiveOwner)
        .shards(8)
        .build();

    let result = registry.create::<u32, u32>(&config);

    assert!(matches!(result, Err(MapError::InvalidConfiguration(_))));
    assert_eq!(registry.table_count(), 0);
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_sees_same_table() {
    let registry = Registry::new();
    let h1: SharedMap<&str, i32> = registry.create(&Config::default()).unwrap();
    let h2: SharedMap<&str, i32> = registry.open(h1.id()).unwrap();

    h1.put("x", 10);

    assert_eq!(h2.fetch("x"), Some(10));
    assert!(h1.same_table(&h2));
}

#[test]
fn test_open_unknown_id() {
    let registry = Registry::new();
    let other = Registry::new();
    let map: SharedMap<u32, u32> = other.create(&Config::default()).unwrap();

    let result = registry.open::<u32, u32>(map.id());

    assert!(matches!(result, Err(MapError::TableNotFound(id)) if id == map.id()));
}

#[test]
fn test_open_from_another_thread() {
    let registry = Registry::new();
    let map: SharedMap<u64, String> = registry.create(&Config::default()).unwrap();
    let id = map.id();

    let reg = registry.clone();
    thread::spawn(move || {
        let remote: SharedMap<u64, String> = reg.open(id).unwrap();
        remote.put(1, "from thread".to_string());
    })
    .join()
    .unwrap();

    assert_eq!(map.fetch(&1), Some("from thread".to_string()));
}

// =============================================================================
// Destroy Tests
// =============================================================================

#[test]
fn test_destroy_unregisters() {
    let registry = Registry::new();
    let map: SharedMap<u32, u32> = registry.create(&Config::default()).unwrap();
    let id = map.id();

    registry.destroy(id).unwrap();

    assert!(!registry.contains(id));
    assert!(map.is_destroyed());
    assert!(matches!(
        registry.open::<u32, u32>(id),
        Err(MapError::TableNotFound(_))
    ));
}

#[test]
fn test_destroy_twice_reports_not_found() {
    let registry = Registry::new();
    let map: SharedMap<u32, u32> = registry.create(&Config::default()).unwrap();
    let id = map.id();

    registry.destroy(id).unwrap();

    assert_eq!(registry.destroy(id), Err(MapError::TableNotFound(id)));
}

#[test]
fn test_destroy_via_handle() {
    let registry = Registry::new();
    let map: SharedMap<u32, u32> = registry.create(&Config::default()).unwrap();
    let alias = map.clone();
    let id = map.id();

    map.destroy();

    assert!(!registry.contains(id));
    assert!(alias.is_destroyed());
}

#[test]
fn test_dropping_handles_keeps_table() {
    let registry = Registry::new();
    let id = {
        let map: SharedMap<u32, u32> = registry.create(&Config::default()).unwrap();
        map.put(1, 100);
        map.id()
    };

    let reopened: SharedMap<u32, u32> = registry.open(id).unwrap();
    assert_eq!(reopened.fetch(&1), Some(100));
}

#[test]
#[should_panic(expected = "used after it was destroyed")]
fn test_use_after_destroy_panics() {
    let registry = Registry::new();
    let map: SharedMap<u32, u32> = registry.create(&Config::default()).unwrap();
    let alias = map.clone();

    registry.destroy(map.id()).unwrap();
    alias.fetch(&1);
}

// =============================================================================
// Owning Context Tests
// =============================================================================

#[test]
fn test_dropping_registry_destroys_tables() {
    let registry = Registry::new();
    let map: SharedMap<u32, u32> = registry.create(&Config::default()).unwrap();
    map.put(1, 1);

    drop(registry);

    assert!(map.is_destroyed());
    assert!(map.registry().is_none());
}

#[test]
fn test_registry_clone_keeps_context_alive() {
    let registry = Registry::new();
    let clone = registry.clone();
    let map: SharedMap<u32, u32> = registry.create(&Config::default()).unwrap();

    drop(registry);

    assert!(!map.is_destroyed());
    assert!(clone.contains(map.id()));
    assert!(map.registry().unwrap().same_registry(&clone));
}

#[test]
fn test_global_registry_is_shared() {
    let map: SharedMap<String, u32> = SharedMap::new();
    let id = map.id();

    assert!(Registry::global().contains(id));
    map.destroy();
    assert!(!Registry::global().contains(id));
}
