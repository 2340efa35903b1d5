//! Table Tests
//!
//! Tests verify:
//! - Basic insert/lookup/remove primitives
//! - Size tracking
//! - Ordered and unordered scans
//! - Scan snapshot behaviour
//! - Clear and destroy
//! - Concurrent access patterns

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use sharedmap::{Concurrency, Config, Ordering, Registry, SharedMap};

// =============================================================================
// Helper Functions
// =============================================================================

fn new_table(registry: &Registry, ordering: Ordering) -> SharedMap<String, Vec<u8>> {
    let config = Config::builder().ordering(ordering).build();
    registry.create(&config).unwrap()
}

fn key(s: &str) -> String {
    s.to_string()
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_table_is_empty() {
    let registry = Registry::new();
    let table = new_table(&registry, Ordering::Unordered);

    assert_eq!(table.len(), 0);
    assert!(table.is_empty());
    assert_eq!(table.iter().count(), 0);
}

#[test]
fn test_insert_and_lookup() {
    let registry = Registry::new();
    let table = new_table(&registry, Ordering::Unordered);

    table.put(key("key1"), b"value1".to_vec());

    assert_eq!(table.fetch("key1"), Some(b"value1".to_vec()));
}

#[test]
fn test_lookup_nonexistent_key() {
    let registry = Registry::new();
    let table = new_table(&registry, Ordering::Unordered);

    assert_eq!(table.fetch("nonexistent"), None);
}

#[test]
fn test_insert_overwrites_existing() {
    let registry = Registry::new();
    let table = new_table(&registry, Ordering::Unordered);

    assert_eq!(table.insert(key("key1"), b"value1".to_vec()), None);
    assert_eq!(
        table.insert(key("key1"), b"value2".to_vec()),
        Some(b"value1".to_vec())
    );

    assert_eq!(table.len(), 1);
    assert_eq!(table.fetch("key1"), Some(b"value2".to_vec()));
}

#[test]
fn test_read_your_write() {
    let registry = Registry::new();
    let table = new_table(&registry, Ordering::Ordered);

    for i in 0..100 {
        let k = format!("key{}", i);
        table.put(k.clone(), vec![i as u8]);
        assert_eq!(table.fetch(&k), Some(vec![i as u8]));
    }
}

// =============================================================================
// Remove Tests
// =============================================================================

#[test]
fn test_remove_existing_key() {
    let registry = Registry::new();
    let table = new_table(&registry, Ordering::Unordered);

    table.put(key("key1"), b"value1".to_vec());
    assert_eq!(table.remove("key1"), Some(b"value1".to_vec()));

    assert_eq!(table.fetch("key1"), None);
    assert_eq!(table.len(), 0);
}

#[test]
fn test_remove_absent_key_is_noop() {
    let registry = Registry::new();
    let table = new_table(&registry, Ordering::Unordered);
    table.put(key("present"), vec![1]);

    table.delete("absent");

    assert_eq!(table.len(), 1);
    assert_eq!(table.fetch("absent"), None);
    assert_eq!(table.fetch("present"), Some(vec![1]));
}

#[test]
fn test_insert_after_remove() {
    let registry = Registry::new();
    let table = new_table(&registry, Ordering::Unordered);

    table.put(key("key1"), b"value1".to_vec());
    table.delete("key1");
    table.put(key("key1"), b"value2".to_vec());

    assert_eq!(table.fetch("key1"), Some(b"value2".to_vec()));
    assert_eq!(table.len(), 1);
}

// =============================================================================
// Scan Tests
// =============================================================================

#[test]
fn test_ordered_scan_yields_ascending_keys() {
    let registry = Registry::new();
    let table: SharedMap<&str, i32> = registry
        .create(&Config::builder().ordered().build())
        .unwrap();

    table.put("a", 1).put("b", 2).put("c", 3);

    assert_eq!(table.to_vec(), vec![("a", 1), ("b", 2), ("c", 3)]);
}

#[test]
fn test_ordered_scan_sorts_out_of_order_inserts() {
    let registry = Registry::new();
    let table = new_table(&registry, Ordering::Ordered);

    // Insert in random order
    table.put(key("cherry"), b"3".to_vec());
    table.put(key("apple"), b"1".to_vec());
    table.put(key("banana"), b"2".to_vec());

    let keys = table.keys();
    assert_eq!(keys, vec!["apple", "banana", "cherry"]);
}

#[test]
fn test_unordered_scan_is_a_permutation() {
    let registry = Registry::new();
    let table: SharedMap<&str, i32> = registry.create(&Config::default()).unwrap();

    table.put("a", 1).put("b", 2).put("c", 3);

    let mut entries = table.to_vec();
    assert_eq!(entries.len(), 3);
    entries.sort();
    assert_eq!(entries, vec![("a", 1), ("b", 2), ("c", 3)]);
}

#[test]
fn test_ordered_scan_many_entries_across_shards() {
    let registry = Registry::new();
    let table: SharedMap<u32, u32> = registry
        .create(&Config::builder().ordered().shards(16).build())
        .unwrap();

    for i in (0..1000).rev() {
        table.put(i, i * 2);
    }

    let entries = table.to_vec();
    assert_eq!(entries.len(), 1000);
    for (i, (k, v)) in entries.iter().enumerate() {
        assert_eq!(*k, i as u32);
        assert_eq!(*v, i as u32 * 2);
    }
}

#[test]
fn test_scan_returns_copies() {
    let registry = Registry::new();
    let table = new_table(&registry, Ordering::Ordered);
    table.put(key("key"), b"value".to_vec());

    let entries = table.to_vec();

    // Modify table after taking the snapshot
    table.put(key("key"), b"modified".to_vec());

    assert_eq!(entries[0].1, b"value".to_vec());
    assert_eq!(table.fetch("key"), Some(b"modified".to_vec()));
}

#[test]
fn test_scan_is_restartable_by_calling_again() {
    let registry = Registry::new();
    let table = new_table(&registry, Ordering::Ordered);
    table.put(key("a"), vec![1]);

    let mut first = table.iter();
    assert!(first.next().is_some());
    assert!(first.next().is_none());

    table.put(key("b"), vec![2]);
    assert_eq!(table.iter().count(), 2);
}

// =============================================================================
// Clear / Destroy Tests
// =============================================================================

#[test]
fn test_clear() {
    let registry = Registry::new();
    let table = new_table(&registry, Ordering::Unordered);

    table.put(key("key1"), b"value1".to_vec());
    table.put(key("key2"), b"value2".to_vec());
    assert_eq!(table.len(), 2);

    table.clear();

    assert_eq!(table.len(), 0);
    assert!(table.is_empty());
    assert_eq!(table.fetch("key1"), None);
}

#[test]
#[should_panic(expected = "used after it was destroyed")]
fn test_insert_after_destroy_panics() {
    let registry = Registry::new();
    let table = new_table(&registry, Ordering::Unordered);
    let alias = table.clone();

    table.destroy();
    alias.put(key("key"), vec![]);
}

#[test]
#[should_panic(expected = "used after it was destroyed")]
fn test_scan_after_destroy_panics() {
    let registry = Registry::new();
    let table = new_table(&registry, Ordering::Ordered);
    let alias = table.clone();

    table.destroy();
    let _ = alias.iter();
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[test]
fn test_exclusive_owner_uses_single_shard() {
    let registry = Registry::new();
    let config = Config::builder()
        .concurrency(Concurrency::ExclusiveOwner)
        .ordered()
        .build();
    let table: SharedMap<u32, u32> = registry.create(&config).unwrap();

    assert_eq!(table.config().shard_count(), 1);
    table.put(2, 20).put(1, 10);
    assert_eq!(table.to_vec(), vec![(1, 10), (2, 20)]);
}

// =============================================================================
// Edge Cases
// =============================================================================

#[test]
fn test_empty_key_and_value() {
    let registry = Registry::new();
    let table = new_table(&registry, Ordering::Unordered);

    table.put(String::new(), vec![]);

    assert_eq!(table.fetch(""), Some(vec![]));
}

#[test]
fn test_large_value() {
    let registry = Registry::new();
    let table = new_table(&registry, Ordering::Unordered);

    let large_value = vec![0xAB; 1024 * 1024]; // 1 MB
    table.put(key("big_key"), large_value.clone());

    assert_eq!(table.fetch("big_key"), Some(large_value));
}

// =============================================================================
// Concurrent Access Tests (Basic)
// =============================================================================

#[test]
fn test_concurrent_reads() {
    let registry = Registry::new();
    let table = Arc::new(new_table(&registry, Ordering::Unordered));
    table.put(key("key"), b"value".to_vec());

    let mut handles = vec![];

    for _ in 0..10 {
        let t = Arc::clone(&table);
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                assert_eq!(t.fetch("key"), Some(b"value".to_vec()));
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_writes() {
    let registry = Registry::new();
    let table = new_table(&registry, Ordering::Ordered);

    let mut handles = vec![];

    for i in 0..10 {
        // Clones are handles onto the same table
        let t = table.clone();
        handles.push(thread::spawn(move || {
            for j in 0..10 {
                t.put(format!("key{}_{}", i, j), format!("value{}_{}", i, j).into_bytes());
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(table.len(), 100);
    let keys: HashSet<_> = table.keys().into_iter().collect();
    assert_eq!(keys.len(), 100);
}
