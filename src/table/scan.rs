//! Snapshot scans
//!
//! Unordered scans copy one shard at a time as the iterator advances.
//! Ordered scans copy every shard up front (each already sorted) and merge
//! them lazily through a min-heap keyed on the head of each shard.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::vec;

use crossbeam::utils::CachePadded;

use super::shard::Shard;
use super::{TableKey, TableValue};

/// Lazy, one-shot iterator over a table's entries.
///
/// Writers racing with a scan may or may not be observed by it.
pub struct Scan<'a, K, V> {
    inner: ScanInner<'a, K, V>,
}

enum ScanInner<'a, K, V> {
    Unordered {
        shards: &'a [CachePadded<Shard<K, V>>],
        next_shard: usize,
        current: vec::IntoIter<(K, V)>,
    },
    Ordered {
        runs: Vec<vec::IntoIter<(K, V)>>,
        heads: BinaryHeap<Head<K, V>>,
    },
}

impl<'a, K, V> Scan<'a, K, V>
where
    K: TableKey,
    V: TableValue,
{
    pub(crate) fn unordered(shards: &'a [CachePadded<Shard<K, V>>]) -> Self {
        Self {
            inner: ScanInner::Unordered {
                shards,
                next_shard: 0,
                current: Vec::new().into_iter(),
            },
        }
    }

    pub(crate) fn ordered(shards: &'a [CachePadded<Shard<K, V>>]) -> Self {
        let mut runs: Vec<_> = shards.iter().map(|s| s.snapshot().into_iter()).collect();

        let mut heads = BinaryHeap::with_capacity(runs.len());
        for (run, entries) in runs.iter_mut().enumerate() {
            if let Some((key, value)) = entries.next() {
                heads.push(Head { key, value, run });
            }
        }

        Self {
            inner: ScanInner::Ordered { runs, heads },
        }
    }
}

impl<K, V> Iterator for Scan<'_, K, V>
where
    K: TableKey,
    V: TableValue,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            ScanInner::Unordered {
                shards,
                next_shard,
                current,
            } => loop {
                if let Some(entry) = current.next() {
                    return Some(entry);
                }
                let shard = shards.get(*next_shard)?;
                *next_shard += 1;
                *current = shard.snapshot().into_iter();
            },
            ScanInner::Ordered { runs, heads } => {
                let Head { key, value, run } = heads.pop()?;
                if let Some((next_key, next_value)) = runs[run].next() {
                    heads.push(Head {
                        key: next_key,
                        value: next_value,
                        run,
                    });
                }
                Some((key, value))
            }
        }
    }
}

/// Smallest unread entry of one sorted run.
///
/// Ordering is reversed so `BinaryHeap` pops the smallest key first. Keys are
/// unique across shards, so the value never takes part in comparisons.
struct Head<K, V> {
    key: K,
    value: V,
    run: usize,
}

impl<K: Ord, V> PartialEq for Head<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Ord, V> Eq for Head<K, V> {}

impl<K: Ord, V> PartialOrd for Head<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, V> Ord for Head<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key.cmp(&self.key)
    }
}
