//! SharedMap Stress Binary
//!
//! Hammers one shared table from many threads and verifies the final state.

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};
use std::time::Instant;

use clap::{Parser, ValueEnum};
use sharedmap::{Concurrency, Config, Ordering, Registry, SharedMap};
use tracing_subscriber::{fmt, EnvFilter};

/// SharedMap stress test
#[derive(Parser, Debug)]
#[command(name = "sharedmap-stress")]
#[command(about = "Concurrent insert/remove/lookup stress test for a shared table")]
#[command(version)]
struct Args {
    /// Number of writer threads (each owns a disjoint key range)
    #[arg(short, long, default_value = "4")]
    writers: u64,

    /// Number of reader threads
    #[arg(short, long, default_value = "2")]
    readers: u64,

    /// Keys per writer
    #[arg(short, long, default_value = "10000")]
    keys: u64,

    /// Table iteration order
    #[arg(short, long, value_enum, default_value = "unordered")]
    ordering: OrderingArg,

    /// Table locking granularity
    #[arg(short, long, value_enum, default_value = "shared")]
    concurrency: ConcurrencyArg,

    /// Explicit shard count (power of two)
    #[arg(short, long)]
    shards: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderingArg {
    Unordered,
    Ordered,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ConcurrencyArg {
    Exclusive,
    Shared,
}

impl Args {
    fn config(&self) -> Config {
        let ordering = match self.ordering {
            OrderingArg::Unordered => Ordering::Unordered,
            OrderingArg::Ordered => Ordering::Ordered,
        };
        let concurrency = match self.concurrency {
            ConcurrencyArg::Exclusive => Concurrency::ExclusiveOwner,
            ConcurrencyArg::Shared => Concurrency::SharedAccess,
        };

        let mut builder = Config::builder()
            .ordering(ordering)
            .concurrency(concurrency);
        if let Some(shards) = self.shards {
            builder = builder.shards(shards);
        }
        builder.build()
    }
}

/// Every third key is removed again after insertion
fn survives(key: u64) -> bool {
    key % 3 != 0
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sharedmap=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("SharedMap stress v{}", sharedmap::VERSION);
    tracing::info!(
        "{} writers x {} keys, {} readers",
        args.writers,
        args.keys,
        args.readers
    );

    let registry = Registry::new();
    let map: SharedMap<u64, u64> = match registry.create(&args.config()) {
        Ok(map) => map,
        Err(e) => {
            tracing::error!("Failed to create table: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let started = Instant::now();
    let done = AtomicBool::new(false);
    let reads = AtomicU64::new(0);
    let torn = AtomicU64::new(0);
    let total_keys = args.writers * args.keys;
    let key_space = total_keys.max(1);

    let run = crossbeam::scope(|scope| {
        let writers: Vec<_> = (0..args.writers)
            .map(|w| {
                let map = map.clone();
                let range = (w * args.keys)..((w + 1) * args.keys);
                scope.spawn(move |_| {
                    for key in range {
                        map.put(key, key * 2);
                        if !survives(key) {
                            map.delete(&key);
                        }
                    }
                })
            })
            .collect();

        for r in 0..args.readers {
            let map = map.clone();
            let (done, reads, torn) = (&done, &reads, &torn);
            scope.spawn(move |_| {
                let mut probe = r;
                while !done.load(AtomicOrdering::Acquire) {
                    let key = probe % key_space;
                    // Writers only ever store key * 2, so any other value is torn
                    if map.fetch(&key).is_some_and(|value| value != key * 2) {
                        torn.fetch_add(1, AtomicOrdering::Relaxed);
                    }
                    probe = probe.wrapping_add(7919);
                    reads.fetch_add(1, AtomicOrdering::Relaxed);
                }
            });
        }

        for writer in writers {
            if writer.join().is_err() {
                tracing::error!("Writer thread panicked");
            }
        }
        done.store(true, AtomicOrdering::Release);
    });

    if run.is_err() {
        tracing::error!("A stress thread panicked");
        return ExitCode::FAILURE;
    }

    tracing::info!(
        "Workload finished in {:?} ({} reads)",
        started.elapsed(),
        reads.load(AtomicOrdering::Relaxed)
    );

    let torn = torn.load(AtomicOrdering::Relaxed);
    if torn > 0 {
        tracing::error!("Readers observed {} torn values", torn);
        return ExitCode::FAILURE;
    }

    match verify(&map, total_keys) {
        Ok(()) => {
            tracing::info!("Verified {} live entries", map.len());
            ExitCode::SUCCESS
        }
        Err(message) => {
            tracing::error!("Verification failed: {}", message);
            ExitCode::FAILURE
        }
    }
}

/// Check size, every key's value, and scan order for ordered tables
fn verify(map: &SharedMap<u64, u64>, total_keys: u64) -> Result<(), String> {
    let expected = (0..total_keys).filter(|&k| survives(k)).count();
    if map.len() != expected {
        return Err(format!("size {} != expected {}", map.len(), expected));
    }

    for key in 0..total_keys {
        let want = survives(key).then_some(key * 2);
        let got = map.fetch(&key);
        if got != want {
            return Err(format!("key {}: got {:?}, want {:?}", key, got, want));
        }
    }

    if map.ordering() == Ordering::Ordered {
        let keys = map.keys();
        if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err("ordered scan is not ascending".to_string());
        }
    }

    Ok(())
}
