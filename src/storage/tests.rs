//! Storage Module Tests
//!
//! Validates key placement and the local storage mechanics.
//!
//! ## Test Scopes
//! - **Ring**: Deterministic construction, successor lookup and key spread.
//! - **DistributedStore**: Read-your-write, ring replication to successors,
//!   delete fan-out and behaviour under concurrent access.
//! - **LocalStore**: The unpartitioned store behind the same trait.
//!
//! *Note: Peer replication over HTTP is covered by the integration tests.*

#[cfg(test)]
mod tests {
    use crate::storage::distributed::DistributedStore;
    use crate::storage::memory::LocalStore;
    use crate::storage::partitioner::PartitionMap;
    use crate::storage::ring::{hash_key, HashRing};
    use crate::storage::types::{KvStore, StoreError};
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Indices of the partitions holding `key`.
    fn holders(store: &DistributedStore, key: &str) -> Vec<usize> {
        let map = store.partition_map();
        (0..map.partition_count())
            .filter(|&i| map.partition(i).unwrap().contains(key))
            .collect()
    }

    // ============================================================
    // RING TESTS
    // ============================================================

    #[test]
    fn test_hash_key_uses_sha256_prefix() {
        assert_eq!(hash_key(""), 0xe3b0_c442);
        assert_eq!(hash_key("abc"), 0xba78_16bf);
    }

    #[test]
    fn test_ring_size_and_order() {
        let ring = HashRing::build(10, 100).unwrap();

        assert!(!ring.is_empty());
        assert_eq!(ring.len(), 1000, "Ring should hold partitions * vnodes entries");
        assert!(
            ring.entries().windows(2).all(|w| w[0].hash <= w[1].hash),
            "Ring must be sorted ascending by hash"
        );

        for partition in 0..10 {
            let count = ring
                .entries()
                .iter()
                .filter(|entry| entry.partition == partition)
                .count();
            assert_eq!(count, 100, "Partition {} should own 100 vnodes", partition);
        }
    }

    #[test]
    fn test_ring_rebuild_is_identical() {
        let first = HashRing::build(10, 100).unwrap();
        let second = HashRing::build(10, 100).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_ring_concurrent_builds_agree() {
        let rings: Vec<HashRing> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| HashRing::build(7, 50).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for ring in &rings {
            assert_eq!(ring.len(), 350);
            assert_eq!(ring, &rings[0]);
        }
    }

    #[test]
    fn test_single_vnode_ring() {
        let ring = HashRing::build(5, 1).unwrap();

        assert_eq!(ring.len(), 5);
        for i in 0..500 {
            assert!(ring.lookup(&format!("key_{}", i)) < 5);
        }
    }

    #[test]
    fn test_empty_ring_is_config_error() {
        assert!(matches!(HashRing::build(0, 100), Err(StoreError::Config(_))));
        assert!(matches!(HashRing::build(10, 0), Err(StoreError::Config(_))));
        assert!(PartitionMap::new(0, 10).is_err());
    }

    #[test]
    fn test_lookup_is_deterministic() {
        let ring = HashRing::build(10, 100).unwrap();

        for i in 0..1000 {
            let key = format!("book_{}", i);
            assert_eq!(ring.lookup(&key), ring.lookup(&key));
        }
    }

    #[test]
    fn test_lookup_follows_successor_rule() {
        let ring = HashRing::build(4, 8).unwrap();
        let entries = ring.entries();

        for i in 0..2000 {
            let key = format!("k{}", i);
            let hash = hash_key(&key);
            let expected = entries
                .iter()
                .find(|entry| entry.hash >= hash)
                .unwrap_or(&entries[0])
                .partition;
            assert_eq!(ring.lookup(&key), expected, "Wrong partition for {}", key);
        }
    }

    #[test]
    fn test_lookup_wraps_past_largest_hash() {
        let ring = HashRing::build(2, 1).unwrap();
        let max_hash = ring.entries().last().unwrap().hash;

        let key = (0..100_000)
            .map(|i| format!("wrap_{}", i))
            .find(|key| hash_key(key) > max_hash)
            .expect("some key should hash past the last ring entry");

        assert_eq!(ring.lookup(&key), ring.entries()[0].partition);
    }

    #[test]
    fn test_partition_distribution() {
        let ring = HashRing::build(10, 100).unwrap();
        let mut partition_counts: HashMap<usize, usize> = HashMap::new();

        for i in 0..10_000 {
            *partition_counts
                .entry(ring.lookup(&format!("book_{}", i)))
                .or_insert(0) += 1;
        }

        // With 100 vnodes per partition every partition gets a real share.
        assert_eq!(partition_counts.len(), 10);
        for (partition, count) in partition_counts {
            assert!(count > 300, "Partition {} only got {} keys", partition, count);
        }
    }

    // ============================================================
    // PARTITION MAP TESTS
    // ============================================================

    #[test]
    fn test_partition_map_round_trip() {
        let map = PartitionMap::new(10, 100).unwrap();

        let index = map.put("book-001".to_string(), "Rust".to_string()).unwrap();
        assert_eq!(index, map.get_partition("book-001"));
        assert_eq!(map.get("book-001").unwrap(), "Rust");

        assert!(map.delete("book-001").unwrap());
        assert_eq!(
            map.get("book-001"),
            Err(StoreError::NotFound("book-001".to_string()))
        );
    }

    #[test]
    fn test_partition_map_missing_key_is_not_found() {
        let map = PartitionMap::new(10, 100).unwrap();

        let err = map.get("nonexistent").unwrap_err();
        assert!(err.is_not_found());
        assert!(!map.delete("nonexistent").unwrap());
    }

    #[test]
    fn test_partition_index_out_of_range() {
        let map = PartitionMap::new(3, 1).unwrap();

        assert!(matches!(map.partition(3), Err(StoreError::Internal(_))));
    }

    // ============================================================
    // DISTRIBUTED STORE TESTS
    // ============================================================

    #[test]
    fn test_store_read_your_write() {
        let store = DistributedStore::new(10, 100, 2).unwrap();

        store.put("book-001", "Rust Programming".to_string()).unwrap();
        assert_eq!(store.get("book-001").unwrap(), "Rust Programming");

        store.put("book-001", "Updated Title".to_string()).unwrap();
        assert_eq!(store.get("book-001").unwrap(), "Updated Title");
    }

    #[test]
    fn test_put_replicates_to_successors() {
        let store = DistributedStore::new(10, 100, 3).unwrap();

        for i in 0..50 {
            let key = format!("book-{:03}", i);
            store.put(&key, format!("Title {}", i)).unwrap();

            let primary = store.partition_map().get_partition(&key);
            let expected: Vec<usize> = (0..=3).map(|offset| (primary + offset) % 10).collect();
            assert_eq!(store.replica_partitions(&key), expected);

            let mut held = holders(&store, &key);
            let mut want = expected.clone();
            held.sort();
            want.sort();
            assert_eq!(held, want, "Key {} should live on exactly R+1 partitions", key);

            for index in expected {
                let value = store.partition_map().partition(index).unwrap().get(&key);
                assert_eq!(value, Some(format!("Title {}", i)));
            }
        }
    }

    #[test]
    fn test_zero_replication_factor_writes_primary_only() {
        let store = DistributedStore::new(5, 10, 0).unwrap();

        store.put("solo", "v".to_string()).unwrap();

        assert_eq!(
            holders(&store, "solo"),
            vec![store.partition_map().get_partition("solo")]
        );
    }

    #[test]
    fn test_replication_factor_must_fit_ring() {
        assert!(matches!(
            DistributedStore::new(3, 10, 3),
            Err(StoreError::Config(_))
        ));
        assert!(DistributedStore::new(3, 10, 2).is_ok());
    }

    #[test]
    fn test_delete_clears_primary_and_replicas() {
        let store = DistributedStore::new(10, 100, 2).unwrap();

        store.put("doomed", "value".to_string()).unwrap();
        assert_eq!(holders(&store, "doomed").len(), 3);

        assert!(store.delete("doomed").unwrap());
        assert!(store.get("doomed").unwrap_err().is_not_found());
        assert!(holders(&store, "doomed").is_empty());
    }

    #[test]
    fn test_delete_missing_key_is_noop() {
        let store = DistributedStore::new(10, 100, 2).unwrap();

        store.put("other", "value".to_string()).unwrap();

        assert_eq!(store.delete("never-written"), Ok(false));
        assert_eq!(store.get("other").unwrap(), "value");
    }

    #[test]
    fn test_get_reads_primary_only() {
        let store = DistributedStore::new(10, 100, 2).unwrap();
        store.put("k", "v1".to_string()).unwrap();

        let replicas = store.replica_partitions("k");
        let map = store.partition_map();

        // A replica diverging from the primary is never surfaced.
        map.partition(replicas[1])
            .unwrap()
            .insert("k".to_string(), "stale".to_string());
        assert_eq!(store.get("k").unwrap(), "v1");

        // With the primary copy gone, replicas do not serve the read.
        map.partition(replicas[0]).unwrap().remove("k");
        assert!(store.get("k").unwrap_err().is_not_found());
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let store = DistributedStore::new(10, 100, 2).unwrap();

        assert_eq!(store.put("", "v".to_string()), Err(StoreError::InvalidKey));
        assert_eq!(store.get(""), Err(StoreError::InvalidKey));
        assert_eq!(store.delete(""), Err(StoreError::InvalidKey));
    }

    #[test]
    fn test_user_scenario_ten_partitions() {
        let store = DistributedStore::new(10, 100, 2).unwrap();

        store.put("user:1", "a".to_string()).unwrap();

        let p = store.partition_map().get_partition("user:1");
        for index in [p, (p + 1) % 10, (p + 2) % 10] {
            assert_eq!(
                store.partition_map().partition(index).unwrap().get("user:1"),
                Some("a".to_string())
            );
        }

        store.delete("user:1").unwrap();
        for index in [p, (p + 1) % 10, (p + 2) % 10] {
            assert!(!store.partition_map().partition(index).unwrap().contains("user:1"));
        }
    }

    // ============================================================
    // CONCURRENCY
    // ============================================================

    #[test]
    fn test_concurrent_puts_to_distinct_keys() {
        let store = Arc::new(DistributedStore::new(10, 100, 2).unwrap());

        std::thread::scope(|scope| {
            for t in 0..8 {
                let store = store.clone();
                scope.spawn(move || {
                    for i in 0..200 {
                        let key = format!("t{}-k{}", t, i);
                        store.put(&key, format!("{}:{}", t, i)).unwrap();
                    }
                });
            }
        });

        for t in 0..8 {
            for i in 0..200 {
                let key = format!("t{}-k{}", t, i);
                assert_eq!(store.get(&key).unwrap(), format!("{}:{}", t, i));
            }
        }
    }

    #[test]
    fn test_concurrent_same_key_never_torn() {
        let store = Arc::new(DistributedStore::new(4, 10, 1).unwrap());
        let values: Vec<String> = ["a", "b", "c", "d"]
            .iter()
            .map(|c| c.repeat(256))
            .collect();
        store.put("hot", values[0].clone()).unwrap();

        std::thread::scope(|scope| {
            for value in &values {
                let store = store.clone();
                scope.spawn(move || {
                    for _ in 0..500 {
                        store.put("hot", value.clone()).unwrap();
                    }
                });
            }
            for _ in 0..4 {
                let store = store.clone();
                let values = &values;
                scope.spawn(move || {
                    for _ in 0..500 {
                        let seen = store.get("hot").unwrap();
                        assert!(values.contains(&seen), "Observed a torn value");
                    }
                });
            }
        });
    }

    // ============================================================
    // LOCAL STORE
    // ============================================================

    #[test]
    fn test_local_store_round_trip() {
        let store = LocalStore::new();

        store.set("rust", "crab".to_string()).unwrap();
        assert_eq!(KvStore::get(&store, "rust").unwrap(), "crab");
        assert_eq!(store.partition_counts(), vec![1]);

        assert_eq!(KvStore::delete(&store, "rust"), Ok(true));
        assert_eq!(KvStore::delete(&store, "rust"), Ok(false));
        assert!(KvStore::get(&store, "rust").unwrap_err().is_not_found());
        assert!(store.is_empty());
    }

    #[test]
    fn test_distributed_store_through_trait() {
        let store: Arc<dyn KvStore> = Arc::new(DistributedStore::new(10, 100, 2).unwrap());

        store.set("book", "value".to_string()).unwrap();
        assert_eq!(store.get("book").unwrap(), "value");
        assert_eq!(store.partition_counts().iter().sum::<usize>(), 3);
    }
}
