//! Contract tests applied uniformly to all three engines.
//!
//! Every engine must honor the same insert-or-update / try-get / count
//! behavior, so the suite is written once and instantiated per engine.

use tricache::{Cache, CacheError, Countable};

macro_rules! contract_tests {
    ($engine:ident, $ctor:expr) => {
        mod $engine {
            use super::*;

            #[test]
            fn insert_with_valid_key_increases_count_by_one() {
                let cache = $ctor;
                let before = cache.count();
                cache
                    .insert_or_update(Some("key".to_string()), "value".to_string())
                    .unwrap();
                assert_eq!(cache.count() - before, 1);
            }

            #[test]
            fn insert_with_absent_key_fails_with_invalid_argument() {
                let cache = $ctor;
                assert_eq!(
                    cache.insert_or_update(None, "value".to_string()),
                    Err(CacheError::AbsentKey)
                );
                assert_eq!(cache.count(), 0);
            }

            #[test]
            fn get_with_absent_key_fails_with_invalid_argument() {
                let cache = $ctor;
                assert_eq!(cache.try_get(&None), Err(CacheError::AbsentKey));
            }

            #[test]
            fn absent_key_rejection_is_idempotent() {
                let cache = $ctor;
                for _ in 0..3 {
                    assert_eq!(
                        cache.insert_or_update(None, "value".to_string()),
                        Err(CacheError::AbsentKey)
                    );
                    assert_eq!(cache.try_get(&None), Err(CacheError::AbsentKey));
                }
                assert_eq!(cache.count(), 0);
            }

            #[test]
            fn get_existing_key_returns_the_original_value() {
                let cache = $ctor;
                cache
                    .insert_or_update(Some("key".to_string()), "value".to_string())
                    .unwrap();
                assert_eq!(
                    cache.try_get(&Some("key".to_string())).unwrap(),
                    Some("value".to_string())
                );
            }

            #[test]
            fn get_missing_key_returns_none() {
                let cache = $ctor;
                assert_eq!(cache.try_get(&Some("key".to_string())).unwrap(), None);
            }

            #[test]
            fn reinserting_an_existing_key_does_not_change_count() {
                let cache = $ctor;
                cache
                    .insert_or_update(Some("key".to_string()), "first".to_string())
                    .unwrap();
                cache
                    .insert_or_update(Some("key".to_string()), "second".to_string())
                    .unwrap();
                assert_eq!(cache.count(), 1);
                assert_eq!(
                    cache.try_get(&Some("key".to_string())).unwrap(),
                    Some("second".to_string())
                );
            }
        }
    };
}

contract_tests!(
    rwlock_lru_engine,
    tricache::LruCache::<Option<String>, String>::new()
);

contract_tests!(
    spin_lru_engine,
    tricache::SpinLruCache::<Option<String>, String>::new()
);

contract_tests!(
    sharded_engine,
    tricache::ShardedCache::<Option<String>, String>::new()
);
