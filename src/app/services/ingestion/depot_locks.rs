//! Per-depot serialization of store updates

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::{Error, Result};

/// Registry of one lock per depot identifier
///
/// Ingestions of different depots proceed in parallel; ingestions of the
/// same depot take turns. Entries nobody holds are dropped after use, so
/// the registry only grows with the number of depots in flight.
#[derive(Debug, Default)]
pub struct DepotLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DepotLocks {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock handle of a depot, created on first use
    pub fn lock_for(&self, depot_id: &str) -> Result<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| Error::storage("Depot lock registry poisoned"))?;

        Ok(Arc::clone(locks.entry(depot_id.to_string()).or_default()))
    }

    /// Run `f` while holding the lock of `depot_id`
    pub fn with_lock<T>(&self, depot_id: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let result = self.run_locked(depot_id, f);
        self.release(depot_id);
        result
    }

    fn run_locked<T>(&self, depot_id: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock = self.lock_for(depot_id)?;
        let _guard = lock
            .lock()
            .map_err(|_| Error::storage(format!("Lock of depot '{}' poisoned", depot_id)))?;
        f()
    }

    /// Drop the entry of `depot_id` unless another caller still holds it
    ///
    /// Handles are only cloned under the registry mutex, so a strong count
    /// of one seen under that mutex cannot race with `lock_for`.
    fn release(&self, depot_id: &str) {
        let Ok(mut locks) = self.locks.lock() else {
            return;
        };

        let unused = locks
            .get(depot_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if unused {
            locks.remove(depot_id);
        }
    }

    /// Number of depots with a live lock handle
    pub fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }

    /// Check whether no depot lock is live
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_same_depot_shares_lock() {
        let locks = DepotLocks::new();
        let first = locks.lock_for("D1").unwrap();
        let second = locks.lock_for("D1").unwrap();
        let other = locks.lock_for("D2").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(locks.len(), 2);
    }

    #[test]
    fn test_released_entries_are_dropped() {
        let locks = DepotLocks::new();

        for depot in 0..50 {
            locks.with_lock(&format!("D{depot}"), || Ok(())).unwrap();
        }
        assert!(locks.is_empty());

        // A failing closure releases its entry too
        let result: Result<()> = locks.with_lock("D1", || Err(Error::storage("boom")));
        assert!(result.is_err());
        assert!(locks.is_empty());
    }

    #[test]
    fn test_held_entry_survives_release() {
        let locks = DepotLocks::new();
        let held = locks.lock_for("D1").unwrap();

        locks.with_lock("D1", || Ok(())).unwrap();
        assert_eq!(locks.len(), 1);

        let again = locks.lock_for("D1").unwrap();
        assert!(Arc::ptr_eq(&held, &again));
    }

    #[test]
    fn test_with_lock_serializes_same_depot() {
        let locks = Arc::new(DepotLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                let max_inside = Arc::clone(&max_inside);
                thread::spawn(move || {
                    locks
                        .with_lock("D1", || {
                            let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                            max_inside.fetch_max(now, Ordering::SeqCst);
                            thread::sleep(Duration::from_millis(5));
                            inside.fetch_sub(1, Ordering::SeqCst);
                            Ok(())
                        })
                        .unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert!(locks.is_empty());
    }
}
