//! Poison-tolerant lock helpers.
//!
//! A panic while a store lock is held must not take the cache down with it:
//! the guard is recovered and a warning is logged.

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

fn recover<G>(poisoned: PoisonError<G>, store: &str, op: &'static str, kind: &'static str) -> G {
    warn!(
        store,
        op,
        lock_kind = kind,
        result = "poisoned_recovered",
        "Recovered from poisoned cache lock"
    );
    poisoned.into_inner()
}

pub(crate) fn lock<'a, T>(lock: &'a Mutex<T>, store: &str, op: &'static str) -> MutexGuard<'a, T> {
    lock.lock()
        .unwrap_or_else(|poisoned| recover(poisoned, store, op, "mutex"))
}

pub(crate) fn read<'a, T>(
    lock: &'a RwLock<T>,
    store: &str,
    op: &'static str,
) -> RwLockReadGuard<'a, T> {
    lock.read()
        .unwrap_or_else(|poisoned| recover(poisoned, store, op, "rwlock.read"))
}

pub(crate) fn write<'a, T>(
    lock: &'a RwLock<T>,
    store: &str,
    op: &'static str,
) -> RwLockWriteGuard<'a, T> {
    lock.write()
        .unwrap_or_else(|poisoned| recover(poisoned, store, op, "rwlock.write"))
}
