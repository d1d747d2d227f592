//! Poison-tolerant lock helpers for the in-process adapters.
//!
//! A panic while a guard is held must not take every later caller down with it,
//! so each helper logs the recovery and hands back the inner guard.

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

pub(crate) fn rw_read<'a, T>(
    lock: &'a RwLock<T>,
    target: &'static str,
    op: &'static str,
) -> RwLockReadGuard<'a, T> {
    lock.read()
        .unwrap_or_else(|poisoned| recover(poisoned, target, op, "rwlock.read"))
}

pub(crate) fn rw_write<'a, T>(
    lock: &'a RwLock<T>,
    target: &'static str,
    op: &'static str,
) -> RwLockWriteGuard<'a, T> {
    lock.write()
        .unwrap_or_else(|poisoned| recover(poisoned, target, op, "rwlock.write"))
}

pub(crate) fn mutex_lock<'a, T>(
    lock: &'a Mutex<T>,
    target: &'static str,
    op: &'static str,
) -> MutexGuard<'a, T> {
    lock.lock()
        .unwrap_or_else(|poisoned| recover(poisoned, target, op, "mutex.lock"))
}

fn recover<G>(
    poisoned: PoisonError<G>,
    target: &'static str,
    op: &'static str,
    lock_kind: &'static str,
) -> G {
    warn!(
        op,
        target_module = target,
        lock_kind,
        result = "poisoned_recovered",
        "Recovered from poisoned adapter lock"
    );
    poisoned.into_inner()
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;

    #[test]
    fn mutex_guard_survives_poisoning() {
        let lock = Mutex::new(1);
        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = lock.lock().expect("lock should be acquired");
            panic!("poison the mutex");
        }));
        assert!(lock.is_poisoned());

        *mutex_lock(&lock, "tests", "write") += 1;
        assert_eq!(*mutex_lock(&lock, "tests", "read"), 2);
    }

    #[test]
    fn rwlock_guards_survive_poisoning() {
        let lock = RwLock::new(vec![1]);
        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = lock.write().expect("lock should be acquired");
            panic!("poison the rwlock");
        }));

        rw_write(&lock, "tests", "push").push(2);
        assert_eq!(*rw_read(&lock, "tests", "read"), vec![1, 2]);
    }
}
