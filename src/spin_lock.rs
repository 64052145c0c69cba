//! Busy-waiting mutual exclusion for the spin-locked LRU engine.
//!
//! [`RawSpinLock`] implements [`lock_api::RawMutex`] (via parking_lot's
//! re-exported `lock_api`), so [`SpinLock`] gets the standard RAII guard API
//! for free. Contention is resolved purely by spinning: a losing thread never
//! parks in a wait queue, it burns CPU until the holder releases. That trade
//! is only appropriate for brief, low-contention critical sections, which is
//! exactly what the LRU hot path is.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::lock_api::{self, GuardSend, RawMutex};

/// Test-and-test-and-set spin lock over a single [`AtomicBool`].
pub struct RawSpinLock {
    locked: AtomicBool,
}

unsafe impl RawMutex for RawSpinLock {
    const INIT: RawSpinLock = RawSpinLock {
        locked: AtomicBool::new(false),
    };

    type GuardMarker = GuardSend;

    fn lock(&self) {
        loop {
            if self
                .locked
                .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
            {
                return;
            }
            // Spin on a plain load until the lock looks free; avoids
            // hammering the cache line with failed CAS attempts.
            while self.locked.load(Ordering::Relaxed) {
                std::hint::spin_loop();
            }
        }
    }

    fn try_lock(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    unsafe fn unlock(&self) {
        self.locked.store(false, Ordering::Release);
    }
}

/// Mutex whose raw implementation is [`RawSpinLock`].
///
/// # Examples
///
/// ```
/// use tricache::SpinLock;
///
/// let lock = SpinLock::new(0u32);
/// *lock.lock() += 1;
/// assert_eq!(*lock.lock(), 1);
/// ```
pub type SpinLock<T> = lock_api::Mutex<RawSpinLock, T>;
