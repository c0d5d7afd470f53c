//! Blocking mutex collaborator.

use crate::backoff::Backoff;
use core::sync::atomic::{AtomicBool, Ordering};

/// A lock resource created per descriptor by the mutex strategy.
///
/// Mirrors an RTOS mutex API (`xSemaphoreCreateMutex` and friends): creation
/// can fail, locking blocks without timeout, and the handle is released
/// explicitly. Priority inheritance, if any, comes from the implementation.
pub trait RawMutex: Send + Sync + Sized {
    /// Creates a new unlocked mutex, or `None` if the platform is out of
    /// lock resources.
    fn create() -> Option<Self>;

    /// Blocks until the lock is held. Must not be called from interrupt
    /// context.
    fn lock(&self);

    /// Releases the lock.
    ///
    /// # Safety
    ///
    /// The caller must currently hold the lock acquired with [`lock`](Self::lock).
    unsafe fn unlock(&self);

    /// Returns false if the handle does not refer to a usable mutex.
    fn is_valid(&self) -> bool {
        true
    }

    /// Releases the underlying resource.
    fn destroy(self) {}
}

/// Holds a [`RawMutex`] until dropped.
#[must_use = "the mutex is released as soon as the guard is dropped"]
pub struct LockGuard<'m, M: RawMutex> {
    mutex: &'m M,
}

impl<'m, M: RawMutex> LockGuard<'m, M> {
    /// Blocks until `mutex` is held.
    #[inline]
    pub fn acquire(mutex: &'m M) -> Self {
        mutex.lock();
        Self { mutex }
    }
}

impl<M: RawMutex> Drop for LockGuard<'_, M> {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: the guard only exists while `acquire` holds the lock.
        unsafe { self.mutex.unlock() }
    }
}

/// Test-and-test-and-set spin lock with adaptive backoff.
///
/// The default lock for hosts and single-core targets without an RTOS. It
/// never fails to create and provides no priority inheritance.
#[derive(Debug, Default)]
pub struct SpinMutex {
    locked: AtomicBool,
}

impl SpinMutex {
    /// Creates an unlocked spin mutex.
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }

    /// Returns true if some context currently holds the lock.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

impl RawMutex for SpinMutex {
    fn create() -> Option<Self> {
        Some(Self::new())
    }

    fn lock(&self) {
        let mut backoff = Backoff::new();
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            // Spin on a plain load so waiters don't bounce the cache line
            while self.locked.load(Ordering::Relaxed) {
                backoff.snooze();
            }
        }
    }

    unsafe fn unlock(&self) {
        debug_assert!(self.is_locked(), "unlocking a SpinMutex that is not held");
        self.locked.store(false, Ordering::Release);
    }
}
