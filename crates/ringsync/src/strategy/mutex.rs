use super::Strategy;
use crate::logging::{rb_error, rb_warn};
use crate::platform::{LockGuard, Platform};
use crate::RingCore;

/// Holds the descriptor's lock for the whole of each call.
///
/// For RTOS tasks or OS threads sharing a buffer with any number of
/// producers and consumers. Acquisition blocks without timeout; callers that
/// need a bounded wait must layer one on top. Never call from an interrupt
/// handler.
///
/// The lock is created by the factory; a descriptor bound to this strategy
/// without one rejects every call (empty/full semantics, nothing moved).
#[derive(Debug, Clone, Copy, Default)]
pub struct MutexLocked;

impl MutexLocked {
    #[inline]
    fn locked<'a, P: Platform, R>(
        ring: &RingCore<'a, P>,
        fallback: R,
        op: impl FnOnce(&RingCore<'a, P>) -> R,
    ) -> R {
        let Some(mutex) = ring.lock_handle() else {
            rb_error!("mutex strategy called on a ring without a lock");
            return fallback;
        };
        let _guard = LockGuard::acquire(mutex);
        op(ring)
    }
}

impl<P: Platform> Strategy<P> for MutexLocked {
    fn write(&self, ring: &RingCore<'_, P>, byte: u8) -> bool {
        Self::locked(ring, false, |r| r.write(byte))
    }

    fn read(&self, ring: &RingCore<'_, P>) -> Option<u8> {
        Self::locked(ring, None, RingCore::read)
    }

    fn write_many(&self, ring: &RingCore<'_, P>, bytes: &[u8]) -> usize {
        if bytes.is_empty() {
            rb_warn!("write_many called with an empty slice");
            return 0;
        }
        Self::locked(ring, 0, |r| r.write_many(bytes))
    }

    fn read_many(&self, ring: &RingCore<'_, P>, out: &mut [u8]) -> usize {
        if out.is_empty() {
            rb_warn!("read_many called with an empty buffer");
            return 0;
        }
        Self::locked(ring, 0, |r| r.read_many(out))
    }

    fn available(&self, ring: &RingCore<'_, P>) -> usize {
        Self::locked(ring, 0, RingCore::available)
    }

    fn free_space(&self, ring: &RingCore<'_, P>) -> usize {
        Self::locked(ring, 0, RingCore::free_space)
    }

    fn is_empty(&self, ring: &RingCore<'_, P>) -> bool {
        Self::locked(ring, true, RingCore::is_empty)
    }

    fn is_full(&self, ring: &RingCore<'_, P>) -> bool {
        Self::locked(ring, false, RingCore::is_full)
    }

    fn clear(&self, ring: &RingCore<'_, P>) {
        Self::locked(ring, (), RingCore::clear);
    }

    fn name(&self) -> &'static str {
        "mutex"
    }
}
