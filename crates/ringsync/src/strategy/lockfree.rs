use super::Strategy;
use crate::platform::Platform;
use crate::RingCore;

/// No synchronization: calls go straight to the core algorithm.
///
/// Safe for exactly one producer context (calling `write`/`write_many`) and
/// one consumer context (calling `read`/`read_many`/`clear`), e.g. a UART ISR
/// and the main loop. The producer only stores `head` and the consumer only
/// stores `tail`, each reading the other's index with Acquire.
///
/// A second concurrent producer or consumer is a contract violation. It is
/// not detected; the bytes moved become unspecified but memory stays sound.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockFree;

impl<P: Platform> Strategy<P> for LockFree {
    #[inline]
    fn write(&self, ring: &RingCore<'_, P>, byte: u8) -> bool {
        ring.write(byte)
    }

    #[inline]
    fn read(&self, ring: &RingCore<'_, P>) -> Option<u8> {
        ring.read()
    }

    #[inline]
    fn write_many(&self, ring: &RingCore<'_, P>, bytes: &[u8]) -> usize {
        ring.write_many(bytes)
    }

    #[inline]
    fn read_many(&self, ring: &RingCore<'_, P>, out: &mut [u8]) -> usize {
        ring.read_many(out)
    }

    #[inline]
    fn available(&self, ring: &RingCore<'_, P>) -> usize {
        ring.available()
    }

    #[inline]
    fn free_space(&self, ring: &RingCore<'_, P>) -> usize {
        ring.free_space()
    }

    #[inline]
    fn is_empty(&self, ring: &RingCore<'_, P>) -> bool {
        ring.is_empty()
    }

    #[inline]
    fn is_full(&self, ring: &RingCore<'_, P>) -> bool {
        ring.is_full()
    }

    #[inline]
    fn clear(&self, ring: &RingCore<'_, P>) {
        ring.clear();
    }

    fn name(&self) -> &'static str {
        "lockfree"
    }
}
