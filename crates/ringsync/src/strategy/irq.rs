use super::Strategy;
use crate::logging::rb_warn;
use crate::platform::{with_masked, Platform};
use crate::RingCore;

/// Masks interrupts for the whole read/modify/write of each call.
///
/// For bare-metal single-core targets where several interrupt sources or an
/// ISR and the main loop share a buffer. Each call adds its duration to the
/// worst-case interrupt latency; parameter checks run before masking so
/// rejected calls add none. Nesting is delegated to `P::Irq`: a call made with
/// interrupts already masked leaves them masked.
///
/// Not sufficient on multi-core parts, where masking is per core.
#[derive(Debug, Clone, Copy, Default)]
pub struct IrqMasked;

impl IrqMasked {
    #[inline]
    fn masked<'a, P: Platform, R>(
        ring: &RingCore<'a, P>,
        op: impl FnOnce(&RingCore<'a, P>) -> R,
    ) -> R {
        with_masked::<P::Irq, _>(|| op(ring))
    }
}

impl<P: Platform> Strategy<P> for IrqMasked {
    fn write(&self, ring: &RingCore<'_, P>, byte: u8) -> bool {
        Self::masked(ring, |r| r.write(byte))
    }

    fn read(&self, ring: &RingCore<'_, P>) -> Option<u8> {
        Self::masked(ring, RingCore::read)
    }

    fn write_many(&self, ring: &RingCore<'_, P>, bytes: &[u8]) -> usize {
        if bytes.is_empty() {
            rb_warn!("write_many called with an empty slice");
            return 0;
        }
        Self::masked(ring, |r| r.write_many(bytes))
    }

    fn read_many(&self, ring: &RingCore<'_, P>, out: &mut [u8]) -> usize {
        if out.is_empty() {
            rb_warn!("read_many called with an empty buffer");
            return 0;
        }
        Self::masked(ring, |r| r.read_many(out))
    }

    fn available(&self, ring: &RingCore<'_, P>) -> usize {
        Self::masked(ring, RingCore::available)
    }

    fn free_space(&self, ring: &RingCore<'_, P>) -> usize {
        Self::masked(ring, RingCore::free_space)
    }

    fn is_empty(&self, ring: &RingCore<'_, P>) -> bool {
        Self::masked(ring, RingCore::is_empty)
    }

    fn is_full(&self, ring: &RingCore<'_, P>) -> bool {
        Self::masked(ring, RingCore::is_full)
    }

    fn clear(&self, ring: &RingCore<'_, P>) {
        Self::masked(ring, RingCore::clear);
    }

    fn name(&self) -> &'static str {
        "irq-masked"
    }
}
