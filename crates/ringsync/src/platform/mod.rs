//! Platform collaborators: interrupt masking, mutexes, and the strategy
//! registry they share.
//!
//! The ring never touches hardware or an RTOS directly. A [`Platform`] names
//! the primitives a descriptor uses; [`DefaultPlatform`] works on hosts and on
//! any target that provides a `critical-section` implementation.

mod irq;
mod mutex;

pub use irq::{with_masked, CriticalSectionIrq, InterruptControl};
pub use mutex::{LockGuard, RawMutex, SpinMutex};

use crate::StrategyRegistry;

/// Bundle of the primitives one family of descriptors is built on.
pub trait Platform: Sized + 'static {
    /// Interrupt mask/restore used by the interrupt-masked strategy.
    type Irq: InterruptControl;

    /// Lock created per descriptor by the mutex strategy.
    type Mutex: RawMutex;

    /// Table the factory consults for custom strategy tags.
    fn registry() -> &'static StrategyRegistry<Self>;
}

/// `critical-section` interrupt control, [`SpinMutex`], and a process-wide
/// registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPlatform;

static DEFAULT_REGISTRY: StrategyRegistry<DefaultPlatform> = StrategyRegistry::new();

impl Platform for DefaultPlatform {
    type Irq = CriticalSectionIrq;
    type Mutex = SpinMutex;

    #[inline]
    fn registry() -> &'static StrategyRegistry<Self> {
        &DEFAULT_REGISTRY
    }
}
