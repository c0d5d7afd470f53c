//! Concurrency strategies wrapped around [`RingCore`].
//!
//! Every strategy exposes the same nine operations and differs only in what
//! surrounds the call into the core algorithm:
//!
//! | Strategy      | Discipline                         | Contexts                        |
//! |---------------|------------------------------------|---------------------------------|
//! | [`LockFree`]  | none                               | one producer + one consumer     |
//! | [`IrqMasked`] | interrupts masked for the call     | any, single core                |
//! | [`MutexLocked`] | blocking lock, no timeout        | threads/tasks, never ISRs       |
//!
//! User strategies implement [`Strategy`] and are added through the
//! [`StrategyRegistry`](crate::StrategyRegistry) under a tag at or above
//! [`CUSTOM_TAG_BASE`].

#[cfg(feature = "irq-masked")]
mod irq;
#[cfg(feature = "lockfree")]
mod lockfree;
#[cfg(feature = "mutex")]
mod mutex;

#[cfg(feature = "irq-masked")]
pub use irq::IrqMasked;
#[cfg(feature = "lockfree")]
pub use lockfree::LockFree;
#[cfg(feature = "mutex")]
pub use mutex::MutexLocked;

use crate::config::CUSTOM_TAG_BASE;
use crate::platform::{DefaultPlatform, Platform};
use crate::RingCore;

/// An operation set over the core ring algorithm.
///
/// Implementations are stateless and shared: per-buffer state lives in the
/// [`RingCore`] passed to each call. They must be `Sync` because one
/// strategy value serves every descriptor bound to its tag.
pub trait Strategy<P: Platform = DefaultPlatform>: Sync {
    fn write(&self, ring: &RingCore<'_, P>, byte: u8) -> bool;

    fn read(&self, ring: &RingCore<'_, P>) -> Option<u8>;

    /// Returns the number of leading bytes of `bytes` stored.
    fn write_many(&self, ring: &RingCore<'_, P>, bytes: &[u8]) -> usize;

    /// Returns the number of bytes placed at the front of `out`.
    fn read_many(&self, ring: &RingCore<'_, P>, out: &mut [u8]) -> usize;

    fn available(&self, ring: &RingCore<'_, P>) -> usize;

    fn free_space(&self, ring: &RingCore<'_, P>) -> usize;

    fn is_empty(&self, ring: &RingCore<'_, P>) -> bool;

    fn is_full(&self, ring: &RingCore<'_, P>) -> bool;

    fn clear(&self, ring: &RingCore<'_, P>);

    /// Short name for logs.
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Strategy selector passed to the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Single-producer single-consumer, no synchronization (tag 0).
    LockFree,
    /// Interrupts masked around each call (tag 1).
    IrqMasked,
    /// Blocking mutex around each call (tag 2).
    Mutex,
    /// Registered strategy, tag `>= CUSTOM_TAG_BASE`.
    Custom(u8),
}

impl StrategyKind {
    /// Numeric type tag.
    pub const fn tag(self) -> u8 {
        match self {
            Self::LockFree => 0,
            Self::IrqMasked => 1,
            Self::Mutex => 2,
            Self::Custom(tag) => tag,
        }
    }

    /// Maps a tag to its kind; `Custom(0)` and friends normalize to the
    /// built-in they name.
    pub const fn from_tag(tag: u8) -> Self {
        match tag {
            0 => Self::LockFree,
            1 => Self::IrqMasked,
            2 => Self::Mutex,
            _ => Self::Custom(tag),
        }
    }

    #[inline]
    pub const fn is_custom(self) -> bool {
        self.tag() >= CUSTOM_TAG_BASE
    }
}

impl From<u8> for StrategyKind {
    fn from(tag: u8) -> Self {
        Self::from_tag(tag)
    }
}
