//! The ring buffer descriptor: factory, destruction, and the public data path.

use crate::config::{builtin_enabled, usable_capacity, MIN_CAPACITY};
use crate::error::{ErrorCode, LastError, RingError};
use crate::logging::{rb_error, rb_info, rb_warn};
use crate::platform::{DefaultPlatform, Platform, RawMutex};
#[cfg(feature = "statistics")]
use crate::stats::Statistics;
use crate::strategy::{Strategy, StrategyKind};
use crate::RingCore;

#[cfg(feature = "irq-masked")]
use crate::strategy::IrqMasked;
#[cfg(feature = "lockfree")]
use crate::strategy::LockFree;
#[cfg(feature = "mutex")]
use crate::strategy::MutexLocked;

/// The operation set a descriptor is bound to.
///
/// Built-ins are dispatched with a `match` straight to their concrete type,
/// so each call monomorphizes and inlines; only custom strategies go through
/// a vtable.
enum Binding<P: Platform> {
    Unbound,
    #[cfg(feature = "lockfree")]
    LockFree,
    #[cfg(feature = "irq-masked")]
    IrqMasked,
    #[cfg(feature = "mutex")]
    Mutex,
    Custom {
        tag: u8,
        ops: &'static dyn Strategy<P>,
    },
}

impl<P: Platform> Binding<P> {
    fn kind(&self) -> Option<StrategyKind> {
        match self {
            Self::Unbound => None,
            #[cfg(feature = "lockfree")]
            Self::LockFree => Some(StrategyKind::LockFree),
            #[cfg(feature = "irq-masked")]
            Self::IrqMasked => Some(StrategyKind::IrqMasked),
            #[cfg(feature = "mutex")]
            Self::Mutex => Some(StrategyKind::Mutex),
            Self::Custom { tag, .. } => Some(StrategyKind::Custom(*tag)),
        }
    }
}

/// Routes one operation to the bound strategy, or records the fault and
/// yields `$fallback` on an unbound descriptor.
macro_rules! dispatch {
    ($rb:expr, $fallback:expr, $op:ident($($arg:expr),*)) => {
        match &$rb.binding {
            #[cfg(feature = "lockfree")]
            Binding::LockFree => <LockFree as Strategy<P>>::$op(&LockFree, &$rb.core $(, $arg)*),
            #[cfg(feature = "irq-masked")]
            Binding::IrqMasked => <IrqMasked as Strategy<P>>::$op(&IrqMasked, &$rb.core $(, $arg)*),
            #[cfg(feature = "mutex")]
            Binding::Mutex => <MutexLocked as Strategy<P>>::$op(&MutexLocked, &$rb.core $(, $arg)*),
            Binding::Custom { ops, .. } => ops.$op(&$rb.core $(, $arg)*),
            Binding::Unbound => {
                $rb.unbound_call(stringify!($op));
                $fallback
            }
        }
    };
}

/// A circular byte buffer over caller-supplied storage.
///
/// The descriptor borrows its storage for `'a` and never allocates. It is
/// created unbound ([`new`](Self::new)), bound to storage and a strategy by
/// [`create`](Self::create), and returned to the unbound state by
/// [`destroy`](Self::destroy) or drop.
///
/// All data-path methods take `&self`, so one descriptor can be shared
/// between a producer and a consumer context. What sharing is allowed
/// depends on the strategy: see [`LockFree`](crate::LockFree),
/// [`IrqMasked`](crate::IrqMasked) and [`MutexLocked`](crate::MutexLocked).
///
/// Usable capacity is one less than the storage length.
///
/// # Example
///
/// ```
/// use ringsync_rs::{RingBuffer, StrategyKind};
///
/// let mut storage = [0u8; 64];
/// let rb: RingBuffer = RingBuffer::with_strategy(&mut storage, StrategyKind::LockFree).unwrap();
///
/// assert_eq!(rb.write_many(b"hello"), 5);
/// let mut out = [0u8; 8];
/// let n = rb.read_many(&mut out);
/// assert_eq!(&out[..n], b"hello");
/// ```
pub struct RingBuffer<'a, P: Platform = DefaultPlatform> {
    core: RingCore<'a, P>,
    binding: Binding<P>,
    last_error: LastError,
}

impl<'a, P: Platform> RingBuffer<'a, P> {
    /// Creates an unbound descriptor. Every data call on it fails safely
    /// until [`create`](Self::create) succeeds.
    pub const fn new() -> Self {
        Self {
            core: RingCore::unbound(),
            binding: Binding::Unbound,
            last_error: LastError::new(),
        }
    }

    /// Creates and binds a descriptor in one step.
    pub fn with_strategy(storage: &'a mut [u8], kind: StrategyKind) -> Result<Self, RingError> {
        let mut rb = Self::new();
        rb.create(storage, kind)?;
        Ok(rb)
    }

    // ---------------------------------------------------------------------
    // FACTORY
    // ---------------------------------------------------------------------

    /// Binds `storage` and the strategy selected by `kind`, with both indices
    /// at zero.
    ///
    /// A descriptor that is already bound is destroyed first. On any error
    /// the descriptor is left unbound and the failure is also recorded in
    /// [`last_error`](Self::last_error).
    ///
    /// # Errors
    ///
    /// - [`RingError::InvalidCapacity`] if `storage.len() < MIN_CAPACITY`
    /// - [`RingError::UnsupportedStrategy`] if the built-in was compiled out
    ///   or no custom strategy is registered under the tag
    /// - [`RingError::MutexCreateFailed`] if the mutex strategy cannot get a lock
    pub fn create(&mut self, storage: &'a mut [u8], kind: StrategyKind) -> Result<(), RingError> {
        if self.is_bound() {
            self.destroy();
        }

        let result = Self::resolve(storage.len(), StrategyKind::from_tag(kind.tag()));
        match result {
            Ok((binding, lock)) => {
                self.core = RingCore::new(storage, lock);
                self.binding = binding;
                self.last_error.clear();
                rb_info!(
                    "created {:?} ring buffer (capacity={})",
                    self.binding.kind(),
                    self.core.capacity()
                );
                Ok(())
            }
            Err(e) => {
                self.last_error.set(e.code());
                rb_error!("ring buffer creation failed: {}", e);
                Err(e)
            }
        }
    }

    /// Validates parameters and acquires whatever the strategy needs.
    fn resolve(
        capacity: usize,
        kind: StrategyKind,
    ) -> Result<(Binding<P>, Option<P::Mutex>), RingError> {
        if capacity < MIN_CAPACITY {
            return Err(RingError::InvalidCapacity {
                capacity,
                min: MIN_CAPACITY,
            });
        }

        match kind {
            #[cfg(feature = "lockfree")]
            StrategyKind::LockFree => Ok((Binding::LockFree, None)),
            #[cfg(feature = "irq-masked")]
            StrategyKind::IrqMasked => Ok((Binding::IrqMasked, None)),
            #[cfg(feature = "mutex")]
            StrategyKind::Mutex => match P::Mutex::create() {
                Some(mutex) if mutex.is_valid() => Ok((Binding::Mutex, Some(mutex))),
                Some(mutex) => {
                    mutex.destroy();
                    Err(RingError::MutexCreateFailed)
                }
                None => Err(RingError::MutexCreateFailed),
            },
            StrategyKind::Custom(tag) => P::registry()
                .lookup(tag)
                .map(|ops| (Binding::Custom { tag, ops }, None))
                .ok_or(RingError::UnsupportedStrategy(tag)),
            #[allow(unreachable_patterns)]
            other => {
                debug_assert!(!builtin_enabled(other.tag()));
                Err(RingError::UnsupportedStrategy(other.tag()))
            }
        }
    }

    /// Releases the lock resource (if any) and resets the descriptor to the
    /// unbound state: no storage, zero capacity, zero indices, no strategy.
    ///
    /// Calling it again is a no-op on the already released lock.
    pub fn destroy(&mut self) {
        if let Some(lock) = self.core.take_lock() {
            lock.destroy();
        }
        if self.is_bound() {
            rb_info!("destroyed {:?} ring buffer", self.binding.kind());
        }
        self.core = RingCore::unbound();
        self.binding = Binding::Unbound;
        self.last_error.clear();
    }

    // ---------------------------------------------------------------------
    // PRODUCER API
    // ---------------------------------------------------------------------

    /// Stores one byte. Returns false if the ring is full or unbound.
    #[inline]
    pub fn write(&self, byte: u8) -> bool {
        dispatch!(self, false, write(byte))
    }

    /// Stores the longest prefix of `bytes` that fits and returns its length.
    ///
    /// A count below `bytes.len()` is a partial write: the rest is not
    /// stored and not retried. Check [`free_space`](Self::free_space) first
    /// if the write must be all-or-nothing.
    #[inline]
    pub fn write_many(&self, bytes: &[u8]) -> usize {
        dispatch!(self, 0, write_many(bytes))
    }

    /// Like [`write`](Self::write), reporting why nothing was stored.
    pub fn try_write(&self, byte: u8) -> Result<(), RingError> {
        if !self.is_bound() {
            self.unbound_call("try_write");
            return Err(RingError::NotBound);
        }
        if self.write(byte) {
            Ok(())
        } else {
            Err(RingError::Full)
        }
    }

    // ---------------------------------------------------------------------
    // CONSUMER API
    // ---------------------------------------------------------------------

    /// Removes and returns the oldest byte; `None` if empty or unbound.
    #[inline]
    pub fn read(&self) -> Option<u8> {
        dispatch!(self, None, read())
    }

    /// Reads up to `out.len()` of the oldest bytes into the front of `out`
    /// and returns how many were read.
    #[inline]
    pub fn read_many(&self, out: &mut [u8]) -> usize {
        dispatch!(self, 0, read_many(out))
    }

    /// Like [`read`](Self::read), reporting why nothing was returned.
    pub fn try_read(&self) -> Result<u8, RingError> {
        if !self.is_bound() {
            self.unbound_call("try_read");
            return Err(RingError::NotBound);
        }
        self.read().ok_or(RingError::Empty)
    }

    /// Discards all unread bytes. Logical only: storage is not wiped.
    #[inline]
    pub fn clear(&self) {
        dispatch!(self, (), clear());
    }

    // ---------------------------------------------------------------------
    // STATUS
    // ---------------------------------------------------------------------

    /// Bytes waiting to be read.
    #[inline]
    pub fn available(&self) -> usize {
        dispatch!(self, 0, available())
    }

    /// Bytes that can be written before the ring is full.
    #[inline]
    pub fn free_space(&self) -> usize {
        dispatch!(self, 0, free_space())
    }

    /// True if nothing can be read. An unbound descriptor reports empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        dispatch!(self, true, is_empty())
    }

    /// True if nothing can be written. An unbound descriptor reports not
    /// full; its writes fail with `NotBound` instead.
    #[inline]
    pub fn is_full(&self) -> bool {
        dispatch!(self, false, is_full())
    }

    /// Storage length in slots (zero when unbound).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.core.capacity()
    }

    /// Maximum number of bytes the ring can hold.
    #[inline]
    pub fn usable_capacity(&self) -> usize {
        usable_capacity(self.core.capacity())
    }

    /// Current write index, for diagnostics.
    #[inline]
    pub fn head(&self) -> usize {
        self.core.head()
    }

    /// Current read index, for diagnostics.
    #[inline]
    pub fn tail(&self) -> usize {
        self.core.tail()
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        !matches!(self.binding, Binding::Unbound)
    }

    /// The strategy this descriptor is bound to.
    #[inline]
    pub fn strategy(&self) -> Option<StrategyKind> {
        self.binding.kind()
    }

    /// Name of the bound strategy, for logs.
    pub fn strategy_name(&self) -> Option<&'static str> {
        match &self.binding {
            Binding::Unbound => None,
            #[cfg(feature = "lockfree")]
            Binding::LockFree => Some(<LockFree as Strategy<P>>::name(&LockFree)),
            #[cfg(feature = "irq-masked")]
            Binding::IrqMasked => Some(<IrqMasked as Strategy<P>>::name(&IrqMasked)),
            #[cfg(feature = "mutex")]
            Binding::Mutex => Some(<MutexLocked as Strategy<P>>::name(&MutexLocked)),
            Binding::Custom { ops, .. } => Some(ops.name()),
        }
    }

    /// True if the mutex strategy holds a lock resource for this descriptor.
    #[inline]
    pub fn has_lock(&self) -> bool {
        self.core.lock_handle().is_some()
    }

    // ---------------------------------------------------------------------
    // DIAGNOSTICS
    // ---------------------------------------------------------------------

    /// Most recent fault recorded on this descriptor.
    ///
    /// Advisory: it is overwritten by later faults, never set for full or
    /// empty conditions, and must not drive control flow.
    #[inline]
    pub fn last_error(&self) -> ErrorCode {
        self.last_error.get()
    }

    #[inline]
    pub fn clear_last_error(&self) {
        self.last_error.clear();
    }

    /// Snapshot of the advisory transfer counters.
    #[cfg(feature = "statistics")]
    pub fn stats(&self) -> Statistics {
        self.core.statistics()
    }

    #[cold]
    fn unbound_call(&self, op: &'static str) {
        self.last_error.set(ErrorCode::NullPointer);
        rb_warn!("{} called on an unbound ring buffer", op);
    }
}

impl<P: Platform> Default for RingBuffer<'_, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Platform> Drop for RingBuffer<'_, P> {
    fn drop(&mut self) {
        if let Some(lock) = self.core.take_lock() {
            lock.destroy();
        }
    }
}

impl<P: Platform> core::fmt::Debug for RingBuffer<'_, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RingBuffer")
            .field("strategy", &self.strategy())
            .field("core", &self.core)
            .field("last_error", &self.last_error())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CUSTOM_TAG_BASE;

    #[test]
    fn test_unbound_descriptor_fails_safely() {
        let rb: RingBuffer = RingBuffer::new();
        assert!(!rb.is_bound());
        assert!(!rb.write(1));
        assert_eq!(rb.last_error(), ErrorCode::NullPointer);
        rb.clear_last_error();

        assert_eq!(rb.read(), None);
        assert_eq!(rb.write_many(&[1, 2]), 0);
        assert_eq!(rb.read_many(&mut [0; 2]), 0);
        assert_eq!(rb.available(), 0);
        assert_eq!(rb.free_space(), 0);
        assert!(rb.is_empty());
        assert!(!rb.is_full());
        rb.clear();
        assert_eq!(rb.try_write(1), Err(RingError::NotBound));
        assert_eq!(rb.try_read(), Err(RingError::NotBound));
        assert_eq!(rb.last_error(), ErrorCode::NullPointer);
        assert_eq!(rb.capacity(), 0);
        assert_eq!(rb.strategy(), None);
        assert_eq!(rb.strategy_name(), None);
    }

    #[cfg(feature = "lockfree")]
    #[test]
    fn test_create_and_destroy() {
        let mut storage = [0u8; 256];
        let mut rb: RingBuffer = RingBuffer::new();

        rb.create(&mut storage, StrategyKind::LockFree).unwrap();
        assert!(rb.is_bound());
        assert_eq!(rb.capacity(), 256);
        assert_eq!(rb.usable_capacity(), 255);
        assert_eq!(rb.head(), 0);
        assert_eq!(rb.tail(), 0);
        assert_eq!(rb.strategy(), Some(StrategyKind::LockFree));
        assert_eq!(rb.strategy_name(), Some("lockfree"));
        assert!(!rb.has_lock());
        assert!(rb.last_error().is_ok());

        rb.destroy();
        assert!(!rb.is_bound());
        assert_eq!(rb.capacity(), 0);
        assert_eq!(rb.head(), 0);
        assert_eq!(rb.tail(), 0);
        assert!(!rb.write(1));

        // Second destroy is harmless
        rb.destroy();
        assert!(!rb.is_bound());
    }

    #[test]
    fn test_capacity_below_minimum() {
        let mut storage = [0u8; 1];
        let mut rb: RingBuffer = RingBuffer::new();

        assert_eq!(
            rb.create(&mut storage, StrategyKind::LockFree),
            Err(RingError::InvalidCapacity { capacity: 1, min: 2 })
        );
        assert_eq!(rb.last_error(), ErrorCode::InvalidSize);
        assert!(!rb.is_bound());
        assert!(!rb.write(1));
    }

    #[test]
    fn test_unregistered_custom_tag() {
        let mut storage = [0u8; 8];
        let tag = u8::MAX;
        assert!(tag >= CUSTOM_TAG_BASE);

        let err = RingBuffer::<DefaultPlatform>::with_strategy(&mut storage, StrategyKind::Custom(tag))
            .unwrap_err();
        assert_eq!(err, RingError::UnsupportedStrategy(tag));
    }

    #[cfg(feature = "mutex")]
    #[test]
    fn test_mutex_strategy_owns_a_lock() {
        let mut storage = [0u8; 16];
        let mut rb: RingBuffer = RingBuffer::with_strategy(&mut storage, StrategyKind::Mutex).unwrap();
        assert!(rb.has_lock());
        assert!(rb.write(7));
        assert_eq!(rb.read(), Some(7));

        rb.destroy();
        assert!(!rb.has_lock());
    }

    #[cfg(all(feature = "lockfree", feature = "mutex"))]
    #[test]
    fn test_recreate_releases_previous_binding() {
        let mut first = [0u8; 8];
        let mut second = [0u8; 4];
        let mut rb: RingBuffer = RingBuffer::with_strategy(&mut first, StrategyKind::Mutex).unwrap();
        rb.write_many(&[1, 2, 3]);

        rb.create(&mut second, StrategyKind::LockFree).unwrap();
        assert!(!rb.has_lock());
        assert_eq!(rb.capacity(), 4);
        assert!(rb.is_empty());
    }

    #[cfg(feature = "lockfree")]
    #[test]
    fn test_try_variants_report_state() {
        let mut storage = [0u8; 2];
        let rb: RingBuffer = RingBuffer::with_strategy(&mut storage, StrategyKind::LockFree).unwrap();

        assert_eq!(rb.try_read(), Err(RingError::Empty));
        rb.try_write(5).unwrap();
        assert_eq!(rb.try_write(6), Err(RingError::Full));
        assert_eq!(rb.try_read(), Ok(5));
        // State conditions never land in the fault slot
        assert!(rb.last_error().is_ok());
    }
}
