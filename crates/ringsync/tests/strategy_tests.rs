//! Strategy behaviour against instrumented platforms.
//!
//! `MockIrq` records interrupt masking per thread so the interrupt-masked
//! strategy can be checked for nesting and for rejecting bad parameters
//! before masking. The mutex platforms exercise lock creation failure, locks
//! that come back unusable, and release.

use ringsync_rs::{
    with_masked, CriticalSectionIrq, ErrorCode, InterruptControl, Platform, RawMutex, RingBuffer,
    RingError, SpinMutex, StrategyKind, StrategyRegistry,
};
use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};

// =============================================================================
// MOCK INTERRUPT CONTROLLER
// =============================================================================

thread_local! {
    static MASKED: Cell<bool> = const { Cell::new(false) };
    static MASK_CALLS: Cell<usize> = const { Cell::new(0) };
}

struct MockIrq;

impl InterruptControl for MockIrq {
    type State = bool;

    unsafe fn save_and_disable() -> bool {
        MASK_CALLS.with(|c| c.set(c.get() + 1));
        MASKED.with(|m| m.replace(true))
    }

    unsafe fn restore(was_masked: bool) {
        MASKED.with(|m| m.set(was_masked));
    }
}

fn masked() -> bool {
    MASKED.with(Cell::get)
}

fn mask_calls() -> usize {
    MASK_CALLS.with(Cell::get)
}

struct MockIrqPlatform;

impl Platform for MockIrqPlatform {
    type Irq = MockIrq;
    type Mutex = SpinMutex;

    fn registry() -> &'static StrategyRegistry<Self> {
        static REGISTRY: StrategyRegistry<MockIrqPlatform> = StrategyRegistry::new();
        &REGISTRY
    }
}

#[cfg(feature = "irq-masked")]
#[test]
fn test_irq_masked_masks_once_per_call() {
    let mut storage = [0u8; 8];
    let rb = RingBuffer::<MockIrqPlatform>::with_strategy(&mut storage, StrategyKind::IrqMasked).unwrap();

    let before = mask_calls();
    rb.write(1);
    rb.write_many(&[2, 3]);
    rb.available();
    rb.read();
    assert_eq!(mask_calls() - before, 4);
    assert!(!masked(), "interrupts must be restored after each call");
}

#[cfg(feature = "irq-masked")]
#[test]
fn test_irq_masked_preserves_outer_mask() {
    let mut storage = [0u8; 8];
    let rb = RingBuffer::<MockIrqPlatform>::with_strategy(&mut storage, StrategyKind::IrqMasked).unwrap();

    with_masked::<MockIrq, _>(|| {
        assert!(rb.write(42));
        assert!(masked(), "inner call unmasked an outer critical section");
        assert_eq!(rb.read(), Some(42));
        assert!(masked());
    });

    assert!(!masked());
}

#[cfg(feature = "irq-masked")]
#[test]
fn test_irq_masked_rejects_zero_length_before_masking() {
    let mut storage = [0u8; 8];
    let rb = RingBuffer::<MockIrqPlatform>::with_strategy(&mut storage, StrategyKind::IrqMasked).unwrap();

    let before = mask_calls();
    assert_eq!(rb.write_many(&[]), 0);
    assert_eq!(rb.read_many(&mut []), 0);
    assert_eq!(mask_calls(), before);
}

#[cfg(feature = "lockfree")]
#[test]
fn test_lockfree_never_masks() {
    let mut storage = [0u8; 8];
    let rb = RingBuffer::<MockIrqPlatform>::with_strategy(&mut storage, StrategyKind::LockFree).unwrap();

    let before = mask_calls();
    rb.write_many(&[1, 2, 3]);
    let mut out = [0u8; 3];
    rb.read_many(&mut out);
    rb.clear();
    assert_eq!(mask_calls(), before);
}

// =============================================================================
// MUTEX PLATFORMS
// =============================================================================

/// A platform that is out of lock resources.
struct Exhausted;

impl RawMutex for Exhausted {
    fn create() -> Option<Self> {
        None
    }

    fn lock(&self) {}

    unsafe fn unlock(&self) {}
}

struct ExhaustedPlatform;

impl Platform for ExhaustedPlatform {
    type Irq = CriticalSectionIrq;
    type Mutex = Exhausted;

    fn registry() -> &'static StrategyRegistry<Self> {
        static REGISTRY: StrategyRegistry<ExhaustedPlatform> = StrategyRegistry::new();
        &REGISTRY
    }
}

#[cfg(feature = "mutex")]
#[test]
fn test_mutex_create_failure_leaves_descriptor_unbound() {
    let mut storage = [0u8; 8];
    let mut rb = RingBuffer::<ExhaustedPlatform>::new();

    assert_eq!(
        rb.create(&mut storage, StrategyKind::Mutex),
        Err(RingError::MutexCreateFailed)
    );
    assert_eq!(rb.last_error(), ErrorCode::MutexCreateFailed);
    assert!(!rb.is_bound());
    assert!(!rb.write(1));
    assert_eq!(rb.last_error(), ErrorCode::NullPointer);
}

static DISCARDED: AtomicUsize = AtomicUsize::new(0);

/// Creation succeeds but the handle reports itself unusable, like an RTOS
/// call that returns a handle to a deleted object.
struct Invalid;

impl RawMutex for Invalid {
    fn create() -> Option<Self> {
        Some(Self)
    }

    fn lock(&self) {}

    unsafe fn unlock(&self) {}

    fn is_valid(&self) -> bool {
        false
    }

    fn destroy(self) {
        DISCARDED.fetch_add(1, Ordering::SeqCst);
    }
}

struct InvalidPlatform;

impl Platform for InvalidPlatform {
    type Irq = CriticalSectionIrq;
    type Mutex = Invalid;

    fn registry() -> &'static StrategyRegistry<Self> {
        static REGISTRY: StrategyRegistry<InvalidPlatform> = StrategyRegistry::new();
        &REGISTRY
    }
}

// The only test touching DISCARDED.
#[cfg(feature = "mutex")]
#[test]
fn test_invalid_lock_is_released_and_rejected() {
    let mut storage = [0u8; 8];
    let mut rb = RingBuffer::<InvalidPlatform>::new();

    assert_eq!(
        rb.create(&mut storage, StrategyKind::Mutex),
        Err(RingError::MutexCreateFailed)
    );
    assert_eq!(DISCARDED.load(Ordering::SeqCst), 1, "unusable lock must be released once");
    assert_eq!(rb.last_error(), ErrorCode::MutexCreateFailed);
    assert!(!rb.is_bound());
    assert!(!rb.has_lock());
    assert_eq!(rb.strategy(), None);

    // Nothing is left to release when the descriptor goes away
    drop(rb);
    assert_eq!(DISCARDED.load(Ordering::SeqCst), 1);
}

#[cfg(feature = "irq-masked")]
#[test]
fn test_lock_free_strategies_ignore_mutex_platform() {
    let mut storage = [0u8; 8];
    let rb = RingBuffer::<ExhaustedPlatform>::with_strategy(&mut storage, StrategyKind::IrqMasked).unwrap();
    assert!(!rb.has_lock());
    assert!(rb.write(9));
    assert_eq!(rb.read(), Some(9));
}

static CREATED: AtomicUsize = AtomicUsize::new(0);
static DESTROYED: AtomicUsize = AtomicUsize::new(0);

/// Spin lock that counts resource creation and release.
struct Counted(SpinMutex);

impl RawMutex for Counted {
    fn create() -> Option<Self> {
        CREATED.fetch_add(1, Ordering::SeqCst);
        Some(Self(SpinMutex::new()))
    }

    fn lock(&self) {
        self.0.lock();
    }

    unsafe fn unlock(&self) {
        self.0.unlock();
    }

    fn destroy(self) {
        DESTROYED.fetch_add(1, Ordering::SeqCst);
    }
}

struct CountedPlatform;

impl Platform for CountedPlatform {
    type Irq = CriticalSectionIrq;
    type Mutex = Counted;

    fn registry() -> &'static StrategyRegistry<Self> {
        static REGISTRY: StrategyRegistry<CountedPlatform> = StrategyRegistry::new();
        &REGISTRY
    }
}

// The only test touching CREATED/DESTROYED, so the counts are exact.
#[cfg(feature = "mutex")]
#[test]
fn test_lock_released_exactly_once() {
    let mut first = [0u8; 8];
    let mut second = [0u8; 8];
    let mut third = [0u8; 8];

    let mut rb = RingBuffer::<CountedPlatform>::with_strategy(&mut first, StrategyKind::Mutex).unwrap();
    assert_eq!(CREATED.load(Ordering::SeqCst), 1);
    assert!(rb.write(1));

    rb.destroy();
    rb.destroy();
    assert_eq!(DESTROYED.load(Ordering::SeqCst), 1);

    // Re-creating over a bound descriptor releases the old lock first
    rb.create(&mut second, StrategyKind::Mutex).unwrap();
    rb.create(&mut third, StrategyKind::Mutex).unwrap();
    assert_eq!(CREATED.load(Ordering::SeqCst), 3);
    assert_eq!(DESTROYED.load(Ordering::SeqCst), 2);

    drop(rb);
    assert_eq!(DESTROYED.load(Ordering::SeqCst), 3);
}
