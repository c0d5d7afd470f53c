use crate::config::MIN_CAPACITY;
use crate::invariants::{
    debug_assert_bounded_count, debug_assert_index_in_bounds, debug_assert_transfer_within,
};
use crate::logging::{rb_info, rb_warn};
use crate::platform::{DefaultPlatform, Platform};
#[cfg(feature = "statistics")]
use crate::stats::{Statistics, Stats};
use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use crossbeam_utils::CachePadded;

// =============================================================================
// INDEX PROTOCOL
// =============================================================================
//
// `head` and `tail` are wrapped indices in [0, capacity). One slot is always
// left unused, so:
// - empty  ⟺ head == tail
// - full   ⟺ (head + 1) mod capacity == tail
// - count  = head ≥ tail ? head - tail : capacity - tail + head
//
// **Producer (write path):**
// 1. Load `head` with Relaxed (only the producer writes head)
// 2. Load `tail` with Acquire (synchronizes with the consumer's Release)
// 3. Store bytes into slots [head, head + n) with Relaxed
// 4. Store `head` with Release (publishes the bytes to the consumer)
//
// **Consumer (read path):**
// 1. Load `tail` with Relaxed (only the consumer writes tail)
// 2. Load `head` with Acquire (synchronizes with the producer's Release)
// 3. Load bytes from slots [tail, tail + n) with Relaxed
// 4. Store `tail` with Release (hands the slots back to the producer)
//
// Storage slots are `AtomicU8`. Under the SPSC contract every slot has one
// writer at a time and the index handoff orders the accesses; if the contract
// is broken the bytes may be garbage, but there is no data race.
//
// The interrupt-masked and mutex strategies run these same paths inside their
// critical section, where the orderings are simply stronger than needed.
// =============================================================================

/// The circular byte algorithm over caller-supplied storage.
///
/// `RingCore` does no synchronization of its own. Strategies receive a
/// `&RingCore` and decide what surrounds each call; custom strategies use the
/// methods here the same way the built-in ones do.
pub struct RingCore<'a, P: Platform = DefaultPlatform> {
    /// Caller's storage, viewed as atomics for the descriptor's lifetime.
    storage: &'a [AtomicU8],
    /// Next write position (producer-owned)
    head: CachePadded<AtomicUsize>,
    /// Next read position (consumer-owned)
    tail: CachePadded<AtomicUsize>,
    /// Lock created by the mutex strategy, if any.
    lock: Option<P::Mutex>,
    #[cfg(feature = "statistics")]
    stats: Stats,
}

/// Reinterprets exclusively borrowed bytes as atomics.
#[inline]
fn as_atomic(bytes: &mut [u8]) -> &[AtomicU8] {
    // SAFETY: `AtomicU8` has the same size, alignment and bit validity as
    // `u8`, and the exclusive borrow rules out any non-atomic access to these
    // bytes for as long as the returned slice lives.
    unsafe { &*(bytes as *mut [u8] as *const [AtomicU8]) }
}

#[inline]
fn count(head: usize, tail: usize, capacity: usize) -> usize {
    if head >= tail {
        head - tail
    } else {
        capacity - tail + head
    }
}

/// `index mod capacity` for `index < 2 * capacity`.
#[inline]
fn wrap(index: usize, capacity: usize) -> usize {
    if index >= capacity {
        index - capacity
    } else {
        index
    }
}

#[inline]
fn store_bytes(dst: &[AtomicU8], src: &[u8]) {
    for (slot, &byte) in dst.iter().zip(src) {
        slot.store(byte, Ordering::Relaxed);
    }
}

#[inline]
fn load_bytes(dst: &mut [u8], src: &[AtomicU8]) {
    for (byte, slot) in dst.iter_mut().zip(src) {
        *byte = slot.load(Ordering::Relaxed);
    }
}

impl<'a, P: Platform> RingCore<'a, P> {
    /// Zero-capacity core with no storage, as held by an unbound descriptor.
    pub(crate) const fn unbound() -> Self {
        Self {
            storage: &[],
            head: CachePadded::new(AtomicUsize::new(0)),
            tail: CachePadded::new(AtomicUsize::new(0)),
            lock: None,
            #[cfg(feature = "statistics")]
            stats: Stats::new(),
        }
    }

    /// Binds `storage` with both indices at zero. The caller has already
    /// checked the length against `MIN_CAPACITY`.
    pub(crate) fn new(storage: &'a mut [u8], lock: Option<P::Mutex>) -> Self {
        debug_assert!(storage.len() >= MIN_CAPACITY, "ring of {} slots", storage.len());
        Self {
            storage: as_atomic(storage),
            lock,
            ..Self::unbound()
        }
    }

    pub(crate) fn take_lock(&mut self) -> Option<P::Mutex> {
        self.lock.take()
    }

    // ---------------------------------------------------------------------
    // STATUS
    // ---------------------------------------------------------------------

    /// Total slot count; one less than this can be stored.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Current write index.
    #[inline]
    pub fn head(&self) -> usize {
        self.head.load(Ordering::Acquire)
    }

    /// Current read index.
    #[inline]
    pub fn tail(&self) -> usize {
        self.tail.load(Ordering::Acquire)
    }

    /// Lock resource created for this descriptor, if the strategy uses one.
    #[inline]
    pub fn lock_handle(&self) -> Option<&P::Mutex> {
        self.lock.as_ref()
    }

    /// Bytes stored and not yet read.
    #[inline]
    pub fn available(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        count(head, tail, self.capacity())
    }

    /// Bytes that can be written before the ring is full.
    #[inline]
    pub fn free_space(&self) -> usize {
        self.capacity() - 1 - self.available()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        let head = self.head.load(Ordering::Acquire);
        wrap(head + 1, self.capacity()) == self.tail.load(Ordering::Acquire)
    }

    #[cfg(feature = "statistics")]
    pub fn statistics(&self) -> Statistics {
        self.stats.snapshot()
    }

    // ---------------------------------------------------------------------
    // PRODUCER API
    // ---------------------------------------------------------------------

    /// Stores one byte. Returns false, without touching the ring, when full.
    pub fn write(&self, byte: u8) -> bool {
        let capacity = self.capacity();
        let head = self.head.load(Ordering::Relaxed);
        debug_assert_index_in_bounds!("head", head, capacity);

        let next = wrap(head + 1, capacity);
        if next == self.tail.load(Ordering::Acquire) {
            // Full is a normal outcome, not worth a log line
            #[cfg(feature = "statistics")]
            self.stats.add_overflow();
            return false;
        }

        self.storage[head].store(byte, Ordering::Relaxed);
        self.head.store(next, Ordering::Release);

        #[cfg(feature = "statistics")]
        self.stats.add_writes(1);
        true
    }

    /// Stores the longest prefix of `bytes` that fits and returns its length.
    ///
    /// The remainder is dropped; nothing is buffered or retried. At most two
    /// contiguous segments are copied when the write wraps past the end of
    /// storage.
    pub fn write_many(&self, bytes: &[u8]) -> usize {
        if bytes.is_empty() {
            rb_warn!("write_many called with an empty slice");
            return 0;
        }

        let capacity = self.capacity();
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        debug_assert_index_in_bounds!("head", head, capacity);

        let stored = count(head, tail, capacity);
        debug_assert_bounded_count!(stored, capacity);
        let free = capacity - 1 - stored;
        let n = bytes.len().min(free);
        debug_assert_transfer_within!(n, bytes.len(), free);

        if n == 0 {
            #[cfg(feature = "statistics")]
            self.stats.add_overflow();
            return 0;
        }

        let first = n.min(capacity - head);
        store_bytes(&self.storage[head..head + first], &bytes[..first]);
        store_bytes(&self.storage[..n - first], &bytes[first..n]);

        self.head.store(wrap(head + n, capacity), Ordering::Release);

        #[cfg(feature = "statistics")]
        {
            self.stats.add_writes(n);
            if n < bytes.len() {
                self.stats.add_overflow();
            }
        }

        if n < bytes.len() {
            rb_warn!(
                "partial write: requested={} written={} free={}",
                bytes.len(),
                n,
                free
            );
        }

        n
    }

    // ---------------------------------------------------------------------
    // CONSUMER API
    // ---------------------------------------------------------------------

    /// Removes and returns the oldest byte, or `None` when empty.
    pub fn read(&self) -> Option<u8> {
        let capacity = self.capacity();
        let tail = self.tail.load(Ordering::Relaxed);
        debug_assert_index_in_bounds!("tail", tail, capacity);

        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }

        let byte = self.storage[tail].load(Ordering::Relaxed);
        self.tail.store(wrap(tail + 1, capacity), Ordering::Release);

        #[cfg(feature = "statistics")]
        self.stats.add_reads(1);
        Some(byte)
    }

    /// Fills the front of `out` with the oldest bytes and returns how many
    /// were read: `min(out.len(), available())`.
    pub fn read_many(&self, out: &mut [u8]) -> usize {
        if out.is_empty() {
            rb_warn!("read_many called with an empty buffer");
            return 0;
        }

        let capacity = self.capacity();
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        debug_assert_index_in_bounds!("tail", tail, capacity);

        let available = count(head, tail, capacity);
        debug_assert_bounded_count!(available, capacity);
        let n = out.len().min(available);
        debug_assert_transfer_within!(n, out.len(), available);

        if n == 0 {
            return 0;
        }

        let first = n.min(capacity - tail);
        load_bytes(&mut out[..first], &self.storage[tail..tail + first]);
        load_bytes(&mut out[first..n], &self.storage[..n - first]);

        self.tail.store(wrap(tail + n, capacity), Ordering::Release);

        #[cfg(feature = "statistics")]
        self.stats.add_reads(n);

        if n < out.len() {
            rb_warn!(
                "partial read: requested={} read={} available={}",
                out.len(),
                n,
                available
            );
        }

        n
    }

    /// Drops all unread bytes by moving `tail` to `head`.
    ///
    /// This is a consumer-side operation and a logical truncation only: the
    /// bytes stay in storage until overwritten, but can no longer be read.
    pub fn clear(&self) {
        let head = self.head.load(Ordering::Acquire);
        self.tail.store(head, Ordering::Release);

        #[cfg(feature = "statistics")]
        self.stats.reset();

        rb_info!("ring cleared (capacity={})", self.capacity());
    }
}

impl<P: Platform> core::fmt::Debug for RingCore<'_, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RingCore")
            .field("capacity", &self.capacity())
            .field("head", &self.head())
            .field("tail", &self.tail())
            .field("locked", &self.lock.is_some())
            .finish()
    }
}
