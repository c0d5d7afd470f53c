use core::sync::atomic::{AtomicU32, Ordering};

/// Snapshot of a descriptor's advisory counters.
///
/// Counters wrap on overflow and are never consulted by the ring itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Bytes written.
    pub write_count: u32,
    /// Bytes read.
    pub read_count: u32,
    /// Rejected single writes plus short or empty `write_many` calls.
    pub overflow_count: u32,
}

/// Live counters, updated with relaxed atomics from whichever context moves data.
#[derive(Debug, Default)]
pub(crate) struct Stats {
    writes: AtomicU32,
    reads: AtomicU32,
    overflows: AtomicU32,
}

impl Stats {
    pub(crate) const fn new() -> Self {
        Self {
            writes: AtomicU32::new(0),
            reads: AtomicU32::new(0),
            overflows: AtomicU32::new(0),
        }
    }

    #[inline]
    pub(crate) fn add_writes(&self, n: usize) {
        self.writes.fetch_add(n as u32, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_reads(&self, n: usize) {
        self.reads.fetch_add(n as u32, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_overflow(&self) {
        self.overflows.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn reset(&self) {
        self.writes.store(0, Ordering::Relaxed);
        self.reads.store(0, Ordering::Relaxed);
        self.overflows.store(0, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> Statistics {
        Statistics {
            write_count: self.writes.load(Ordering::Relaxed),
            read_count: self.reads.load(Ordering::Relaxed),
            overflow_count: self.overflows.load(Ordering::Relaxed),
        }
    }
}
