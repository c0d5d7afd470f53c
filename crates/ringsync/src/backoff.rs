use core::hint;

/// Adaptive backoff for the spin mutex (Crossbeam-style).
///
/// Progressively increases wait time: spin with PAUSE, then yield to the OS
/// when `std` is available. Without `std` it keeps spinning at the longest
/// step.
#[derive(Debug)]
pub(crate) struct Backoff {
    step: u32,
}

impl Backoff {
    const SPIN_LIMIT: u32 = 6; // 2^6 = 64 spins max before yielding

    /// Creates a new backoff instance.
    #[inline]
    pub(crate) fn new() -> Self {
        Self { step: 0 }
    }

    /// Light spin with PAUSE hints.
    #[inline]
    pub(crate) fn spin(&mut self) {
        let spins = 1 << self.step.min(Self::SPIN_LIMIT);
        for _ in 0..spins {
            hint::spin_loop();
        }
        if self.step <= Self::SPIN_LIMIT {
            self.step += 1;
        }
    }

    /// Heavier backoff: spin, then yield once spinning stops paying off.
    #[inline]
    pub(crate) fn snooze(&mut self) {
        if self.step <= Self::SPIN_LIMIT {
            self.spin();
        } else {
            #[cfg(feature = "std")]
            std::thread::yield_now();
            #[cfg(not(feature = "std"))]
            self.spin();
        }
    }

    /// True once spinning has reached its longest step.
    #[cfg(test)]
    fn is_yielding(&self) -> bool {
        self.step > Self::SPIN_LIMIT
    }
}
