//! Registering a user-defined strategy and binding a buffer to it.
//!
//! The strategy here rejects writes while a "bus" flag is held low and
//! otherwise masks interrupts like the built-in interrupt-masked strategy.
//!
//! Run with: cargo run --example custom_strategy

use ringsync_rs::{
    register_strategy, with_masked, CriticalSectionIrq, DefaultPlatform, RingBuffer, RingCore,
    Strategy, StrategyKind, CUSTOM_TAG_BASE,
};
use std::sync::atomic::{AtomicBool, Ordering};

struct Gated {
    open: AtomicBool,
}

impl Gated {
    fn masked<R>(&self, op: impl FnOnce() -> R) -> R {
        with_masked::<CriticalSectionIrq, _>(op)
    }
}

impl Strategy for Gated {
    fn write(&self, ring: &RingCore<'_>, byte: u8) -> bool {
        self.open.load(Ordering::Acquire) && self.masked(|| ring.write(byte))
    }

    fn read(&self, ring: &RingCore<'_>) -> Option<u8> {
        self.masked(|| ring.read())
    }

    fn write_many(&self, ring: &RingCore<'_>, bytes: &[u8]) -> usize {
        if !self.open.load(Ordering::Acquire) {
            return 0;
        }
        self.masked(|| ring.write_many(bytes))
    }

    fn read_many(&self, ring: &RingCore<'_>, out: &mut [u8]) -> usize {
        self.masked(|| ring.read_many(out))
    }

    fn available(&self, ring: &RingCore<'_>) -> usize {
        self.masked(|| ring.available())
    }

    fn free_space(&self, ring: &RingCore<'_>) -> usize {
        self.masked(|| ring.free_space())
    }

    fn is_empty(&self, ring: &RingCore<'_>) -> bool {
        self.masked(|| ring.is_empty())
    }

    fn is_full(&self, ring: &RingCore<'_>) -> bool {
        self.masked(|| ring.is_full())
    }

    fn clear(&self, ring: &RingCore<'_>) {
        self.masked(|| ring.clear());
    }

    fn name(&self) -> &'static str {
        "gated"
    }
}

static GATED: Gated = Gated {
    open: AtomicBool::new(true),
};

const GATED_TAG: u8 = CUSTOM_TAG_BASE;

fn main() {
    println!("=== Custom strategy ===\n");

    if let Err(e) = register_strategy::<DefaultPlatform>(GATED_TAG, &GATED) {
        eprintln!("registration failed: {e}");
        return;
    }

    // Tags below CUSTOM_TAG_BASE belong to the built-ins
    match register_strategy::<DefaultPlatform>(0, &GATED) {
        Ok(()) => println!("unexpected: tag 0 accepted"),
        Err(e) => println!("tag 0 rejected: {e} ({})", e.code()),
    }

    let mut storage = [0u8; 32];
    let rb: RingBuffer = match RingBuffer::with_strategy(&mut storage, StrategyKind::Custom(GATED_TAG)) {
        Ok(rb) => rb,
        Err(e) => {
            eprintln!("create failed: {e}");
            return;
        }
    };
    println!("bound to '{}'", rb.strategy_name().unwrap_or("?"));

    println!("gate open:   wrote {} bytes", rb.write_many(b"hello"));
    GATED.open.store(false, Ordering::Release);
    println!("gate closed: wrote {} bytes", rb.write_many(b" world"));
    GATED.open.store(true, Ordering::Release);

    let mut out = [0u8; 32];
    let n = rb.read_many(&mut out);
    println!("read back:   {:?}", String::from_utf8_lossy(&out[..n]));
}
