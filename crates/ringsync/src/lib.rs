//! RingSync - Heap-Free Byte Ring Buffer with Pluggable Concurrency
//!
//! A fixed-capacity circular byte buffer over caller-supplied storage, for
//! firmware where the producer and consumer may be interrupt handlers, RTOS
//! tasks, or the main loop. One core algorithm is shared by every buffer; the
//! concurrency discipline is chosen per buffer at creation time.
//!
//! # Key Features
//!
//! - No allocation: storage is a borrowed `&mut [u8]`
//! - Three built-in strategies: lock-free SPSC, interrupt-masked, mutex
//! - Bulk transfers copy in at most two contiguous segments
//! - User strategies through a fixed-capacity registry
//! - `no_std`; host builds use `std` and `tracing`
//!
//! Usable capacity is one less than the storage length: one slot is always
//! left empty so full and empty can be told apart without a counter.
//!
//! # Example
//!
//! ```
//! use ringsync_rs::{RingBuffer, StrategyKind};
//!
//! let mut storage = [0u8; 128];
//! let rb: RingBuffer = RingBuffer::with_strategy(&mut storage, StrategyKind::IrqMasked).unwrap();
//!
//! // Producer side (e.g. a UART receive interrupt)
//! rb.write(b'A');
//! rb.write_many(b"T+OK\r\n");
//!
//! // Consumer side
//! let mut line = [0u8; 16];
//! let n = rb.read_many(&mut line);
//! assert_eq!(&line[..n], b"AT+OK\r\n");
//! assert!(rb.is_empty());
//! ```
//!
//! # Cargo features
//!
//! | Feature      | Default | Effect                                          |
//! |--------------|---------|-------------------------------------------------|
//! | `std`        | yes     | host `critical-section` impl, OS yield in locks |
//! | `lockfree`   | yes     | compiles in [`LockFree`]                        |
//! | `irq-masked` | yes     | compiles in [`IrqMasked`]                       |
//! | `mutex`      | yes     | compiles in [`MutexLocked`]                     |
//! | `tracing`    | yes     | log lines through `tracing`                     |
//! | `statistics` | no      | per-buffer transfer counters                    |

#![cfg_attr(not(any(feature = "std", test)), no_std)]

#[cfg(not(any(feature = "lockfree", feature = "irq-masked", feature = "mutex")))]
compile_error!("enable at least one of the `lockfree`, `irq-masked` or `mutex` features");

mod backoff;
mod buffer;
pub mod config;
mod error;
mod invariants;
mod logging;
mod platform;
mod registry;
mod ring;
#[cfg(feature = "statistics")]
mod stats;
mod strategy;

pub use buffer::RingBuffer;
pub use config::{CUSTOM_TAG_BASE, MAX_CUSTOM_STRATEGIES, MIN_CAPACITY};
pub use error::{ErrorCode, RingError};
pub use platform::{
    with_masked, CriticalSectionIrq, DefaultPlatform, InterruptControl, LockGuard, Platform,
    RawMutex, SpinMutex,
};
pub use registry::{register_strategy, StrategyRegistry};
pub use ring::RingCore;
#[cfg(feature = "statistics")]
pub use stats::Statistics;
#[cfg(feature = "irq-masked")]
pub use strategy::IrqMasked;
#[cfg(feature = "lockfree")]
pub use strategy::LockFree;
#[cfg(feature = "mutex")]
pub use strategy::MutexLocked;
pub use strategy::{Strategy, StrategyKind};
