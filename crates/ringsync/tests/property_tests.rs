//! Property-based tests: every strategy against a `VecDeque` model.
//!
//! Each case builds a ring of random capacity, applies a random operation
//! sequence to both the ring and the model, and checks after every step that
//! results agree and that `free_space() + available() == capacity - 1`.

use proptest::prelude::*;
use ringsync_rs::{RingBuffer, StrategyKind};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Op {
    Write(u8),
    WriteMany(Vec<u8>),
    Read,
    ReadMany(usize),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u8>().prop_map(Op::Write),
        4 => prop::collection::vec(any::<u8>(), 0..24).prop_map(Op::WriteMany),
        4 => Just(Op::Read),
        4 => (0usize..24).prop_map(Op::ReadMany),
        1 => Just(Op::Clear),
    ]
}

/// Built-in strategies compiled into this build.
const BUILTINS: &[StrategyKind] = &[
    #[cfg(feature = "lockfree")]
    StrategyKind::LockFree,
    #[cfg(feature = "irq-masked")]
    StrategyKind::IrqMasked,
    #[cfg(feature = "mutex")]
    StrategyKind::Mutex,
];

fn kind_strategy() -> impl Strategy<Value = StrategyKind> {
    prop::sample::select(BUILTINS)
}

// =============================================================================
// MODEL AGREEMENT
// =============================================================================

proptest! {
    #[test]
    fn prop_matches_fifo_model(
        capacity in 2usize..40,
        kind in kind_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..120),
    ) {
        let mut storage = vec![0u8; capacity];
        let rb: RingBuffer = RingBuffer::with_strategy(&mut storage, kind).unwrap();
        let usable = capacity - 1;
        let mut model: VecDeque<u8> = VecDeque::new();

        for op in ops {
            match op {
                Op::Write(byte) => {
                    let accepted = rb.write(byte);
                    prop_assert_eq!(accepted, model.len() < usable);
                    if accepted {
                        model.push_back(byte);
                    }
                }
                Op::WriteMany(bytes) => {
                    let free_before = rb.free_space();
                    let n = rb.write_many(&bytes);
                    prop_assert_eq!(n, bytes.len().min(free_before));
                    model.extend(&bytes[..n]);
                }
                Op::Read => {
                    prop_assert_eq!(rb.read(), model.pop_front());
                }
                Op::ReadMany(max) => {
                    let available_before = rb.available();
                    let mut out = vec![0u8; max];
                    let n = rb.read_many(&mut out);
                    prop_assert_eq!(n, max.min(available_before));
                    let expected: Vec<u8> = model.drain(..n).collect();
                    prop_assert_eq!(&out[..n], &expected[..]);
                }
                Op::Clear => {
                    rb.clear();
                    model.clear();
                    prop_assert!(rb.is_empty());
                }
            }

            prop_assert_eq!(rb.available(), model.len());
            prop_assert_eq!(rb.free_space() + rb.available(), usable);
            prop_assert_eq!(rb.is_empty(), model.is_empty());
            prop_assert_eq!(rb.is_full(), model.len() == usable);
            prop_assert!(rb.head() < capacity && rb.tail() < capacity);
        }
    }
}

// =============================================================================
// BULK TRANSFER PREFIXES
// =============================================================================

proptest! {
    /// A write larger than the free space stores exactly the leading bytes
    /// that fit, regardless of where the indices start.
    #[test]
    fn prop_write_many_stores_prefix(
        capacity in 2usize..32,
        kind in kind_strategy(),
        offset in 0usize..32,
        bytes in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        let mut storage = vec![0u8; capacity];
        let rb: RingBuffer = RingBuffer::with_strategy(&mut storage, kind).unwrap();

        // Rotate the indices so the write may wrap
        for _ in 0..offset % capacity {
            rb.write(0);
            rb.read();
        }

        let n = rb.write_many(&bytes);
        prop_assert_eq!(n, bytes.len().min(capacity - 1));

        let mut out = vec![0u8; capacity];
        let read = rb.read_many(&mut out);
        prop_assert_eq!(read, n);
        prop_assert_eq!(&out[..n], &bytes[..n]);
    }

    /// Split reads return the same stream as a single read.
    #[test]
    fn prop_split_reads_preserve_order(
        kind in kind_strategy(),
        bytes in prop::collection::vec(any::<u8>(), 1..31),
        split in 0usize..31,
    ) {
        let mut storage = [0u8; 32];
        let rb: RingBuffer = RingBuffer::with_strategy(&mut storage, kind).unwrap();
        prop_assert_eq!(rb.write_many(&bytes), bytes.len());

        let split = split.min(bytes.len());
        let mut head = vec![0u8; split];
        let mut rest = vec![0u8; bytes.len()];
        let a = if split == 0 { 0 } else { rb.read_many(&mut head) };
        let b = rb.read_many(&mut rest);

        prop_assert_eq!(a + b, bytes.len());
        prop_assert_eq!(&head[..a], &bytes[..a]);
        prop_assert_eq!(&rest[..b], &bytes[a..]);
    }
}
