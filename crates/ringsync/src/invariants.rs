//! Debug assertion macros for ring index invariants.
//!
//! Only active in debug builds (`debug_assert!`), so release firmware pays
//! nothing for them. Used by `RingCore`.

// =============================================================================
// INDEX BOUNDS
// =============================================================================

/// Assert that a head or tail index lies inside the storage.
///
/// **Invariant**: `0 ≤ index < capacity`
///
/// Used in: every core operation after loading an index
macro_rules! debug_assert_index_in_bounds {
    ($name:literal, $index:expr, $capacity:expr) => {
        debug_assert!(
            $index < $capacity,
            "{} index {} outside storage of {} slots",
            $name,
            $index,
            $capacity
        )
    };
}

// =============================================================================
// BOUNDED COUNT
// =============================================================================

/// Assert that the number of stored bytes never reaches capacity.
///
/// **Invariant**: `available ≤ capacity - 1` (one slot always stays empty)
///
/// Used in: `write_many()` and `read_many()` before copying
macro_rules! debug_assert_bounded_count {
    ($count:expr, $capacity:expr) => {
        debug_assert!(
            $count < $capacity,
            "{} bytes stored in a ring of {} slots (one must stay free)",
            $count,
            $capacity
        )
    };
}

// =============================================================================
// TRANSFER BOUNDS
// =============================================================================

/// Assert that a multi-byte transfer moves no more than is possible.
///
/// **Invariant**: `n ≤ min(requested, limit)`
///
/// Used in: `write_many()` against free space, `read_many()` against available
macro_rules! debug_assert_transfer_within {
    ($n:expr, $requested:expr, $limit:expr) => {
        debug_assert!(
            $n <= $requested && $n <= $limit,
            "transfer of {} exceeds request {} or limit {}",
            $n,
            $requested,
            $limit
        )
    };
}

pub(crate) use debug_assert_bounded_count;
pub(crate) use debug_assert_index_in_bounds;
pub(crate) use debug_assert_transfer_within;
