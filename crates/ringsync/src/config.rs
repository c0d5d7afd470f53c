//! Build-time tuning constants.
//!
//! Which built-in strategies exist is selected with cargo features
//! (`lockfree`, `irq-masked`, `mutex`); the values here are fixed for every
//! build.

/// Smallest storage length accepted by the factory.
///
/// One slot is always left unused so that `head == tail` means empty and
/// `head + 1 == tail` means full, so two slots hold exactly one byte.
pub const MIN_CAPACITY: usize = 2;

/// First tag of the custom strategy range. Tags below this are reserved for
/// the built-in strategies.
pub const CUSTOM_TAG_BASE: u8 = 3;

/// Number of custom strategies a registry can hold.
pub const MAX_CUSTOM_STRATEGIES: usize = 4;

/// Bytes a ring of `capacity` slots can actually hold.
#[inline]
pub const fn usable_capacity(capacity: usize) -> usize {
    capacity.saturating_sub(1)
}

/// Returns true if the built-in strategy with `tag` was compiled in.
pub const fn builtin_enabled(tag: u8) -> bool {
    match tag {
        0 => cfg!(feature = "lockfree"),
        1 => cfg!(feature = "irq-masked"),
        2 => cfg!(feature = "mutex"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_capacity() {
        assert_eq!(usable_capacity(8), 7);
        assert_eq!(usable_capacity(MIN_CAPACITY), 1);
        assert_eq!(usable_capacity(0), 0);
    }

    #[test]
    fn test_custom_tags_are_never_builtin() {
        for tag in CUSTOM_TAG_BASE..=u8::MAX {
            assert!(!builtin_enabled(tag));
        }
    }
}
