//! Fixed-capacity table of user-supplied strategies.
//!
//! Registrations are append-only and last for the life of the registry
//! (normally the whole program, as registries live in `static`s). The table
//! is tiny, so lookup is a linear scan.

use crate::config::{CUSTOM_TAG_BASE, MAX_CUSTOM_STRATEGIES};
use crate::error::RingError;
use crate::logging::rb_debug;
use crate::platform::{DefaultPlatform, Platform};
use crate::strategy::Strategy;
use core::cell::RefCell;
use critical_section::Mutex;

struct Entry<P: Platform> {
    tag: u8,
    strategy: &'static dyn Strategy<P>,
}

// Manual impls: a derive would demand `P: Copy`.
impl<P: Platform> Clone for Entry<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: Platform> Copy for Entry<P> {}

struct Table<P: Platform, const N: usize> {
    entries: [Option<Entry<P>>; N],
    len: usize,
}

impl<P: Platform, const N: usize> Table<P, N> {
    fn find(&self, tag: u8) -> Option<&'static dyn Strategy<P>> {
        self.entries[..self.len]
            .iter()
            .flatten()
            .find(|entry| entry.tag == tag)
            .map(|entry| entry.strategy)
    }
}

/// Table mapping custom tags to strategies.
///
/// Guarded by a `critical-section` mutex so it can be registered into from
/// any context and read by the factory; `new` is `const` for use in statics.
pub struct StrategyRegistry<P: Platform = DefaultPlatform, const N: usize = MAX_CUSTOM_STRATEGIES>
{
    table: Mutex<RefCell<Table<P, N>>>,
}

impl<P: Platform, const N: usize> StrategyRegistry<P, N> {
    const EMPTY: Option<Entry<P>> = None;

    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            table: Mutex::new(RefCell::new(Table {
                entries: [Self::EMPTY; N],
                len: 0,
            })),
        }
    }

    /// Adds `strategy` under `tag`.
    ///
    /// Fails if `tag` is below [`CUSTOM_TAG_BASE`], if the table is full, or if
    /// `tag` is already taken. Checks run in that order.
    pub fn register(&self, tag: u8, strategy: &'static dyn Strategy<P>) -> Result<(), RingError> {
        let result = if tag < CUSTOM_TAG_BASE {
            Err(RingError::ReservedTag(tag))
        } else {
            critical_section::with(|cs| {
                let mut table = self.table.borrow_ref_mut(cs);
                if table.len >= N {
                    return Err(RingError::RegistryFull { capacity: N });
                }
                if table.find(tag).is_some() {
                    return Err(RingError::AlreadyRegistered(tag));
                }
                let slot = table.len;
                table.entries[slot] = Some(Entry { tag, strategy });
                table.len += 1;
                Ok(())
            })
        };

        match &result {
            Ok(()) => rb_debug!("registered strategy '{}' under tag {}", strategy.name(), tag),
            Err(e) => rb_debug!("rejected strategy registration for tag {}: {}", tag, e),
        }
        result
    }

    /// Returns the strategy registered under `tag`.
    pub fn lookup(&self, tag: u8) -> Option<&'static dyn Strategy<P>> {
        critical_section::with(|cs| self.table.borrow_ref(cs).find(tag))
    }

    #[inline]
    pub fn contains(&self, tag: u8) -> bool {
        self.lookup(tag).is_some()
    }

    /// Number of registered strategies.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.table.borrow_ref(cs).len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of strategies.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<P: Platform, const N: usize> Default for StrategyRegistry<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Platform, const N: usize> core::fmt::Debug for StrategyRegistry<P, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("len", &self.len())
            .field("capacity", &N)
            .finish()
    }
}

/// Registers `strategy` in the platform's registry, making `tag` usable with
/// [`RingBuffer::create`](crate::RingBuffer::create).
pub fn register_strategy<P: Platform>(
    tag: u8,
    strategy: &'static dyn Strategy<P>,
) -> Result<(), RingError> {
    P::registry().register(tag, strategy)
}
