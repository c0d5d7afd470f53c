//! Error types and the per-descriptor diagnostic code.

use core::sync::atomic::{AtomicU8, Ordering};
use thiserror::Error;

/// Errors reported by construction, registration and the `try_*` data calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// The descriptor has no strategy bound (never created, failed creation,
    /// or destroyed).
    #[error("ring buffer is not bound to a strategy")]
    NotBound,

    /// Storage is shorter than the minimum ring size.
    #[error("invalid buffer size {capacity} (minimum {min})")]
    InvalidCapacity {
        /// Length of the storage passed to the factory.
        capacity: usize,
        /// The configured minimum.
        min: usize,
    },

    /// The strategy tag is disabled in this build or not registered.
    #[error("unsupported strategy type {0}")]
    UnsupportedStrategy(u8),

    /// The platform could not provide a lock for the mutex strategy.
    #[error("mutex creation failed")]
    MutexCreateFailed,

    /// The custom strategy registry has no free slot.
    #[error("custom strategy registry full (capacity: {capacity})")]
    RegistryFull {
        /// Number of slots in the registry.
        capacity: usize,
    },

    /// A strategy is already registered under this tag.
    #[error("strategy {0} already registered")]
    AlreadyRegistered(u8),

    /// The tag lies in the range reserved for built-in strategies.
    #[error("tag {0} is reserved for built-in strategies")]
    ReservedTag(u8),

    /// No space for the byte. Expected control flow, not a fault.
    #[error("ring buffer is full")]
    Full,

    /// No byte to read. Expected control flow, not a fault.
    #[error("ring buffer is empty")]
    Empty,
}

impl RingError {
    /// Returns `true` for conditions that clear up on their own once the
    /// other side makes progress.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Full | Self::Empty)
    }

    /// Numeric reason code for this error.
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotBound => ErrorCode::NullPointer,
            Self::InvalidCapacity { .. } => ErrorCode::InvalidSize,
            Self::UnsupportedStrategy(_) => ErrorCode::InvalidType,
            Self::MutexCreateFailed => ErrorCode::MutexCreateFailed,
            Self::RegistryFull { .. } => ErrorCode::RegistryFull,
            Self::AlreadyRegistered(_) => ErrorCode::AlreadyRegistered,
            Self::ReservedTag(_) => ErrorCode::CustomTypeInvalid,
            Self::Full => ErrorCode::BufferFull,
            Self::Empty => ErrorCode::BufferEmpty,
        }
    }
}

/// Compact reason codes, grouped by category:
///
/// - parameter errors: 1-19
/// - state conditions: 20-39
/// - resource errors: 40-59
/// - registry errors: 60-79
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ErrorCode {
    #[default]
    Ok = 0,

    NullPointer = 1,
    InvalidSize = 2,
    InvalidType = 3,
    InvalidOps = 4,

    BufferFull = 20,
    BufferEmpty = 21,

    MutexCreateFailed = 40,
    MutexLockFailed = 41,

    RegistryFull = 60,
    AlreadyRegistered = 61,
    CustomTypeInvalid = 62,
}

impl ErrorCode {
    /// Decodes a raw code. Unknown values yield `None`.
    pub const fn from_u8(raw: u8) -> Option<Self> {
        Some(match raw {
            0 => Self::Ok,
            1 => Self::NullPointer,
            2 => Self::InvalidSize,
            3 => Self::InvalidType,
            4 => Self::InvalidOps,
            20 => Self::BufferFull,
            21 => Self::BufferEmpty,
            40 => Self::MutexCreateFailed,
            41 => Self::MutexLockFailed,
            60 => Self::RegistryFull,
            61 => Self::AlreadyRegistered,
            62 => Self::CustomTypeInvalid,
            _ => return None,
        })
    }

    /// Human-readable description.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ok => "Success",
            Self::NullPointer => "Null pointer",
            Self::InvalidSize => "Invalid buffer size",
            Self::InvalidType => "Unsupported strategy type",
            Self::InvalidOps => "Invalid operations interface",
            Self::BufferFull => "Buffer is full",
            Self::BufferEmpty => "Buffer is empty",
            Self::MutexCreateFailed => "Mutex creation failed",
            Self::MutexLockFailed => "Mutex lock failed",
            Self::RegistryFull => "Custom strategy registry full",
            Self::AlreadyRegistered => "Strategy already registered",
            Self::CustomTypeInvalid => "Invalid custom type value",
        }
    }

    /// Describes a raw code, falling back to "Unknown error".
    pub const fn describe_raw(raw: u8) -> &'static str {
        match Self::from_u8(raw) {
            Some(code) => code.description(),
            None => "Unknown error",
        }
    }

    #[inline]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl core::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.description())
    }
}

impl From<RingError> for ErrorCode {
    fn from(err: RingError) -> Self {
        err.code()
    }
}

/// Advisory last-fault slot owned by one descriptor.
///
/// Readers racing with writers may observe a stale code; the value is for
/// diagnostics only.
#[derive(Debug)]
pub(crate) struct LastError(AtomicU8);

impl LastError {
    pub(crate) const fn new() -> Self {
        Self(AtomicU8::new(ErrorCode::Ok as u8))
    }

    #[inline]
    pub(crate) fn set(&self, code: ErrorCode) {
        self.0.store(code as u8, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn get(&self) -> ErrorCode {
        ErrorCode::from_u8(self.0.load(Ordering::Relaxed)).unwrap_or(ErrorCode::Ok)
    }

    #[inline]
    pub(crate) fn clear(&self) {
        self.set(ErrorCode::Ok);
    }
}
