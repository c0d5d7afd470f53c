//! Logging shims.
//!
//! With the `tracing` feature these forward to the matching `tracing` macro.
//! Without it they expand to an unevaluated `format_args!` so the arguments
//! stay type-checked and no "unused variable" noise appears.

#[cfg(feature = "tracing")]
macro_rules! rb_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! rb_log {
    ($level:ident, $($arg:tt)+) => {
        if false {
            let _ = ::core::format_args!($($arg)+);
        }
    };
}

macro_rules! rb_debug {
    ($($arg:tt)+) => { $crate::logging::rb_log!(debug, $($arg)+) };
}

macro_rules! rb_info {
    ($($arg:tt)+) => { $crate::logging::rb_log!(info, $($arg)+) };
}

macro_rules! rb_warn {
    ($($arg:tt)+) => { $crate::logging::rb_log!(warn, $($arg)+) };
}

macro_rules! rb_error {
    ($($arg:tt)+) => { $crate::logging::rb_log!(error, $($arg)+) };
}

pub(crate) use rb_debug;
pub(crate) use rb_error;
pub(crate) use rb_info;
pub(crate) use rb_log;
pub(crate) use rb_warn;
