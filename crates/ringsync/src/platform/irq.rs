//! Interrupt mask/restore collaborator.

/// Saves the current interrupt state and masks interrupts; restores it later.
///
/// Implementations must nest: when an outer caller has already masked
/// interrupts, `save_and_disable` returns a state that makes the matching
/// `restore` leave them masked.
pub trait InterruptControl {
    /// Opaque saved state, e.g. the previous PRIMASK value.
    type State: Copy;

    /// Masks interrupts and returns the state to restore.
    ///
    /// # Safety
    ///
    /// Every call must be paired with exactly one [`restore`](Self::restore)
    /// of the returned state, in LIFO order with respect to other pairs on
    /// the same execution context.
    unsafe fn save_and_disable() -> Self::State;

    /// Returns to the state captured by the matching `save_and_disable`.
    ///
    /// # Safety
    ///
    /// `state` must come from the most recent unmatched `save_and_disable`
    /// on this execution context.
    unsafe fn restore(state: Self::State);
}

/// Runs `f` with interrupts masked and restores the saved state afterwards.
///
/// The mask is held by a guard local to this call, so sections always close
/// in LIFO order and an unwinding panic inside `f` cannot leave interrupts
/// masked. Calls nest: an inner call made while masked leaves the outer mask
/// in place when it returns.
#[inline]
pub fn with_masked<I: InterruptControl, R>(f: impl FnOnce() -> R) -> R {
    let _section = MaskedSection::<I>::enter();
    f()
}

/// Restores the saved interrupt state on drop.
///
/// Not exported: a guard that callers could drop out of order would hand
/// `restore` a state that is not the most recent one.
struct MaskedSection<I: InterruptControl> {
    state: I::State,
}

impl<I: InterruptControl> MaskedSection<I> {
    #[inline]
    fn enter() -> Self {
        // SAFETY: sections are only created inside `with_masked`, which drops
        // this one before returning. Any section opened within `f` has closed
        // by then, so the restore in Drop matches the most recent save.
        let state = unsafe { I::save_and_disable() };
        Self { state }
    }
}

impl<I: InterruptControl> Drop for MaskedSection<I> {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: `state` came from the save in `enter()` and is restored once.
        unsafe { I::restore(self.state) }
    }
}

/// Interrupt control through the `critical-section` crate.
///
/// On Cortex-M with `critical-section-single-core` this saves PRIMASK and
/// disables interrupts; under `std` it is a process-wide reentrant lock.
/// Nesting is handled by the underlying implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CriticalSectionIrq;

impl InterruptControl for CriticalSectionIrq {
    type State = critical_section::RestoreState;

    #[inline]
    unsafe fn save_and_disable() -> Self::State {
        critical_section::acquire()
    }

    #[inline]
    unsafe fn restore(state: Self::State) {
        critical_section::release(state);
    }
}
