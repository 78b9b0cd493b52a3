pub use crate::arch::ContextData;

use crate::arch::{set_context, switch_context};
use crate::stack::Stack;
use core::cell::{Cell, UnsafeCell};
use core::marker::PhantomData;
use core::num::NonZeroUsize;

/// What `capture` returns on its direct path.
pub const CAPTURED: usize = 0;

/// Entry point of a context prepared with `Context::with_entry`. It receives
/// the signal of the first transfer and must never return.
pub type Entry = extern "C" fn(usize) -> !;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Never captured nor prepared. Must not be transferred to.
    Empty,
    /// Starts an entry function on a fresh stack when transferred to.
    Prepared,
    /// Holds the snapshot of the last `capture`.
    Captured,
}

/// Resumable execution state: the callee-saved registers, the stack pointer
/// and the resume point, tagged with whether it is safe to transfer to.
///
/// The record is written through shared references. A suspended `switch`
/// keeps borrowing its context while other tasks capture into or transfer to
/// it, so no `&mut Context` may be held across a switch.
///
/// A context points into the stack it was captured on, so it stays on the
/// OS thread that owns that stack.
pub struct Context {
    data: UnsafeCell<ContextData>,
    state: Cell<ContextState>,
    _not_send: PhantomData<*const ()>,
}

static_assertions::assert_not_impl_any!(Context: Send, Sync);

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Context {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Context")
            .field("state", &self.state())
            .field("sp", &format_args!("0x{:x}", self.stack_pointer()))
            .field("pc", &format_args!("0x{:x}", self.resume_point()))
            .finish()
    }
}

impl Context {
    pub fn new() -> Self {
        Context {
            data: UnsafeCell::new(ContextData::default()),
            state: Cell::new(ContextState::Empty),
            _not_send: PhantomData,
        }
    }

    /// A context whose first transfer calls `entry(signal)` on top of
    /// `stack`. The stack must outlive every transfer to this context.
    pub fn with_entry(stack: &Stack, entry: Entry) -> Self {
        let context = Context {
            data: UnsafeCell::new(ContextData::new(entry as *const () as usize, stack.top())),
            state: Cell::new(ContextState::Prepared),
            _not_send: PhantomData,
        };
        debug!(
            "context prepared, sp 0x{:x} pc 0x{:x}",
            context.stack_pointer(),
            context.resume_point()
        );
        context
    }

    pub fn state(&self) -> ContextState {
        self.state.get()
    }

    pub fn is_valid(&self) -> bool {
        self.state() != ContextState::Empty
    }

    pub fn stack_pointer(&self) -> usize {
        // SAFETY: !Sync, and nothing writes the record while this thread reads it.
        unsafe { (*self.data.get()).sp() }
    }

    pub fn resume_point(&self) -> usize {
        unsafe { (*self.data.get()).pc() }
    }
}

/// Records the calling execution into `ctx`.
///
/// Returns [`CAPTURED`] when coming straight back from the call, and the
/// signal handed to [`transfer`] every time that transfer lands here again.
/// Inlined so that the recorded stack pointer is the caller's own.
///
/// # Safety
///
/// The compiler does not know this call can return twice. Anything the caller
/// changes between the direct return and the transfer that resumes it must
/// live in memory the compiler has to reload (statics, atomics, heap behind
/// an escaped pointer), not in locals of the capturing frame.
#[inline(always)]
pub unsafe fn capture(ctx: &Context) -> usize {
    // Resumed paths must not touch `ctx`: it may be in use by another task.
    ctx.state.set(ContextState::Captured);
    let signal = set_context(ctx.data.get());
    if signal == CAPTURED {
        trace!("captured, sp 0x{:x}", ctx.stack_pointer());
    }
    signal
}

/// Resumes `ctx` so that its `capture` returns `signal`, or starts its entry
/// function if it was prepared on a stack. Never returns to the caller.
///
/// # Safety
///
/// The frame that captured `ctx` must still be live (not returned from) and
/// the stack it points into must not have been freed or handed to another
/// context since.
///
/// # Panics
///
/// If `ctx` is [`ContextState::Empty`].
pub unsafe fn transfer(ctx: &Context, signal: NonZeroUsize) -> ! {
    assert!(ctx.is_valid(), "transfer to a context that was never captured");
    trace!(
        "transfer to sp 0x{:x} pc 0x{:x} signal {}",
        ctx.stack_pointer(),
        ctx.resume_point(),
        signal
    );
    switch_context(ctx.data.get(), signal.get())
}

/// Saves the running execution into `from` and transfers to `to`. Returns,
/// with the signal that woke it, once some later transfer targets `from`.
///
/// # Safety
///
/// Same as [`transfer`] for `to`. Whoever later transfers to `from` must do
/// so while this call's frame is still suspended on its stack.
#[inline(never)]
pub unsafe fn switch(from: &Context, to: &Context, signal: NonZeroUsize) -> usize {
    let woken = capture(from);
    if woken == CAPTURED {
        transfer(to, signal);
    }
    trace!("switched back, signal {}", woken);
    woken
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::MIN_STACK_SIZE;
    use std::format;

    extern "C" fn parked(_: usize) -> ! {
        loop {
            core::hint::spin_loop();
        }
    }

    #[test]
    fn new_context_is_empty() {
        let ctx = Context::new();
        assert_eq!(ctx.state(), ContextState::Empty);
        assert!(!ctx.is_valid());
        assert_eq!(ctx.stack_pointer(), 0);
        assert_eq!(ctx.resume_point(), 0);
    }

    #[test]
    fn prepared_context_starts_at_stack_top() {
        let stack = Stack::new(MIN_STACK_SIZE).unwrap();
        let ctx = Context::with_entry(&stack, parked);
        assert_eq!(ctx.state(), ContextState::Prepared);
        assert!(ctx.is_valid());
        assert_eq!(ctx.stack_pointer(), stack.top());
        assert_eq!(
            ctx.resume_point(),
            crate::arch::context_entry as *const () as usize
        );
    }

    #[test]
    fn capture_records_caller_stack() {
        let ctx = Context::new();
        let signal = unsafe { capture(&ctx) };
        let sp = crate::arch::stack_pointer();
        assert_eq!(signal, CAPTURED);
        assert_eq!(ctx.state(), ContextState::Captured);
        assert_eq!(ctx.stack_pointer(), sp);
        assert_ne!(ctx.resume_point(), 0);
    }

    #[test]
    fn debug_shows_state_and_registers() {
        let ctx = Context::new();
        assert_eq!(
            format!("{:?}", ctx),
            "Context { state: Empty, sp: 0x0, pc: 0x0 }"
        );
    }

    #[test]
    #[should_panic(expected = "never captured")]
    fn transfer_to_empty_context_panics() {
        let ctx = Context::new();
        unsafe { transfer(&ctx, NonZeroUsize::MIN) }
    }
}
