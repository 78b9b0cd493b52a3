use core::arch::{asm, global_asm};

mod context;

pub use context::*;

global_asm!(include_str!("switch.S"));

extern "C" {
    /// Saves x19..x29, sp, the link register and d8..d15 into `ctx`.
    /// Returns 0; a later `switch_context` on the same record returns here
    /// again with its signal.
    pub fn set_context(ctx: *mut ContextData) -> usize;
    /// Restores `ctx` and returns to its saved link register with `signal`
    /// in x0.
    pub fn switch_context(ctx: *const ContextData, signal: usize) -> !;
    pub fn context_entry();
}

#[inline(always)]
pub fn stack_pointer() -> usize {
    let sp: usize;
    unsafe {
        asm!("mov {}, sp", out(reg) sp, options(nomem, nostack, preserves_flags));
    }
    sp
}
