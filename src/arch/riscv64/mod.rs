use core::arch::{asm, global_asm};

mod context;

pub use context::*;

global_asm!(
    include_str!("switch.S"),
    SAVE_FP = const cfg!(target_feature = "d") as usize,
);

extern "C" {
    /// Saves ra, sp, s0..s11 (and fs0..fs11 with the D extension) into
    /// `ctx`. Returns 0; a later `switch_context` on the same record returns
    /// here again with its signal.
    pub fn set_context(ctx: *mut ContextData) -> usize;
    /// Restores `ctx` and returns to its saved ra with `signal` in a0.
    pub fn switch_context(ctx: *const ContextData, signal: usize) -> !;
    pub fn context_entry();
}

#[inline(always)]
pub fn stack_pointer() -> usize {
    let sp: usize;
    unsafe {
        asm!("mv {0}, sp", out(reg) sp, options(nomem, nostack));
    }
    sp
}
