use core::arch::{asm, global_asm};

mod context;

pub use context::*;

global_asm!(include_str!("switch.S"));

extern "C" {
    /// Saves the callee-saved registers, the caller's stack pointer and the
    /// return address into `ctx`. Returns 0; a later `switch_context` on the
    /// same record returns here again with its signal.
    pub fn set_context(ctx: *mut ContextData) -> usize;
    /// Restores `ctx` and jumps to its resume point with `signal` in rax.
    pub fn switch_context(ctx: *const ContextData, signal: usize) -> !;
    pub fn context_entry();
}

#[inline(always)]
pub fn stack_pointer() -> usize {
    let sp: usize;
    unsafe {
        asm!("mov {}, rsp", out(reg) sp, options(nomem, nostack, preserves_flags));
    }
    sp
}

#[cfg(test)]
mod tests {
    use super::*;

    // rdi = record, rsi = out[7]. Loads markers into every callee-saved
    // register, captures, zeroes them, transfers back with signal 5 and
    // stores what the resumed path sees.
    global_asm!(
        ".text",
        ".global callee_saved_round_trip",
        ".p2align 4",
        "callee_saved_round_trip:",
        "    push rbx",
        "    push rbp",
        "    push r12",
        "    push r13",
        "    push r14",
        "    push r15",
        "    sub rsp, 24",
        "    mov [rsp], rdi",
        "    mov [rsp + 8], rsi",
        "    mov rbx, 0x1111",
        "    mov rbp, 0x2222",
        "    mov r12, 0x3333",
        "    mov r13, 0x4444",
        "    mov r14, 0x5555",
        "    mov r15, 0x6666",
        "    call set_context",
        "    test rax, rax",
        "    jnz 2f",
        "    xor ebx, ebx",
        "    xor ebp, ebp",
        "    xor r12d, r12d",
        "    xor r13d, r13d",
        "    xor r14d, r14d",
        "    xor r15d, r15d",
        "    mov rdi, [rsp]",
        "    mov esi, 5",
        "    call switch_context",
        "2:",
        "    mov rsi, [rsp + 8]",
        "    mov [rsi + 0x00], rbx",
        "    mov [rsi + 0x08], rbp",
        "    mov [rsi + 0x10], r12",
        "    mov [rsi + 0x18], r13",
        "    mov [rsi + 0x20], r14",
        "    mov [rsi + 0x28], r15",
        "    mov [rsi + 0x30], rax",
        "    add rsp, 24",
        "    pop r15",
        "    pop r14",
        "    pop r13",
        "    pop r12",
        "    pop rbp",
        "    pop rbx",
        "    ret",
    );

    extern "C" {
        fn callee_saved_round_trip(ctx: *mut ContextData, out: *mut usize);
    }

    #[test]
    fn callee_saved_registers_survive_a_transfer() {
        let mut ctx = ContextData::default();
        let mut out = [0usize; 7];
        unsafe { callee_saved_round_trip(&mut ctx, out.as_mut_ptr()) };
        assert_eq!(out, [0x1111, 0x2222, 0x3333, 0x4444, 0x5555, 0x6666, 5]);
        assert_eq!(ctx.rbx, 0x1111);
        assert_eq!(ctx.r15, 0x6666);
    }

    #[test]
    fn fresh_record_enters_through_the_trampoline() {
        let ctx = ContextData::new(0x1234, 0x8000);
        assert_eq!(ctx.rbx, 0x1234);
        assert_eq!(ctx.sp(), 0x8000);
        assert_eq!(ctx.pc(), context_entry as *const () as usize);
        assert_eq!(ctx.fpcsr & 0xffff_ffff, 0x1f80);
        assert_eq!(ctx.fpcsr >> 32, 0x037f);
    }
}
