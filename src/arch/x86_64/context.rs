use core::mem::{offset_of, size_of};

/// Default MXCSR (all exceptions masked, round to nearest).
const MXCSR_DEFAULT: usize = 0x1f80;
/// Default x87 control word (extended precision, all exceptions masked).
const FPU_CW_DEFAULT: usize = 0x037f;

#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
pub struct ContextData {
    // callee saved registers
    pub rbx: usize,
    pub rbp: usize,
    pub r12: usize,
    pub r13: usize,
    pub r14: usize,
    pub r15: usize,
    // sp after the capture returns
    pub rsp: usize,
    // pc
    pub rip: usize,
    // mxcsr in the low dword, x87 control word above it
    pub fpcsr: usize,
}

// switch.S addresses the record by these offsets.
const _: () = assert!(offset_of!(ContextData, rbx) == 0x00);
const _: () = assert!(offset_of!(ContextData, r15) == 0x28);
const _: () = assert!(offset_of!(ContextData, rsp) == 0x30);
const _: () = assert!(offset_of!(ContextData, rip) == 0x38);
const _: () = assert!(offset_of!(ContextData, fpcsr) == 0x40);
const _: () = assert!(size_of::<ContextData>() == 9 * size_of::<usize>());

impl ContextData {
    /// Record that starts `entry` on a fresh stack whose top is `sp`.
    ///
    /// `sp` must be 16-byte aligned: `context_entry` calls `entry`, which
    /// leaves the callee with the usual `rsp % 16 == 8` on entry.
    pub fn new(entry: usize, sp: usize) -> Self {
        Self {
            rbx: entry,
            rsp: sp,
            rip: super::context_entry as *const () as usize,
            fpcsr: MXCSR_DEFAULT | FPU_CW_DEFAULT << 32,
            ..ContextData::default()
        }
    }

    pub fn sp(&self) -> usize {
        self.rsp
    }

    pub fn pc(&self) -> usize {
        self.rip
    }
}
