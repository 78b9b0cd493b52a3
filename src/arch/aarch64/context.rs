use core::mem::{offset_of, size_of};

#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
pub struct ContextData {
    // callee saved registers x19..x28
    pub x: [usize; 10],
    pub fp: usize,
    // sp / pc
    pub sp: usize,
    pub pc: usize,
    // low halves of v8..v15
    pub d: [usize; 8],
}

const _: () = assert!(offset_of!(ContextData, fp) == 0x50);
const _: () = assert!(offset_of!(ContextData, sp) == 0x58);
const _: () = assert!(offset_of!(ContextData, pc) == 0x60);
const _: () = assert!(offset_of!(ContextData, d) == 0x68);
const _: () = assert!(size_of::<ContextData>() == 21 * size_of::<usize>());

impl ContextData {
    /// Record that starts `entry` on a fresh stack whose top is `sp`.
    pub fn new(entry: usize, sp: usize) -> Self {
        let mut x = [0; 10];
        x[0] = entry;
        Self {
            x,
            sp,
            pc: super::context_entry as *const () as usize,
            ..ContextData::default()
        }
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    pub fn pc(&self) -> usize {
        self.pc
    }
}
