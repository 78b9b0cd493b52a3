use core::mem::{offset_of, size_of};

#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
pub struct ContextData {
    // pc / sp
    pub ra: usize,
    pub sp: usize,
    // callee saved registers
    pub s: [usize; 12],
    // fs0..fs11, only touched with the D extension
    pub fs: [usize; 12],
}

const _: () = assert!(offset_of!(ContextData, sp) == 8);
const _: () = assert!(offset_of!(ContextData, s) == 16);
const _: () = assert!(offset_of!(ContextData, fs) == 112);
const _: () = assert!(size_of::<ContextData>() == 26 * size_of::<usize>());

impl ContextData {
    /// Record that starts `entry` on a fresh stack whose top is `sp`.
    pub fn new(entry: usize, sp: usize) -> Self {
        let mut s = [0; 12];
        s[1] = entry;
        Self {
            ra: super::context_entry as *const () as usize,
            sp,
            s,
            ..ContextData::default()
        }
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    pub fn pc(&self) -> usize {
        self.ra
    }
}
