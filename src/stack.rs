//! Owned stack memory for contexts that run off the current thread's stack.

use alloc::alloc::{alloc, dealloc, Layout, LayoutError};
use core::fmt;
use core::ptr::NonNull;

/// Alignment of every stack buffer and of its top.
pub const STACK_ALIGN: usize = 16;

/// Smallest stack `Stack::new` hands out.
pub const MIN_STACK_SIZE: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    TooSmall { size: usize, min: usize },
    Layout(LayoutError),
    OutOfMemory { size: usize },
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackError::TooSmall { size, min } => {
                write!(f, "stack of {} bytes is below the {} byte minimum", size, min)
            }
            StackError::Layout(err) => write!(f, "invalid stack layout: {}", err),
            StackError::OutOfMemory { size } => {
                write!(f, "failed to allocate a {} byte stack", size)
            }
        }
    }
}

impl core::error::Error for StackError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            StackError::Layout(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LayoutError> for StackError {
    fn from(err: LayoutError) -> Self {
        StackError::Layout(err)
    }
}

/// A heap buffer used as a call stack. Memory is released on drop, so the
/// owner has to keep it alive while any context may still resume on it.
///
/// stack layout: [bottom ... top), growing down from `top`.
pub struct Stack {
    base: NonNull<u8>,
    layout: Layout,
}

impl Stack {
    pub fn new(size: usize) -> Result<Self, StackError> {
        if size < MIN_STACK_SIZE {
            return Err(StackError::TooSmall {
                size,
                min: MIN_STACK_SIZE,
            });
        }
        let layout = Layout::from_size_align(size, STACK_ALIGN)?.pad_to_align();
        // SAFETY: layout has a non-zero size.
        let base = NonNull::new(unsafe { alloc(layout) }).ok_or(StackError::OutOfMemory {
            size: layout.size(),
        })?;
        debug!(
            "stack alloc [0x{:x}, 0x{:x})",
            base.as_ptr() as usize,
            base.as_ptr() as usize + layout.size()
        );
        Ok(Stack { base, layout })
    }

    pub fn bottom(&self) -> usize {
        self.base.as_ptr() as usize
    }

    /// One past the highest byte; what a fresh context starts with as its
    /// stack pointer.
    pub fn top(&self) -> usize {
        self.bottom() + self.layout.size()
    }

    pub fn len(&self) -> usize {
        self.layout.size()
    }

    /// Whether `addr` lies inside the buffer. The top itself counts, since a
    /// context that has not pushed anything yet points there.
    pub fn contains(&self, addr: usize) -> bool {
        (self.bottom()..=self.top()).contains(&addr)
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("bottom", &format_args!("0x{:x}", self.bottom()))
            .field("top", &format_args!("0x{:x}", self.top()))
            .finish()
    }
}

impl Drop for Stack {
    fn drop(&mut self) {
        debug!("stack free 0x{:x}", self.bottom());
        unsafe {
            dealloc(self.base.as_ptr(), self.layout);
        }
    }
}
