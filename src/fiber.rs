//! A context bundled with the stack it runs on.

use crate::context::{Context, Entry};
use crate::stack::{Stack, StackError};

/// One cooperative task: its own stack plus the context that resumes it.
/// The context is only handed out by shared reference and the stack is
/// freed together with it, so the fiber's context cannot be swapped for one
/// prepared on another stack nor outlive its own.
#[derive(Debug)]
pub struct Fiber {
    context: Context,
    stack: Stack,
}

impl Fiber {
    /// Allocates `stack_size` bytes of stack and prepares a context that
    /// enters `entry` on it when first transferred to.
    pub fn new(stack_size: usize, entry: Entry) -> Result<Self, StackError> {
        let stack = Stack::new(stack_size)?;
        let context = Context::with_entry(&stack, entry);
        Ok(Fiber { context, stack })
    }

    /// The record this fiber captures into when it yields and that others
    /// transfer to in order to resume it.
    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Whether `addr` points into this fiber's stack.
    pub fn owns(&self, addr: usize) -> bool {
        self.stack.contains(addr)
    }
}
