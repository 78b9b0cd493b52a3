//! User-space context switching for cooperative tasks.
//!
//! [`capture`] snapshots the calling execution into a [`Context`] and returns
//! [`CAPTURED`]; [`transfer`] resumes a snapshot so that the same `capture`
//! call returns again, this time with a caller-chosen non-zero signal.
//! Everything else (run queues, stack sizing, task lifetimes) belongs to the
//! scheduler built on top.
#![no_std]

cfg_if::cfg_if! {
  if #[cfg(target_arch = "x86_64")] {
      #[path = "arch/x86_64/mod.rs"]
      mod arch;
  } else if #[cfg(target_arch = "aarch64")] {
      #[path = "arch/aarch64/mod.rs"]
      mod arch;
  } else if #[cfg(target_arch = "riscv64")] {
      #[path = "arch/riscv64/mod.rs"]
      mod arch;
  } else {
      compile_error!("green-context supports x86_64, aarch64 and riscv64");
  }
}

extern crate alloc;
#[macro_use]
extern crate log;
#[cfg(test)]
extern crate std;

mod context;
mod fiber;
mod stack;

pub use arch::stack_pointer;
pub use context::{capture, switch, transfer, Context, ContextData, ContextState, Entry, CAPTURED};
pub use fiber::Fiber;
pub use stack::{Stack, StackError, MIN_STACK_SIZE, STACK_ALIGN};
