//! Narrow contracts onto the external `TracedProcess`/`TracedThread`
//! collaborators.
//!
//! Everything these traits need — process attach/detach, memory-region
//! discovery, thread suspend/resume, CPU-state marshaling — belongs to other
//! subsystems. The breakpoint manager only ever needs to read/write a few
//! bytes of memory, read/write a handful of per-thread debug registers, and
//! read/adjust an instruction pointer.

use crate::error::Result;
use crate::types::{Address, ThreadId, ThreadState};

/// A single thread within the traced process, as seen by the breakpoint
/// manager.
pub trait TracedThread
{
    /// This thread's identifier.
    fn id(&self) -> ThreadId;

    /// This thread's current run-state.
    fn state(&self) -> ThreadState;

    /// Read debug register `idx` (x86: 0-3 address registers, 6 status, 7
    /// control).
    fn read_debug_reg(&self, idx: usize) -> Result<u64>;

    /// Write debug register `idx`.
    fn write_debug_reg(&mut self, idx: usize, value: u64) -> Result<()>;

    /// Read the current instruction pointer.
    fn instruction_pointer(&self) -> Result<Address>;

    /// Rewind/advance the instruction pointer, e.g. after a software trap.
    fn set_instruction_pointer(&mut self, address: Address) -> Result<()>;
}

/// The traced process, as seen by the breakpoint manager.
pub trait TracedProcess
{
    /// Invoke `visit` once per known thread. Implementations must stop
    /// iterating and propagate the first error `visit` returns.
    fn enumerate_threads(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn TracedThread) -> Result<()>,
    ) -> Result<()>;

    /// Read `len` bytes starting at `address`.
    fn read_memory(&self, address: Address, len: usize) -> Result<Vec<u8>>;

    /// Write `data` starting at `address`.
    fn write_memory(&mut self, address: Address, data: &[u8]) -> Result<()>;
}
