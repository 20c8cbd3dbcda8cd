//! Thread identity and run-state, as seen from the breakpoint manager.

/// Identifier for a thread within the traced process.
///
/// Opaque to this crate; the `TracedProcess`/`TracedThread` implementation
/// decides what it maps to (a Mach thread port, a Linux TID, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadId(pub u64);

impl ThreadId
{
    /// The raw numeric value.
    #[must_use]
    pub const fn raw(self) -> u64
    {
        self.0
    }
}

impl From<u64> for ThreadId
{
    fn from(value: u64) -> Self
    {
        Self(value)
    }
}

/// Run-state of a thread, as reported by `TracedThread::state()`.
///
/// Only `Stopped` threads participate in hardware/software breakpoint
/// install, remove, and hit-detection operations; others are skipped, not
/// treated as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadState
{
    /// Executing normally.
    Running,
    /// Stopped and safe to read/write registers and memory.
    Stopped,
    /// Single-stepping.
    Stepping,
    /// Exited.
    Terminated,
    /// State could not be determined.
    Unknown,
}
