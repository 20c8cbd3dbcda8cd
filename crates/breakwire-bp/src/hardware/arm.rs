//! ARM hardware breakpoint shell.
//!
//! Concrete ARM hardware breakpoint/watchpoint installation (BVR/BCR or
//! WVR/WCR register programming, Thumb-mode trap handling) is deliberately
//! not implemented here — it differs enough between Linux `PTRACE_*HBP*`,
//! Android, and bare-metal targets that unifying it with the x86 backend
//! would be a worse abstraction than two backends. This type exists so a
//! downstream crate has something to implement a real backend against
//! (and a place to put the [`ArmHardwareBackend::max_watchpoints`] result
//! once it has actually queried the kernel for the register count), not as
//! a working installer.
use crate::error::{BreakpointError, Result};
use crate::manager::{Backend, Manager};
use crate::site::Site;
use crate::traced::{TracedProcess, TracedThread};
use crate::types::{Mode, Size};

/// ARM hardware breakpoint shell: reports a slot count discovered by the
/// caller, but does not itself install or detect breakpoints.
pub struct ArmHardwareBackend
{
    slot_count: usize,
}

impl ArmHardwareBackend
{
    /// Build a shell around a slot count obtained from the kernel (e.g. via
    /// `PTRACE_GETHBPREGS` on Linux). This crate has no way to discover that
    /// count itself.
    #[must_use]
    pub fn new(slot_count: usize) -> Self
    {
        Self { slot_count }
    }

    /// Number of hardware breakpoint/watchpoint registers this target
    /// provides, as reported at construction.
    #[must_use]
    pub fn max_watchpoints(&self) -> usize
    {
        self.slot_count
    }
}

fn unsupported(what: &str) -> BreakpointError
{
    BreakpointError::Unsupported(format!(
        "{what} is not implemented by the ARM hardware breakpoint shell; extend ArmHardwareBackend"
    ))
}

impl Backend for ArmHardwareBackend
{
    fn is_valid(&self, _size: Size, _mode: Mode) -> Result<()>
    {
        Err(unsupported("validation"))
    }

    fn enable_location(&mut self, _process: &mut dyn TracedProcess, _site: &Site) -> Result<()>
    {
        Err(unsupported("enabling a breakpoint site"))
    }

    fn disable_location(&mut self, _process: &mut dyn TracedProcess, _site: &Site) -> Result<()>
    {
        Err(unsupported("disabling a breakpoint site"))
    }
}

impl Manager<ArmHardwareBackend>
{
    /// Number of hardware breakpoint/watchpoint registers this target
    /// provides.
    #[must_use]
    pub fn max_watchpoints(&self) -> usize
    {
        self.backend().max_watchpoints()
    }

    /// Always `Unsupported`: ARM hit attribution is not implemented in the
    /// core.
    pub fn hit_by_thread(&mut self, _thread: &mut dyn TracedThread) -> Result<Site>
    {
        Err(unsupported("hit attribution"))
    }
}
