//! Software breakpoints: instruction-byte substitution.
//!
//! Installs a trap instruction (`0xCC` on x86-64, `BRK #0` on ARM64) over the
//! original bytes at a site's address, saves the original bytes so they can
//! be restored, and recognizes a hit by rewinding a stopped thread's
//! instruction pointer past the trap.

use std::collections::HashMap;

use crate::error::{BreakpointError, Result};
use crate::manager::{Backend, Manager};
use crate::site::Site;
use crate::traced::{TracedProcess, TracedThread};
use crate::types::{Address, Mode, Size};

/// Trap-instruction width and bytes for x86-64's `INT3`.
pub const X86_64_TRAP: &[u8] = &[0xCC];

/// Trap-instruction width and bytes for ARM64's `BRK #0`.
pub const ARM64_TRAP: &[u8] = &[0x00, 0x00, 0x20, 0xD4];

/// Software breakpoint backend: patches a trap opcode into target memory and
/// tracks the original bytes so they can be restored.
pub struct SoftwareBackend
{
    trap: Vec<u8>,
    original_bytes: HashMap<Address, Vec<u8>>,
}

impl SoftwareBackend
{
    /// Build a backend around an arbitrary trap opcode.
    #[must_use]
    pub fn new(trap_opcode: impl Into<Vec<u8>>) -> Self
    {
        Self {
            trap: trap_opcode.into(),
            original_bytes: HashMap::new(),
        }
    }

    /// `INT3` backend for x86-64.
    #[must_use]
    pub fn x86_64() -> Self
    {
        Self::new(X86_64_TRAP)
    }

    /// `BRK #0` backend for ARM64.
    #[must_use]
    pub fn arm64() -> Self
    {
        Self::new(ARM64_TRAP)
    }

    /// The trap opcode this backend installs.
    #[must_use]
    pub fn trap_opcode(&self) -> &[u8]
    {
        &self.trap
    }
}

impl Backend for SoftwareBackend
{
    fn is_valid(&self, size: Size, mode: Mode) -> Result<()>
    {
        if mode.conflicts_exec_with_rw() || !mode.contains(Mode::EXEC) {
            return Err(BreakpointError::InvalidArgument(
                "software breakpoints only support Exec mode".to_string(),
            ));
        }
        if usize::from(size.bytes()) != self.trap.len() {
            return Err(BreakpointError::InvalidArgument(format!(
                "software breakpoint size must be {} bytes (trap instruction width)",
                self.trap.len()
            )));
        }
        Ok(())
    }

    fn enable_location(&mut self, process: &mut dyn TracedProcess, site: &Site) -> Result<()>
    {
        let original = process.read_memory(site.address, self.trap.len())?;
        process.write_memory(site.address, &self.trap)?;
        self.original_bytes.insert(site.address, original);
        Ok(())
    }

    fn disable_location(&mut self, process: &mut dyn TracedProcess, site: &Site) -> Result<()>
    {
        let original = self
            .original_bytes
            .remove(&site.address)
            .ok_or_else(|| BreakpointError::NotFound(format!("no saved bytes at {}", site.address)))?;
        process.write_memory(site.address, &original)
    }

    fn clear(&mut self)
    {
        self.original_bytes.clear();
    }
}

impl Manager<SoftwareBackend>
{
    /// Thread-based hit test for a trapped software breakpoint.
    ///
    /// The thread's instruction pointer has already advanced past the trap,
    /// so the effective PC of the trapping instruction is `ip - trap_len`.
    /// This formula is validated for x86-64 (`INT3` always advances `rip` by
    /// exactly one byte); ARM64 exception entry does not uniformly leave
    /// `pc` in the same relative position, so callers using
    /// [`SoftwareBackend::arm64`] should treat this as a starting point, not
    /// a validated implementation, until that architecture's trap-entry
    /// semantics are pinned down.
    pub fn hit_by_thread(&mut self, thread: &mut dyn TracedThread) -> Result<Option<Site>>
    {
        let ip = thread.instruction_pointer()?;
        let trap_len = self.backend().trap_opcode().len() as u64;
        let effective = ip - trap_len;

        match self.hit_by_address(effective) {
            Some(site) => {
                thread.set_instruction_pointer(effective)?;
                Ok(Some(site))
            }
            None => Ok(None),
        }
    }
}
