//! x86/x86-64 hardware breakpoints: CPU debug registers DR0-DR3 (address),
//! DR6 (status), DR7 (control).
//!
//! Control register layout (DR7):
//! - Bit `1 + 2*i` is the global-enable flag for slot `i`.
//! - Bits `16 + 4*i ..= 16 + 4*i + 1` encode R/W: `00=Exec`, `01=Write`,
//!   `11=ReadWrite`.
//! - Bits `16 + 4*i + 2 ..= 16 + 4*i + 3` encode LEN: `00=1B`, `01=2B`,
//!   `11=4B`, `10=8B` (not universally supported).
//!
//! Status register (DR6) bits 0-3 are one hit flag per slot.

use crate::bitops::{clear_bit, set_bit, test_bit};
use crate::error::{BreakpointError, Result};
use crate::manager::{Backend, Manager};
use crate::site::Site;
use crate::traced::{TracedProcess, TracedThread};
use crate::types::{Address, Mode, Size, ThreadState};

/// Debug status register index.
const DR6: usize = 6;
/// Debug control register index.
const DR7: usize = 7;

/// DR0-DR3: four simultaneous hardware breakpoints/watchpoints.
pub const MAX_HW_STOPPOINTS: usize = 4;

/// x86/x86-64 hardware breakpoint backend.
pub struct X86HardwareBackend
{
    locations: [Option<Address>; MAX_HW_STOPPOINTS],
}

impl Default for X86HardwareBackend
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl X86HardwareBackend
{
    /// A backend with every debug-register slot free.
    #[must_use]
    pub fn new() -> Self
    {
        Self {
            locations: [None; MAX_HW_STOPPOINTS],
        }
    }

    /// Number of simultaneous hardware watchpoints this backend supports.
    #[must_use]
    pub fn max_watchpoints(&self) -> usize
    {
        MAX_HW_STOPPOINTS
    }

    /// The address occupying slot `idx`, if any.
    #[must_use]
    pub fn location_at(&self, idx: usize) -> Option<Address>
    {
        self.locations.get(idx).copied().flatten()
    }

    fn slot_for(&self, address: Address) -> Option<usize>
    {
        self.locations.iter().position(|slot| *slot == Some(address))
    }

    fn free_slot(&self) -> Option<usize>
    {
        self.locations.iter().position(Option::is_none)
    }

    fn encode_rw(mode: Mode) -> u32
    {
        if mode.contains(Mode::EXEC) {
            0b00
        } else if mode.contains(Mode::WRITE) && !mode.contains(Mode::READ) {
            0b01
        } else {
            0b11
        }
    }

    fn encode_len(mode: Mode, size: Size) -> u32
    {
        if mode.contains(Mode::EXEC) {
            return 0b00;
        }
        match size {
            Size::One => 0b00,
            Size::Two => 0b01,
            Size::Four => 0b11,
            Size::Eight => 0b10,
        }
    }

    fn apply_rw_len(dr7: u32, idx: usize, mode: Mode, size: Size) -> u32
    {
        let shift = 16 + 4 * idx as u32;
        let mask = 0xFu32 << shift;
        let nibble = (Self::encode_len(mode, size) << 2 | Self::encode_rw(mode)) << shift;
        (dr7 & !mask) | nibble
    }

    fn enable_bit(idx: usize) -> u32
    {
        1 + 2 * idx as u32
    }
}

impl Backend for X86HardwareBackend
{
    fn is_valid(&self, size: Size, mode: Mode) -> Result<()>
    {
        if size == Size::Eight {
            tracing::warn!("8-byte hardware watchpoints are not universally supported");
        }
        if size != Size::One && mode.contains(Mode::EXEC) {
            return Err(BreakpointError::InvalidArgument(
                "execution hardware breakpoints must be 1 byte".to_string(),
            ));
        }
        if mode.conflicts_exec_with_rw() {
            return Err(BreakpointError::InvalidArgument(
                "Exec is mutually exclusive with Read/Write".to_string(),
            ));
        }
        if mode.contains(Mode::READ) && !mode.contains(Mode::WRITE) {
            return Err(BreakpointError::Unsupported(
                "read-only watchpoints are not supported on x86".to_string(),
            ));
        }
        Ok(())
    }

    fn normalize_mode(&self, mode: Mode) -> Mode
    {
        if mode == Mode::READ {
            tracing::warn!("read-only watchpoints are unsupported, upgrading to read-write");
            mode | Mode::WRITE
        } else {
            mode
        }
    }

    fn before_add(&self, site_count: usize)
    {
        debug_assert!(
            site_count <= MAX_HW_STOPPOINTS,
            "more hardware breakpoint sites than debug register slots"
        );
    }

    fn enable_location(&mut self, process: &mut dyn TracedProcess, site: &Site) -> Result<()>
    {
        let idx = self
            .slot_for(site.address)
            .or_else(|| self.free_slot())
            .ok_or_else(|| {
                BreakpointError::InvalidArgument(format!(
                    "no free hardware breakpoint slots (max {MAX_HW_STOPPOINTS})"
                ))
            })?;

        let address_value = site.address.value();
        let mode = site.mode;
        let size = site.size;

        process.enumerate_threads(&mut |thread| {
            if thread.state() != ThreadState::Stopped {
                return Ok(());
            }
            thread.write_debug_reg(idx, address_value)?;
            let mut dr7 = thread.read_debug_reg(DR7)? as u32;
            dr7 = set_bit(dr7, Self::enable_bit(idx));
            dr7 = Self::apply_rw_len(dr7, idx, mode, size);
            thread.write_debug_reg(DR7, u64::from(dr7))?;
            thread.write_debug_reg(DR6, 0)?;
            Ok(())
        })?;

        self.locations[idx] = Some(site.address);
        Ok(())
    }

    fn disable_location(&mut self, process: &mut dyn TracedProcess, site: &Site) -> Result<()>
    {
        let idx = self.slot_for(site.address).ok_or_else(|| {
            BreakpointError::InvalidArgument(format!(
                "no hardware slot recorded for {}",
                site.address
            ))
        })?;

        process.enumerate_threads(&mut |thread| {
            if thread.state() != ThreadState::Stopped {
                return Ok(());
            }
            let current = thread.read_debug_reg(idx)?;
            debug_assert_eq!(
                current,
                site.address.value(),
                "DR{idx} did not hold the expected address"
            );
            thread.write_debug_reg(idx, 0)?;
            let mut dr7 = thread.read_debug_reg(DR7)? as u32;
            dr7 = clear_bit(dr7, Self::enable_bit(idx));
            thread.write_debug_reg(DR7, u64::from(dr7))?;
            Ok(())
        })
    }

    fn release_location(&mut self, address: Address)
    {
        if let Some(idx) = self.slot_for(address) {
            self.locations[idx] = None;
        }
    }

    fn clear(&mut self)
    {
        self.locations = [None; MAX_HW_STOPPOINTS];
    }
}

impl Manager<X86HardwareBackend>
{
    /// Number of simultaneous hardware watchpoints this manager supports.
    #[must_use]
    pub fn max_watchpoints(&self) -> usize
    {
        self.backend().max_watchpoints()
    }

    /// Thread-based hit test: reads DR6 and attributes the lowest set slot
    /// bit to the site occupying that slot, returning the slot index
    /// alongside the site.
    pub fn hit_by_thread(&mut self, thread: &mut dyn TracedThread) -> Result<Option<(usize, Site)>>
    {
        if thread.state() != ThreadState::Stopped {
            return Ok(None);
        }
        let dr6 = thread.read_debug_reg(DR6)? as u32;
        for idx in 0..MAX_HW_STOPPOINTS {
            if test_bit(dr6, idx as u32) {
                if let Some(address) = self.backend().location_at(idx) {
                    if let Some(site) = self.site(address) {
                        return Ok(Some((idx, site)));
                    }
                }
            }
        }
        Ok(None)
    }
}
