//! Bitmask types for breakpoint lifecycle tags and access modes.

use bitflags::bitflags;

bitflags! {
    /// Lifecycle tags on a [`crate::site::Site`]. Multiple bits may be set at
    /// once: a site can be, for example, both `PERMANENT` and
    /// `TEMPORARY_UNTIL_HIT` if two independent callers installed it for
    /// different reasons.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Type: u8
    {
        /// Survives hits; requires a matching `remove` per `add`.
        const PERMANENT = 0b001;
        /// Swept away unconditionally at the next `disable()`.
        const TEMPORARY_ONE_SHOT = 0b010;
        /// Swept away at the next `disable()` *after* it has been hit once.
        const TEMPORARY_UNTIL_HIT = 0b100;
    }
}

bitflags! {
    /// Access class a breakpoint/watchpoint observes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Mode: u8
    {
        /// Fires on instruction fetch/execution.
        const EXEC = 0b001;
        /// Fires on a read of the watched range.
        const READ = 0b010;
        /// Fires on a write to the watched range.
        const WRITE = 0b100;
    }
}

impl Mode
{
    /// `Exec` is architecturally mutually exclusive with `Read`/`Write`: a
    /// site either traps on instruction fetch or on data access, never both.
    #[must_use]
    pub fn conflicts_exec_with_rw(self) -> bool
    {
        self.contains(Mode::EXEC) && self.intersects(Mode::READ | Mode::WRITE)
    }
}

/// Byte width of a breakpoint or watchpoint.
///
/// Software execution breakpoints ignore this field on install (the trap
/// opcode has its own natural width); it matters for hardware watchpoints,
/// where it is packed into the control register's LEN field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Size
{
    /// One byte.
    One = 1,
    /// Two bytes.
    Two = 2,
    /// Four bytes.
    Four = 4,
    /// Eight bytes (not universally supported by hardware watchpoints).
    Eight = 8,
}

impl Size
{
    /// The byte width as a plain integer.
    #[must_use]
    pub const fn bytes(self) -> u8
    {
        self as u8
    }

    /// Recover a [`Size`] from a raw byte count, if it names a legal width.
    #[must_use]
    pub const fn from_bytes(n: u8) -> Option<Self>
    {
        match n {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            4 => Some(Self::Four),
            8 => Some(Self::Eight),
            _ => None,
        }
    }
}
