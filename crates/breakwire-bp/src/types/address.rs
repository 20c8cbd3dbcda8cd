//! Opaque target virtual address.

use std::fmt;
use std::ops::{Add, Sub};

/// A 64-bit virtual address in the traced process's address space.
///
/// `0` is reserved as the null/sentinel value and is never `valid()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u64);

impl Address
{
    /// The null/sentinel address. Never a legal breakpoint site.
    pub const NULL: Self = Address(0);

    /// Construct an address from a raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self
    {
        Self(value)
    }

    /// The raw numeric value.
    #[must_use]
    pub const fn value(self) -> u64
    {
        self.0
    }

    /// Whether this address can be used as a breakpoint/watchpoint site.
    /// Only the null address is invalid; the core has no notion of mapped
    /// memory regions, that belongs to `TracedProcess`.
    #[must_use]
    pub const fn valid(self) -> bool
    {
        self.0 != 0
    }

    /// Add an offset, wrapping on overflow.
    #[must_use]
    pub const fn wrapping_add(self, offset: u64) -> Self
    {
        Self(self.0.wrapping_add(offset))
    }

    /// Subtract an offset, wrapping on underflow.
    #[must_use]
    pub const fn wrapping_sub(self, offset: u64) -> Self
    {
        Self(self.0.wrapping_sub(offset))
    }
}

impl From<u64> for Address
{
    fn from(value: u64) -> Self
    {
        Self(value)
    }
}

impl From<Address> for u64
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:016x}", self.0)
    }
}

impl Add<u64> for Address
{
    type Output = Self;

    fn add(self, rhs: u64) -> Self
    {
        self.wrapping_add(rhs)
    }
}

impl Sub<u64> for Address
{
    type Output = Self;

    fn sub(self, rhs: u64) -> Self
    {
        self.wrapping_sub(rhs)
    }
}
