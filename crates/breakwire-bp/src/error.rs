//! # Error Types
//!
//! Error handling for the breakpoint management core.
//!
//! We use `thiserror` to generate `Error` trait implementations and
//! human-readable messages. Every fallible operation in this crate returns
//! [`Result`]; the core never panics on an external fault (a bad address, a
//! full hardware slot table, a failed memory write) — only on an internal
//! invariant violation, which is always a programmer error and uses
//! `assert!`/`debug_assert!` instead.

use thiserror::Error;

use crate::types::Address;

/// Error taxonomy for breakpoint management operations.
///
/// Variants map directly onto the GDB-style error kinds a `ProtocolLayer`
/// translates into wire-level error codes: not found, invalid argument,
/// invalid address, memory access failure, permission failure, and
/// unsupported operation.
#[derive(Error, Debug)]
pub enum BreakpointError
{
    /// No site, slot, or other resource was found for a given key.
    #[error("not found: {0}")]
    NotFound(String),

    /// An argument violates the operation's preconditions (mode mismatch,
    /// wrong size, exhausted hardware slots, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The supplied address fails `Address::valid()` or is otherwise
    /// unusable as a breakpoint site.
    #[error("invalid address: {0}")]
    InvalidAddress(Address),

    /// A read or write against the traced process's memory failed.
    #[error("memory access failed at {address}: {details}")]
    NoMemory {
        /// The address the access was attempted against.
        address: Address,
        /// Details from the underlying `TracedProcess` implementation.
        details: String,
    },

    /// The traced process or thread refused the operation for permission
    /// reasons (e.g. `ptrace` denied).
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The operation is not implemented by this backend (e.g. any hardware
    /// operation against the ARM shell).
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// A catch-all for failures that don't fit the taxonomy above; carries
    /// whatever detail the caller could provide.
    #[error("unknown error: {0}")]
    Unknown(String),
}

/// Convenience alias for `Result<T, BreakpointError>`.
pub type Result<T> = std::result::Result<T, BreakpointError>;
