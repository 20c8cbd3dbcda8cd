//! # breakwire-bp
//!
//! Breakpoint and watchpoint management core for a GDB remote-serial-protocol
//! debug server.
//!
//! This crate owns the generic site registry and its lifecycle rules, a
//! software breakpoint backend (trap-byte patching), and an x86/x86-64
//! hardware breakpoint backend (CPU debug registers). It does not speak the
//! wire protocol, attach to processes, or discover memory regions — those
//! are the job of a `TracedProcess`/`TracedThread` implementation supplied
//! by a host crate, through the narrow traits in [`traced`].
#![warn(missing_docs)]

pub mod bitops;
pub mod error;
pub mod hardware;
pub mod manager;
pub mod site;
pub mod software;
pub mod traced;
pub mod types;

pub use error::{BreakpointError, Result};
pub use manager::{Backend, Manager};
pub use site::{Site, SiteRegistry};
pub use software::SoftwareBackend;
pub use traced::{TracedProcess, TracedThread};
pub use types::{Address, Mode, Size, ThreadId, ThreadState, Type};
