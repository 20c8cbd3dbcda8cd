//! Hardware breakpoint backends, driven through per-thread CPU debug
//! registers rather than instruction-byte patching.

pub mod arm;
pub mod x86;

pub use arm::ArmHardwareBackend;
pub use x86::X86HardwareBackend;
