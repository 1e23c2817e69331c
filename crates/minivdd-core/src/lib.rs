//! Dispatch and mode-transition core of a display mini-VDD.
//!
//! The main VDD calls into a mini-VDD by function number, passing the VM handle and that VM's
//! client registers, and reads back a single "handled" flag. This crate provides:
//! - the function-number table ([`Ordinal`]) and its decoding into typed requests
//!   ([`VddRequest`]),
//! - the mode transition state machine ([`ModeCoordinator`]) that decides which calls are valid
//!   in which display mode and brackets port trapping around hi-res/VGA transitions,
//! - per-VM sessions ([`VddSession`], [`SessionRegistry`]) that own that state.
//!
//! Hardware access and port trapping are host capabilities; see [`capability`].
//!
//! Note that `CheckScreenSwitchOk` reports `true` when switching is **unsafe**. Every other
//! function reports `true` when it handled the call.

#![forbid(unsafe_code)]

pub mod capability;
pub mod config;
pub mod coordinator;
pub mod dispatch;
mod error;
pub mod ordinal;
pub mod regs;
pub mod request;
pub mod session;
pub mod state;

pub use capability::{
    BankInfo, BankKind, ChipIdentity, DeviceIdentity, DisplayHardware, HiresHardware, NoHardware,
    TrapControl,
};
pub use config::VddConfig;
pub use coordinator::{ModeCoordinator, VBE_SUCCESS};
pub use dispatch::dispatch;
pub use error::{ConfigError, ProtocolError};
pub use ordinal::Ordinal;
pub use regs::{CallContext, ClientRegs, ExecContext, VmHandle};
pub use request::VddRequest;
pub use session::{SessionRegistry, VddSession};
pub use state::{DisplayMode, SessionState, TransitionKind, TrapConfiguration};
