use thiserror::Error;

use crate::ordinal::Ordinal;
use crate::regs::VmHandle;
use crate::state::DisplayMode;

/// A call that arrived out of the documented order.
///
/// These never reach the host: dispatch logs them and reports "not handled" with no side
/// effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("{} is not valid in {mode} mode", op.name())]
    WrongMode { op: Ordinal, mode: DisplayMode },

    #[error("{} without a matching {}", op.name(), opener.name())]
    UnmatchedPost { op: Ordinal, opener: Ordinal },

    #[error("call for VM {found:?} delivered to the session of VM {expected:?}")]
    VmMismatch { expected: VmHandle, found: VmHandle },

    #[error("no session registered for VM {0:?}")]
    UnknownVm(VmHandle),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("trap ports must differ (both are {0:#x})")]
    DuplicateTrapPort(u16),
}
