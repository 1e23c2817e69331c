//! Per-VM display mode and trap state.

use std::fmt;

/// Which bracket an open transition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Opened by `PreHiresSaveRestore`; closed by `PostHiresSaveRestore` (ends in hi-res).
    SaveRestore,
    /// Opened by `PreHiresToVga`; closed by `PostHiresToVga` (ends in standard VGA).
    HiresToVga,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Ordinary VGA addressing.
    Standard,
    /// Between a `Pre*` call and its matching `Post*` call.
    Transitioning(TransitionKind),
    /// VESA or chipset-specific hi-res mode active.
    HiRes,
}

impl DisplayMode {
    pub fn is_transitioning(self) -> bool {
        matches!(self, DisplayMode::Transitioning(_))
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Standard => f.write_str("standard"),
            DisplayMode::Transitioning(TransitionKind::SaveRestore) => {
                f.write_str("transitioning (save/restore)")
            }
            DisplayMode::Transitioning(TransitionKind::HiresToVga) => {
                f.write_str("transitioning (hi-res to VGA)")
            }
            DisplayMode::HiRes => f.write_str("hi-res"),
        }
    }
}

/// Trap state of the two bank/register ports.
///
/// The ports are only ever toggled together, so a single flag describes both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrapConfiguration {
    pub ports: [u16; 2],
    pub trapped: bool,
}

impl TrapConfiguration {
    pub fn new(ports: [u16; 2], trapped: bool) -> Self {
        Self { ports, trapped }
    }
}

/// Mutable per-VM state owned by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub mode: DisplayMode,
    pub traps: TrapConfiguration,
    /// Trap state to put back when the open transition closes.
    pub(crate) saved_trapped: Option<bool>,
}

impl SessionState {
    pub fn new(traps: TrapConfiguration) -> Self {
        Self {
            mode: DisplayMode::Standard,
            traps,
            saved_trapped: None,
        }
    }
}
