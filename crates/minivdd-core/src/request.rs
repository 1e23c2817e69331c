//! Decoded mini-VDD requests.
//!
//! The main VDD passes arguments in registers. Decoding pulls those arguments out once so the
//! coordinator works with named fields instead of register conventions.

use crate::capability::BankKind;
use crate::ordinal::Ordinal;
use crate::regs::ClientRegs;

/// `EAX` value the main VDD passes to `CheckScreenSwitchOk` when the VM runs a known VESA mode.
pub const KNOWN_VESA_MODE: u32 = 0xFFFF_FFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VddRequest {
    RegisterDisplayDriver,
    PreHiresToVga,
    PostHiresToVga,
    EnableTraps,
    DisplayDriverDisabling,
    GetCurrentBank(BankKind),
    /// `EAX` = read bank, `EDX` = write bank.
    SetBank { read: u32, write: u32 },
    CheckHiresMode,
    GetTotalVramSize,
    /// `ECX` = VESA mode currently running.
    GetBankSize { mode: u32 },
    /// `EAX` = mode to set (VESA or chipset-specific).
    SetHiresMode { mode: u32 },
    PreHiresSaveRestore,
    PostHiresSaveRestore,
    /// The client registers carry a complete VESA call (`AX` = `4Fxxh`).
    VesaSupport { function: u16 },
    GetChipId,
    /// `EAX` = -1 for a known VESA mode, `ECX` = mode number if known.
    CheckScreenSwitchOk { known_vesa: bool, mode: u32 },
    /// `EDX` low word = VESA function just done; high word = new mode after `4F02h`.
    VesaCallPostProcessing { function: u16, mode: u16 },
}

impl VddRequest {
    pub fn decode(ordinal: Ordinal, regs: &ClientRegs) -> Self {
        match ordinal {
            Ordinal::RegisterDisplayDriver => VddRequest::RegisterDisplayDriver,
            Ordinal::PreHiresToVga => VddRequest::PreHiresToVga,
            Ordinal::PostHiresToVga => VddRequest::PostHiresToVga,
            Ordinal::EnableTraps => VddRequest::EnableTraps,
            Ordinal::DisplayDriverDisabling => VddRequest::DisplayDriverDisabling,
            Ordinal::GetCurrentBankWrite => VddRequest::GetCurrentBank(BankKind::Write),
            Ordinal::GetCurrentBankRead => VddRequest::GetCurrentBank(BankKind::Read),
            Ordinal::SetBank => VddRequest::SetBank {
                read: regs.eax,
                write: regs.edx,
            },
            Ordinal::CheckHiresMode => VddRequest::CheckHiresMode,
            Ordinal::GetTotalVramSize => VddRequest::GetTotalVramSize,
            Ordinal::GetBankSize => VddRequest::GetBankSize { mode: regs.ecx },
            Ordinal::SetHiresMode => VddRequest::SetHiresMode { mode: regs.eax },
            Ordinal::PreHiresSaveRestore => VddRequest::PreHiresSaveRestore,
            Ordinal::PostHiresSaveRestore => VddRequest::PostHiresSaveRestore,
            Ordinal::VesaSupport => VddRequest::VesaSupport {
                function: regs.ax(),
            },
            Ordinal::GetChipId => VddRequest::GetChipId,
            Ordinal::CheckScreenSwitchOk => VddRequest::CheckScreenSwitchOk {
                known_vesa: regs.eax == KNOWN_VESA_MODE,
                mode: regs.ecx,
            },
            Ordinal::VesaCallPostProcessing => VddRequest::VesaCallPostProcessing {
                function: regs.dx(),
                mode: regs.edx_high(),
            },
        }
    }

    pub fn ordinal(&self) -> Ordinal {
        match self {
            VddRequest::RegisterDisplayDriver => Ordinal::RegisterDisplayDriver,
            VddRequest::PreHiresToVga => Ordinal::PreHiresToVga,
            VddRequest::PostHiresToVga => Ordinal::PostHiresToVga,
            VddRequest::EnableTraps => Ordinal::EnableTraps,
            VddRequest::DisplayDriverDisabling => Ordinal::DisplayDriverDisabling,
            VddRequest::GetCurrentBank(BankKind::Write) => Ordinal::GetCurrentBankWrite,
            VddRequest::GetCurrentBank(BankKind::Read) => Ordinal::GetCurrentBankRead,
            VddRequest::SetBank { .. } => Ordinal::SetBank,
            VddRequest::CheckHiresMode => Ordinal::CheckHiresMode,
            VddRequest::GetTotalVramSize => Ordinal::GetTotalVramSize,
            VddRequest::GetBankSize { .. } => Ordinal::GetBankSize,
            VddRequest::SetHiresMode { .. } => Ordinal::SetHiresMode,
            VddRequest::PreHiresSaveRestore => Ordinal::PreHiresSaveRestore,
            VddRequest::PostHiresSaveRestore => Ordinal::PostHiresSaveRestore,
            VddRequest::VesaSupport { .. } => Ordinal::VesaSupport,
            VddRequest::GetChipId => Ordinal::GetChipId,
            VddRequest::CheckScreenSwitchOk { .. } => Ordinal::CheckScreenSwitchOk,
            VddRequest::VesaCallPostProcessing { .. } => Ordinal::VesaCallPostProcessing,
        }
    }
}
