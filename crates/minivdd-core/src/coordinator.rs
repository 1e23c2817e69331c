//! Mode transition state machine.
//!
//! The coordinator owns every policy decision of the mini-VDD: which calls are valid in which
//! display mode, when the bank/register ports are trapped, and which requests are deferred back
//! to the main VDD. Each operation returns the handled flag for its ordinal, or a
//! [`ProtocolError`] when the call arrived out of order. A rejected call has no side effects:
//! preconditions are checked before anything is written or any capability is invoked.

use tracing::trace;

use crate::capability::{BankKind, DisplayHardware, TrapControl};
use crate::error::ProtocolError;
use crate::ordinal::Ordinal;
use crate::regs::ClientRegs;
use crate::request::VddRequest;
use crate::state::{DisplayMode, SessionState, TransitionKind};

/// `AX` value reported by a successful VESA call.
pub const VBE_SUCCESS: u16 = 0x004F;

const VBE_SET_MODE: u16 = 0x4F02;
const VBE_WINDOW_CONTROL: u16 = 0x4F05;

/// Highest standard VGA BIOS mode number (mode 13h).
const MAX_VGA_MODE: u32 = 0x13;
/// VBE mode number bits: 15 = don't clear memory, 14 = use linear framebuffer.
const VBE_MODE_NUMBER_MASK: u32 = 0x3FFF;

fn is_standard_vga_mode(mode: u32) -> bool {
    mode <= MAX_VGA_MODE
}

fn is_vesa_mode(mode: u32) -> bool {
    mode <= 0xFFFF && (0x100..=VBE_MODE_NUMBER_MASK).contains(&(mode & VBE_MODE_NUMBER_MASK))
}

/// Modes the main VDD can set and restore on its own.
fn host_knows_mode(mode: u32) -> bool {
    is_standard_vga_mode(mode) || is_vesa_mode(mode)
}

/// Anything past mode 13h is hi-res, whether VESA, OEM or chipset-specific.
fn is_hires_mode(mode: u16) -> bool {
    (u32::from(mode) & VBE_MODE_NUMBER_MASK) > MAX_VGA_MODE
}

pub struct ModeCoordinator<'a, H: ?Sized, T: ?Sized> {
    state: &'a mut SessionState,
    hardware: &'a mut H,
    traps: &'a mut T,
}

impl<'a, H, T> ModeCoordinator<'a, H, T>
where
    H: DisplayHardware + ?Sized,
    T: TrapControl + ?Sized,
{
    pub fn new(state: &'a mut SessionState, hardware: &'a mut H, traps: &'a mut T) -> Self {
        Self {
            state,
            hardware,
            traps,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.state.mode
    }

    /// Runs one decoded request against the client registers.
    pub fn handle(
        &mut self,
        request: VddRequest,
        regs: &mut ClientRegs,
    ) -> Result<bool, ProtocolError> {
        match request {
            VddRequest::RegisterDisplayDriver => Ok(self.register_display_driver()),
            VddRequest::GetChipId => Ok(self.get_chip_id(regs)),
            VddRequest::CheckScreenSwitchOk { known_vesa, mode } => {
                Ok(self.check_screen_switch_ok(known_vesa, mode))
            }
            VddRequest::CheckHiresMode => Ok(self.check_hires_mode()),
            VddRequest::GetBankSize { mode } => self.get_bank_size(mode, regs),
            VddRequest::GetCurrentBank(kind) => self.get_current_bank(kind, regs),
            VddRequest::GetTotalVramSize => Ok(self.get_total_vram_size(regs)),
            VddRequest::PreHiresSaveRestore => self.pre_hires_save_restore(),
            VddRequest::PostHiresSaveRestore => self.post_hires_save_restore(),
            VddRequest::SetBank { read, write } => self.set_bank(read, write),
            VddRequest::SetHiresMode { mode } => Ok(self.set_hires_mode(mode)),
            VddRequest::VesaCallPostProcessing { function, mode } => {
                Ok(self.vesa_call_post_processing(function, mode, regs))
            }
            VddRequest::VesaSupport { function } => Ok(self.vesa_support(function, regs)),
            VddRequest::PreHiresToVga => self.pre_hires_to_vga(),
            VddRequest::PostHiresToVga => self.post_hires_to_vga(),
            VddRequest::EnableTraps => Ok(self.enable_traps()),
            VddRequest::DisplayDriverDisabling => Ok(self.display_driver_disabling()),
        }
    }

    /// Acknowledged, but always left to the main VDD.
    pub fn register_display_driver(&mut self) -> bool {
        false
    }

    /// Writes the packed chip id (or 0) to `EAX`. Never sets the handled flag, so the main VDD
    /// keeps its own detection fallback.
    pub fn get_chip_id(&mut self, regs: &mut ClientRegs) -> bool {
        regs.eax = self.hardware.identity().map_or(0, |id| id.chip_id());
        false
    }

    /// Returns `true` when it is **unsafe** to switch away from the VM.
    ///
    /// `mode` is `0` when the main VDD doesn't know the running mode, so a VGA mode number never
    /// counts as restorable here.
    pub fn check_screen_switch_ok(&mut self, known_vesa: bool, mode: u32) -> bool {
        match self.state.mode {
            DisplayMode::Standard => false,
            // Half-saved screens can't be restored.
            DisplayMode::Transitioning(_) => true,
            DisplayMode::HiRes => {
                let restorable =
                    known_vesa || is_vesa_mode(mode) || self.hardware.can_restore_mode(mode);
                !restorable
            }
        }
    }

    pub fn check_hires_mode(&mut self) -> bool {
        self.state.mode == DisplayMode::HiRes
    }

    pub fn get_bank_size(
        &mut self,
        mode: u32,
        regs: &mut ClientRegs,
    ) -> Result<bool, ProtocolError> {
        self.require_banked_framebuffer(Ordinal::GetBankSize)?;
        let Some(info) = self.hardware.bank_size(mode) else {
            return Ok(false);
        };
        regs.edx = info.bank_size;
        regs.eax = info.aperture_base;
        Ok(true)
    }

    pub fn get_current_bank(
        &mut self,
        kind: BankKind,
        regs: &mut ClientRegs,
    ) -> Result<bool, ProtocolError> {
        let op = match kind {
            BankKind::Read => Ordinal::GetCurrentBankRead,
            BankKind::Write => Ordinal::GetCurrentBankWrite,
        };
        self.require_banked_framebuffer(op)?;
        let Some(bank) = self.hardware.current_bank(kind) else {
            return Ok(false);
        };
        regs.edx = bank;
        Ok(true)
    }

    /// Writes the VRAM size to `ECX`. With no answer from the adapter `ECX` is zeroed and the
    /// main VDD falls back to VESA function `4F00h`.
    pub fn get_total_vram_size(&mut self, regs: &mut ClientRegs) -> bool {
        match self.hardware.total_vram() {
            Some(bytes) => {
                regs.ecx = bytes;
                true
            }
            None => {
                regs.ecx = 0;
                false
            }
        }
    }

    /// Opens a save or restore of the hi-res screen. A save runs while the hi-res mode is still
    /// on screen, a restore while the VM is back in standard VGA.
    pub fn pre_hires_save_restore(&mut self) -> Result<bool, ProtocolError> {
        self.open_bracket(
            Ordinal::PreHiresSaveRestore,
            TransitionKind::SaveRestore,
            &[DisplayMode::Standard, DisplayMode::HiRes],
        )?;
        Ok(true)
    }

    pub fn post_hires_save_restore(&mut self) -> Result<bool, ProtocolError> {
        self.close_bracket(
            Ordinal::PostHiresSaveRestore,
            TransitionKind::SaveRestore,
            DisplayMode::HiRes,
        )?;
        Ok(true)
    }

    /// `false` means the adapter did not take the banks and the main VDD should retry through
    /// VESA function `4F05h`.
    pub fn set_bank(&mut self, read: u32, write: u32) -> Result<bool, ProtocolError> {
        self.require_banked_framebuffer(Ordinal::SetBank)?;
        Ok(self.hardware.set_bank(read, write))
    }

    /// Only chipset-specific modes are handled here; standard VGA and VESA mode numbers are
    /// always deferred to the main VDD.
    pub fn set_hires_mode(&mut self, mode: u32) -> bool {
        if host_knows_mode(mode) {
            return false;
        }
        self.hardware.set_chipset_mode(mode)
    }

    /// Notification after a VESA call completed. `regs` holds the call's results.
    pub fn vesa_call_post_processing(
        &mut self,
        function: u16,
        mode: u16,
        regs: &ClientRegs,
    ) -> bool {
        if function == VBE_SET_MODE
            && regs.ax() == VBE_SUCCESS
            && !self.state.mode.is_transitioning()
        {
            let next = if is_hires_mode(mode) {
                DisplayMode::HiRes
            } else {
                DisplayMode::Standard
            };
            self.transition(next);
        }
        self.hardware.vesa_post_process(function, mode);
        true
    }

    /// Services VESA window control (`4F05h`) directly while a banked framebuffer is live.
    /// Everything else goes to the VESA BIOS.
    pub fn vesa_support(&mut self, function: u16, regs: &mut ClientRegs) -> bool {
        if function != VBE_WINDOW_CONTROL || !self.banked_framebuffer_live() {
            return false;
        }
        // Window A only; window B is left to the BIOS.
        if regs.bh() != 0 {
            return false;
        }
        match regs.bl() {
            0x00 => {
                let bank = u32::from(regs.dx());
                if !self.hardware.set_bank(bank, bank) {
                    return false;
                }
                regs.set_ax(VBE_SUCCESS);
                true
            }
            0x01 => {
                let Some(bank) = self.hardware.current_bank(BankKind::Write) else {
                    return false;
                };
                regs.set_dx((bank & 0xFFFF) as u16);
                regs.set_ax(VBE_SUCCESS);
                true
            }
            _ => false,
        }
    }

    /// Releases the port pair so the VM can program the adapter directly on its way back to
    /// VGA.
    pub fn pre_hires_to_vga(&mut self) -> Result<bool, ProtocolError> {
        self.open_bracket(
            Ordinal::PreHiresToVga,
            TransitionKind::HiresToVga,
            &[DisplayMode::HiRes],
        )?;
        Ok(true)
    }

    pub fn post_hires_to_vga(&mut self) -> Result<bool, ProtocolError> {
        self.close_bracket(
            Ordinal::PostHiresToVga,
            TransitionKind::HiresToVga,
            DisplayMode::Standard,
        )?;
        Ok(true)
    }

    /// Inside an open bracket the ports stay released; the request only changes what the
    /// matching `Post*` call puts back.
    pub fn enable_traps(&mut self) -> bool {
        if self.state.mode.is_transitioning() {
            self.state.saved_trapped = Some(true);
        } else {
            self.set_trapping(true);
        }
        true
    }

    /// The driver is going away, so an open bracket must not re-trap the ports when it closes.
    pub fn display_driver_disabling(&mut self) -> bool {
        if self.state.mode.is_transitioning() {
            self.state.saved_trapped = Some(false);
        }
        self.set_trapping(false);
        true
    }

    fn banked_framebuffer_live(&self) -> bool {
        matches!(
            self.state.mode,
            DisplayMode::HiRes | DisplayMode::Transitioning(TransitionKind::SaveRestore)
        )
    }

    fn require_banked_framebuffer(&self, op: Ordinal) -> Result<(), ProtocolError> {
        if self.banked_framebuffer_live() {
            Ok(())
        } else {
            Err(ProtocolError::WrongMode {
                op,
                mode: self.state.mode,
            })
        }
    }

    /// Starts a `Pre*`/`Post*` bracket from one of the `allowed` modes: remembers the trap
    /// state, releases the ports and enters `Transitioning`.
    fn open_bracket(
        &mut self,
        op: Ordinal,
        kind: TransitionKind,
        allowed: &[DisplayMode],
    ) -> Result<(), ProtocolError> {
        if !allowed.contains(&self.state.mode) {
            return Err(ProtocolError::WrongMode {
                op,
                mode: self.state.mode,
            });
        }
        self.state.saved_trapped = Some(self.state.traps.trapped);
        self.set_trapping(false);
        self.transition(DisplayMode::Transitioning(kind));
        Ok(())
    }

    fn close_bracket(
        &mut self,
        op: Ordinal,
        kind: TransitionKind,
        next: DisplayMode,
    ) -> Result<(), ProtocolError> {
        if self.state.mode != DisplayMode::Transitioning(kind) {
            let opener = match kind {
                TransitionKind::SaveRestore => Ordinal::PreHiresSaveRestore,
                TransitionKind::HiresToVga => Ordinal::PreHiresToVga,
            };
            return Err(ProtocolError::UnmatchedPost { op, opener });
        }
        let trapped = self.state.saved_trapped.take().unwrap_or(true);
        self.set_trapping(trapped);
        self.transition(next);
        Ok(())
    }

    fn set_trapping(&mut self, trapped: bool) {
        for port in self.state.traps.ports {
            if trapped {
                self.traps.enable_trapping(port);
            } else {
                self.traps.disable_trapping(port);
            }
        }
        if self.state.traps.trapped != trapped {
            trace!(ports = ?self.state.traps.ports, trapped, "port trapping changed");
        }
        self.state.traps.trapped = trapped;
    }

    fn transition(&mut self, next: DisplayMode) {
        if self.state.mode != next {
            trace!(from = %self.state.mode, to = %next, "display mode transition");
        }
        self.state.mode = next;
    }
}
