//! Capabilities the core consumes from its host.
//!
//! The core never touches hardware itself. Identity and banking questions go to a
//! [`DeviceIdentity`]/[`HiresHardware`] backend, and trap changes are requested through
//! [`TrapControl`]. Every method answers "don't know" by default so a backend only needs to
//! implement what its adapter can actually do; the matching handler then reports "not handled"
//! and the host falls back to the BIOS path.

/// PCI-style vendor/device pair of the display adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipIdentity {
    pub vendor_id: u16,
    pub device_id: u16,
}

impl ChipIdentity {
    /// Packed chip id as reported to the main VDD: vendor in the high word, device in the low.
    pub fn chip_id(self) -> u32 {
        (u32::from(self.vendor_id) << 16) | u32::from(self.device_id)
    }
}

/// Size and location of the bank window for the active hi-res mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankInfo {
    pub bank_size: u32,
    /// Physical address of the aperture, or `0` for the standard window at `A000:0`.
    pub aperture_base: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankKind {
    Read,
    Write,
}

pub trait DeviceIdentity {
    fn identity(&mut self) -> Option<ChipIdentity> {
        None
    }

    /// Total addressable video memory in bytes.
    fn total_vram(&mut self) -> Option<u32> {
        None
    }
}

pub trait HiresHardware {
    fn bank_size(&mut self, _mode: u32) -> Option<BankInfo> {
        None
    }

    fn current_bank(&mut self, _kind: BankKind) -> Option<u32> {
        None
    }

    /// Programs the read and write banks. Returns `false` if the values were not applied.
    fn set_bank(&mut self, _read: u32, _write: u32) -> bool {
        false
    }

    /// Whether the adapter knows how to restore `mode` after switching away from it.
    fn can_restore_mode(&mut self, _mode: u32) -> bool {
        false
    }

    /// Sets a chipset-specific (non-VESA) hi-res mode, ideally without clearing VRAM.
    fn set_chipset_mode(&mut self, _mode: u32) -> bool {
        false
    }

    /// Called after a VESA call completed. `mode` is only meaningful after `4F02h`.
    fn vesa_post_process(&mut self, _function: u16, _mode: u16) {}
}

/// Everything the coordinator asks of the adapter.
pub trait DisplayHardware: DeviceIdentity + HiresHardware {}

impl<T: DeviceIdentity + HiresHardware + ?Sized> DisplayHardware for T {}

/// Host-side I/O port trapping. Both calls are fire-and-forget.
pub trait TrapControl {
    fn enable_trapping(&mut self, port: u16);
    fn disable_trapping(&mut self, port: u16);
}

/// Backend for an adapter the core knows nothing about.
///
/// Every query is absent, so every hardware-backed handler defers to the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHardware;

impl DeviceIdentity for NoHardware {}

impl HiresHardware for NoHardware {}
