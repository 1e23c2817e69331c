use tracing::{debug, trace};

use minivdd_core::{BankInfo, BankKind, ChipIdentity, DeviceIdentity, HiresHardware};

use crate::config::DispiConfig;
use crate::error::DispiError;
use crate::regs::{
    is_dispi_id, DispiEnable, DispiPorts, BOCHS_VGA_DEVICE_ID, BOCHS_VGA_VENDOR_ID,
    VBE_DISPI_BANK_SIZE, VBE_DISPI_INDEX_BANK, VBE_DISPI_INDEX_ENABLE, VBE_DISPI_INDEX_ID,
    VBE_DISPI_INDEX_VIDEO_MEMORY_64K,
};

/// Hardware backend for a Bochs/QEMU "Standard VGA" adapter.
///
/// All register access goes through the VBE_DISPI index/data pair. The guest may be halfway
/// through its own index/data sequence when the main VDD calls in, so every access puts the
/// index register back the way it found it.
pub struct DispiAdapter<P> {
    ports: P,
    config: DispiConfig,
}

impl<P: DispiPorts> DispiAdapter<P> {
    /// Wraps `ports` without checking that an adapter is present. Queries against a missing
    /// adapter report "unknown".
    pub fn new(ports: P, config: DispiConfig) -> Self {
        Self { ports, config }
    }

    /// Wraps `ports` after checking the ID register and video memory size.
    pub fn probe(ports: P, config: DispiConfig) -> Result<Self, DispiError> {
        let mut adapter = Self::new(ports, config);
        let id = adapter.read_reg(VBE_DISPI_INDEX_ID);
        if !is_dispi_id(id) {
            return Err(DispiError::NotPresent {
                port: config.index_port,
                id,
            });
        }
        if adapter.read_reg(VBE_DISPI_INDEX_VIDEO_MEMORY_64K) == 0 {
            return Err(DispiError::NoVideoMemory);
        }
        debug!(id = format_args!("{id:#06x}"), "VBE_DISPI adapter found");
        Ok(adapter)
    }

    pub fn config(&self) -> &DispiConfig {
        &self.config
    }

    pub fn ports(&self) -> &P {
        &self.ports
    }

    pub fn into_ports(self) -> P {
        self.ports
    }

    pub fn read_reg(&mut self, index: u16) -> u16 {
        let saved = self.ports.read_u16(self.config.index_port);
        self.ports.write_u16(self.config.index_port, index);
        let value = self.ports.read_u16(self.config.data_port);
        self.ports.write_u16(self.config.index_port, saved);
        value
    }

    pub fn write_reg(&mut self, index: u16, value: u16) {
        let saved = self.ports.read_u16(self.config.index_port);
        self.ports.write_u16(self.config.index_port, index);
        self.ports.write_u16(self.config.data_port, value);
        self.ports.write_u16(self.config.index_port, saved);
    }

    fn present(&mut self) -> bool {
        is_dispi_id(self.read_reg(VBE_DISPI_INDEX_ID))
    }

    fn enable_flags(&mut self) -> DispiEnable {
        DispiEnable::from_bits_retain(self.read_reg(VBE_DISPI_INDEX_ENABLE))
    }

    /// Whether the adapter is currently scanning out a VBE mode.
    fn vbe_active(&mut self) -> bool {
        self.present() && self.enable_flags().contains(DispiEnable::ENABLED)
    }

    fn bank_count(&mut self) -> u32 {
        let vram = u32::from(self.read_reg(VBE_DISPI_INDEX_VIDEO_MEMORY_64K)) * 64 * 1024;
        vram / VBE_DISPI_BANK_SIZE
    }
}

impl<P: DispiPorts> DeviceIdentity for DispiAdapter<P> {
    fn identity(&mut self) -> Option<ChipIdentity> {
        self.present().then_some(ChipIdentity {
            vendor_id: BOCHS_VGA_VENDOR_ID,
            device_id: BOCHS_VGA_DEVICE_ID,
        })
    }

    fn total_vram(&mut self) -> Option<u32> {
        if !self.present() {
            return None;
        }
        match u32::from(self.read_reg(VBE_DISPI_INDEX_VIDEO_MEMORY_64K)) {
            0 => None,
            blocks => Some(blocks * 64 * 1024),
        }
    }
}

impl<P: DispiPorts> HiresHardware for DispiAdapter<P> {
    fn bank_size(&mut self, _mode: u32) -> Option<BankInfo> {
        if !self.vbe_active() {
            return None;
        }
        let aperture_base = if self.enable_flags().contains(DispiEnable::LFB_ENABLED) {
            self.config.lfb_base
        } else {
            0
        };
        Some(BankInfo {
            bank_size: VBE_DISPI_BANK_SIZE,
            aperture_base,
        })
    }

    /// DISPI has one bank register shared by reads and writes.
    fn current_bank(&mut self, _kind: BankKind) -> Option<u32> {
        if !self.vbe_active() {
            return None;
        }
        Some(u32::from(self.read_reg(VBE_DISPI_INDEX_BANK)))
    }

    fn set_bank(&mut self, read: u32, write: u32) -> bool {
        if read != write || !self.vbe_active() || read >= self.bank_count() {
            return false;
        }
        let Ok(bank) = u16::try_from(read) else {
            return false;
        };
        self.write_reg(VBE_DISPI_INDEX_BANK, bank);
        true
    }

    fn vesa_post_process(&mut self, function: u16, mode: u16) {
        trace!(
            function = format_args!("{function:#06x}"),
            mode = format_args!("{mode:#06x}"),
            "VESA call completed"
        );
    }
}
