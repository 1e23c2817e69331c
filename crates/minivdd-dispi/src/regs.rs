//! Bochs/QEMU VBE_DISPI register file layout.

use bitflags::bitflags;

pub const VBE_DISPI_INDEX_ID: u16 = 0x0000;
pub const VBE_DISPI_INDEX_ENABLE: u16 = 0x0004;
pub const VBE_DISPI_INDEX_BANK: u16 = 0x0005;
pub const VBE_DISPI_INDEX_VIDEO_MEMORY_64K: u16 = 0x000A;

/// Oldest and newest interface revisions reported through [`VBE_DISPI_INDEX_ID`].
pub const VBE_DISPI_ID0: u16 = 0xB0C0;
pub const VBE_DISPI_ID5: u16 = 0xB0C5;

/// Size of the banked window at `A000:0`.
pub const VBE_DISPI_BANK_SIZE: u32 = 64 * 1024;

/// PCI identity of the Bochs/QEMU "Standard VGA" adapter.
pub const BOCHS_VGA_VENDOR_ID: u16 = 0x1234;
pub const BOCHS_VGA_DEVICE_ID: u16 = 0x1111;

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct DispiEnable: u16 {
        const ENABLED = 1 << 0;
        const LFB_ENABLED = 1 << 6;
    }
}

pub fn is_dispi_id(id: u16) -> bool {
    (VBE_DISPI_ID0..=VBE_DISPI_ID5).contains(&id)
}

/// 16-bit port access to the adapter.
pub trait DispiPorts {
    fn read_u16(&mut self, port: u16) -> u16;
    fn write_u16(&mut self, port: u16, value: u16);
}

impl<P: DispiPorts + ?Sized> DispiPorts for &mut P {
    fn read_u16(&mut self, port: u16) -> u16 {
        (**self).read_u16(port)
    }

    fn write_u16(&mut self, port: u16, value: u16) {
        (**self).write_u16(port, value)
    }
}
