use serde::Deserialize;

use minivdd_core::config::{DISPI_DATA_PORT, DISPI_INDEX_PORT};

/// Default guest-physical base of the linear framebuffer.
pub const DEFAULT_LFB_BASE: u32 = 0xE000_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DispiConfig {
    pub index_port: u16,
    pub data_port: u16,
    /// Aperture reported by `GetBankSize` while the LFB is enabled.
    pub lfb_base: u32,
}

impl Default for DispiConfig {
    fn default() -> Self {
        Self {
            index_port: DISPI_INDEX_PORT,
            data_port: DISPI_DATA_PORT,
            lfb_base: DEFAULT_LFB_BASE,
        }
    }
}
