use serde::Deserialize;

use crate::error::ConfigError;
use crate::state::TrapConfiguration;

/// Bochs/QEMU VBE_DISPI index register port.
pub const DISPI_INDEX_PORT: u16 = 0x01CE;
/// Bochs/QEMU VBE_DISPI data register port.
pub const DISPI_DATA_PORT: u16 = 0x01CF;

/// Per-session configuration.
///
/// The defaults match a QEMU/Bochs "Standard VGA" adapter, whose bank and mode registers sit
/// behind the VBE_DISPI index/data pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VddConfig {
    /// The two ports toggled as a pair around hi-res/VGA bridges.
    pub trap_ports: [u16; 2],
    /// Whether the host has the ports trapped when the session starts.
    pub initially_trapped: bool,
}

impl Default for VddConfig {
    fn default() -> Self {
        Self {
            trap_ports: [DISPI_INDEX_PORT, DISPI_DATA_PORT],
            initially_trapped: true,
        }
    }
}

impl VddConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [a, b] = self.trap_ports;
        if a == b {
            return Err(ConfigError::DuplicateTrapPort(a));
        }
        Ok(())
    }

    pub fn trap_configuration(&self) -> TrapConfiguration {
        TrapConfiguration::new(self.trap_ports, self.initially_trapped)
    }
}
