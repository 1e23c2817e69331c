use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispiError {
    #[error("no VBE_DISPI interface behind port {port:#x} (id register read {id:#06x})")]
    NotPresent { port: u16, id: u16 },

    #[error("VBE_DISPI interface reports no video memory")]
    NoVideoMemory,
}
