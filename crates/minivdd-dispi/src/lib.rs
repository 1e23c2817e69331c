//! Mini-VDD hardware backend for the Bochs/QEMU "Standard VGA" adapter.
//!
//! The adapter exposes its VBE state through the VBE_DISPI index/data register pair
//! (`0x1CE`/`0x1CF`), which is also the pair the mini-VDD core traps around hi-res transitions.
//! [`DispiAdapter`] answers the core's identity, VRAM and banking queries from those registers.
//! It has no chipset-specific modes, so mode sets and restores are always left to the VESA BIOS.

#![forbid(unsafe_code)]

mod adapter;
mod config;
mod error;
pub mod regs;

pub use adapter::DispiAdapter;
pub use config::{DispiConfig, DEFAULT_LFB_BASE};
pub use error::DispiError;
pub use regs::{DispiEnable, DispiPorts};
