//! Display mini-VDD: the dispatch/mode-transition core plus the hardware backends it ships
//! with.
//!
//! Hosts normally build one [`minivdd_core::VddSession`] per VM around a
//! [`minivdd_dispi::DispiAdapter`] and their own trap controller, and feed every mini-VDD call
//! through [`minivdd_core::VddSession::dispatch`].

#![forbid(unsafe_code)]

pub use minivdd_core;
pub use minivdd_dispi;
