//! Ordinal dispatch.
//!
//! Maps a raw function number onto a decoded [`VddRequest`] and folds the coordinator's result
//! into the single handled flag the main VDD expects. Unknown numbers and out-of-order calls
//! both come back as "not handled" with the registers untouched.

use tracing::{debug, trace};

use crate::capability::{DisplayHardware, TrapControl};
use crate::coordinator::ModeCoordinator;
use crate::ordinal::Ordinal;
use crate::regs::ClientRegs;
use crate::request::VddRequest;

pub fn dispatch<H, T>(
    coordinator: &mut ModeCoordinator<'_, H, T>,
    ordinal: u32,
    regs: &mut ClientRegs,
) -> bool
where
    H: DisplayHardware + ?Sized,
    T: TrapControl + ?Sized,
{
    let Some(ordinal) = Ordinal::from_raw(ordinal) else {
        trace!(ordinal, "no handler for mini-VDD function");
        return false;
    };

    let request = VddRequest::decode(ordinal, regs);
    match coordinator.handle(request, regs) {
        Ok(handled) => {
            trace!(function = ordinal.name(), handled, "mini-VDD call");
            handled
        }
        Err(err) => {
            debug!("mini-VDD call rejected: {err}");
            false
        }
    }
}
