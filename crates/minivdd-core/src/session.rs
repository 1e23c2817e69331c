//! Per-VM sessions.
//!
//! Every VM gets its own display mode and trap state; nothing is shared between sessions. The
//! host delivers calls for one VM serially, so a session needs no locking.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::capability::{DisplayHardware, TrapControl};
use crate::config::VddConfig;
use crate::coordinator::ModeCoordinator;
use crate::dispatch::dispatch;
use crate::error::{ConfigError, ProtocolError};
use crate::regs::{CallContext, VmHandle};
use crate::state::{DisplayMode, SessionState, TrapConfiguration};

pub struct VddSession<H, T> {
    vm: VmHandle,
    state: SessionState,
    hardware: H,
    traps: T,
}

impl<H, T> VddSession<H, T>
where
    H: DisplayHardware,
    T: TrapControl,
{
    pub fn new(
        vm: VmHandle,
        config: &VddConfig,
        hardware: H,
        traps: T,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            vm,
            state: SessionState::new(config.trap_configuration()),
            hardware,
            traps,
        })
    }

    pub fn vm(&self) -> VmHandle {
        self.vm
    }

    pub fn mode(&self) -> DisplayMode {
        self.state.mode
    }

    pub fn trap_configuration(&self) -> TrapConfiguration {
        self.state.traps
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }

    pub fn trap_control(&self) -> &T {
        &self.traps
    }

    /// Handles one call from the main VDD and returns the handled flag.
    ///
    /// A context addressed to a different VM is refused without touching any state.
    pub fn dispatch(&mut self, ordinal: u32, ctx: &mut CallContext) -> bool {
        if ctx.vm != self.vm {
            let err = ProtocolError::VmMismatch {
                expected: self.vm,
                found: ctx.vm,
            };
            warn!("{err}");
            return false;
        }
        let mut coordinator =
            ModeCoordinator::new(&mut self.state, &mut self.hardware, &mut self.traps);
        dispatch(&mut coordinator, ordinal, &mut ctx.regs)
    }
}

/// Routes calls to the session of the VM they are addressed to.
pub struct SessionRegistry<H, T> {
    sessions: HashMap<VmHandle, VddSession<H, T>>,
}

impl<H, T> Default for SessionRegistry<H, T> {
    fn default() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }
}

impl<H, T> SessionRegistry<H, T>
where
    H: DisplayHardware,
    T: TrapControl,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a session, returning the one it replaced (if any).
    pub fn insert(&mut self, session: VddSession<H, T>) -> Option<VddSession<H, T>> {
        self.sessions.insert(session.vm(), session)
    }

    pub fn remove(&mut self, vm: VmHandle) -> Option<VddSession<H, T>> {
        self.sessions.remove(&vm)
    }

    pub fn get(&self, vm: VmHandle) -> Option<&VddSession<H, T>> {
        self.sessions.get(&vm)
    }

    pub fn get_mut(&mut self, vm: VmHandle) -> Option<&mut VddSession<H, T>> {
        self.sessions.get_mut(&vm)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn dispatch(&mut self, ordinal: u32, ctx: &mut CallContext) -> bool {
        match self.sessions.get_mut(&ctx.vm) {
            Some(session) => session.dispatch(ordinal, ctx),
            None => {
                debug!("{}", ProtocolError::UnknownVm(ctx.vm));
                false
            }
        }
    }
}
