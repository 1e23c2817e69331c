//! Client register record handed to every mini-VDD call.
//!
//! The layout mirrors the VMM's 32-bit client register structure: the general-purpose registers,
//! an error-code slot, and two execution contexts (the one the VM is currently running and the
//! "alternate" one the VMM keeps for the other processor mode).

/// Opaque identifier for the guest VM a call pertains to.
///
/// The value is owned by the host; the core only compares and forwards it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VmHandle(pub u32);

/// Instruction pointer, flags, stack and segment selectors of one execution context.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExecContext {
    pub eip: u32,
    pub cs: u16,
    pub eflags: u32,
    pub esp: u32,
    pub ss: u16,
    pub es: u16,
    pub ds: u16,
    pub fs: u16,
    pub gs: u16,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClientRegs {
    pub eax: u32,
    pub ebx: u32,
    pub ecx: u32,
    pub edx: u32,
    pub esi: u32,
    pub edi: u32,
    pub ebp: u32,
    /// Error code slot (`Client_Error`).
    pub error: u32,
    pub current: ExecContext,
    pub alternate: ExecContext,
}

impl ClientRegs {
    pub fn ax(&self) -> u16 {
        (self.eax & 0xFFFF) as u16
    }

    pub fn set_ax(&mut self, value: u16) {
        self.eax = (self.eax & !0xFFFF) | u32::from(value);
    }

    pub fn bx(&self) -> u16 {
        (self.ebx & 0xFFFF) as u16
    }

    pub fn bh(&self) -> u8 {
        (self.bx() >> 8) as u8
    }

    pub fn bl(&self) -> u8 {
        (self.bx() & 0xFF) as u8
    }

    pub fn dx(&self) -> u16 {
        (self.edx & 0xFFFF) as u16
    }

    pub fn set_dx(&mut self, value: u16) {
        self.edx = (self.edx & !0xFFFF) | u32::from(value);
    }

    /// High word of `edx`.
    pub fn edx_high(&self) -> u16 {
        (self.edx >> 16) as u16
    }
}

/// Per-call context: the VM the call is for and that VM's client registers.
///
/// The host owns the context for the duration of a single dispatch. Handlers may read and
/// mutate `regs` but never keep a reference past return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub vm: VmHandle,
    pub regs: ClientRegs,
}

impl CallContext {
    pub fn new(vm: VmHandle) -> Self {
        Self {
            vm,
            regs: ClientRegs::default(),
        }
    }

    pub fn with_regs(vm: VmHandle, regs: ClientRegs) -> Self {
        Self { vm, regs }
    }
}
