use minivdd_core::{
    BankInfo, BankKind, CallContext, ChipIdentity, DeviceIdentity, DisplayMode, HiresHardware,
    NoHardware, Ordinal, TrapControl, TransitionKind, VddConfig, VddSession, VmHandle,
};

const VM: VmHandle = VmHandle(0x8000_1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrapCall {
    Enable(u16),
    Disable(u16),
}

#[derive(Default)]
struct RecordingTraps {
    calls: Vec<TrapCall>,
}

impl TrapControl for RecordingTraps {
    fn enable_trapping(&mut self, port: u16) {
        self.calls.push(TrapCall::Enable(port));
    }

    fn disable_trapping(&mut self, port: u16) {
        self.calls.push(TrapCall::Disable(port));
    }
}

/// A 16MiB banked adapter with a single bank register.
#[derive(Default)]
struct FakeAdapter {
    bank: u32,
}

impl DeviceIdentity for FakeAdapter {
    fn identity(&mut self) -> Option<ChipIdentity> {
        Some(ChipIdentity {
            vendor_id: 0x1234,
            device_id: 0x1111,
        })
    }

    fn total_vram(&mut self) -> Option<u32> {
        Some(16 * 1024 * 1024)
    }
}

impl HiresHardware for FakeAdapter {
    fn bank_size(&mut self, _mode: u32) -> Option<BankInfo> {
        Some(BankInfo {
            bank_size: 64 * 1024,
            aperture_base: 0,
        })
    }

    fn current_bank(&mut self, _kind: BankKind) -> Option<u32> {
        Some(self.bank)
    }

    fn set_bank(&mut self, read: u32, write: u32) -> bool {
        if read != write {
            return false;
        }
        self.bank = read;
        true
    }
}

fn session<H: DeviceIdentity + HiresHardware>(hw: H) -> VddSession<H, RecordingTraps> {
    VddSession::new(VM, &VddConfig::default(), hw, RecordingTraps::default()).unwrap()
}

fn call<H: DeviceIdentity + HiresHardware>(
    s: &mut VddSession<H, RecordingTraps>,
    ordinal: Ordinal,
    ctx: &mut CallContext,
) -> bool {
    s.dispatch(ordinal.raw(), ctx)
}

fn enter_hires<H: DeviceIdentity + HiresHardware>(s: &mut VddSession<H, RecordingTraps>) {
    let mut ctx = CallContext::new(VM);
    assert!(call(s, Ordinal::PreHiresSaveRestore, &mut ctx));
    assert!(call(s, Ordinal::PostHiresSaveRestore, &mut ctx));
    assert_eq!(s.mode(), DisplayMode::HiRes);
}

#[test]
fn register_display_driver_passes_through() {
    let mut s = session(FakeAdapter::default());
    let mut ctx = CallContext::new(VM);
    ctx.regs.eax = 0x1234;
    let before = ctx;
    assert!(!call(&mut s, Ordinal::RegisterDisplayDriver, &mut ctx));
    assert_eq!(ctx, before);
}

#[test]
fn chip_id_is_reported_without_the_handled_flag() {
    let mut s = session(FakeAdapter::default());
    let mut ctx = CallContext::new(VM);
    assert!(!call(&mut s, Ordinal::GetChipId, &mut ctx));
    assert_eq!(ctx.regs.eax, 0x1234_1111);
}

#[test]
fn identity_absent_reports_zero() {
    let mut s = session(NoHardware);
    let mut ctx = CallContext::new(VM);
    ctx.regs.eax = 0xFFFF_FFFF;
    ctx.regs.ecx = 0xFFFF_FFFF;

    assert!(!call(&mut s, Ordinal::GetChipId, &mut ctx));
    assert_eq!(ctx.regs.eax, 0);

    assert!(!call(&mut s, Ordinal::GetTotalVramSize, &mut ctx));
    assert_eq!(ctx.regs.ecx, 0);
}

#[test]
fn total_vram_size_is_handled_when_known() {
    let mut s = session(FakeAdapter::default());
    let mut ctx = CallContext::new(VM);
    assert!(call(&mut s, Ordinal::GetTotalVramSize, &mut ctx));
    assert_eq!(ctx.regs.ecx, 16 * 1024 * 1024);
}

#[test]
fn save_restore_never_leaves_standard_visible_mid_bracket() {
    let mut s = session(NoHardware);
    let mut ctx = CallContext::new(VM);

    assert!(call(&mut s, Ordinal::PreHiresSaveRestore, &mut ctx));
    assert_ne!(s.mode(), DisplayMode::Standard);
    assert_eq!(
        s.mode(),
        DisplayMode::Transitioning(TransitionKind::SaveRestore)
    );

    assert!(call(&mut s, Ordinal::PostHiresSaveRestore, &mut ctx));
    assert_eq!(s.mode(), DisplayMode::HiRes);
    assert!(s.trap_configuration().trapped);
}

#[test]
fn hires_to_vga_round_trip_restores_traps() {
    let mut s = session(NoHardware);
    enter_hires(&mut s);
    let before = s.trap_configuration();

    let mut ctx = CallContext::new(VM);
    assert!(call(&mut s, Ordinal::PreHiresToVga, &mut ctx));
    assert!(call(&mut s, Ordinal::PostHiresToVga, &mut ctx));

    assert_eq!(s.trap_configuration(), before);
    assert_eq!(s.mode(), DisplayMode::Standard);
}

#[test]
fn unmatched_pre_hires_to_vga_leaves_both_ports_disabled() {
    let mut s = session(NoHardware);
    enter_hires(&mut s);
    let seen = s.trap_control().calls.len();

    let mut ctx = CallContext::new(VM);
    assert!(call(&mut s, Ordinal::PreHiresToVga, &mut ctx));

    assert_eq!(
        s.trap_control().calls[seen..],
        [TrapCall::Disable(0x1CE), TrapCall::Disable(0x1CF)]
    );
    assert!(!s.trap_configuration().trapped);
    assert_eq!(
        s.mode(),
        DisplayMode::Transitioning(TransitionKind::HiresToVga)
    );
}

#[test]
fn second_pre_hires_to_vga_before_post_is_rejected() {
    let mut s = session(NoHardware);
    enter_hires(&mut s);
    let mut ctx = CallContext::new(VM);
    assert!(call(&mut s, Ordinal::PreHiresToVga, &mut ctx));
    let calls = s.trap_control().calls.len();
    let traps = s.trap_configuration();

    assert!(!call(&mut s, Ordinal::PreHiresToVga, &mut ctx));
    assert!(!call(&mut s, Ordinal::PreHiresSaveRestore, &mut ctx));
    assert_eq!(s.trap_control().calls.len(), calls);
    assert_eq!(s.trap_configuration(), traps);

    assert!(call(&mut s, Ordinal::PostHiresToVga, &mut ctx));
    assert!(!call(&mut s, Ordinal::PostHiresToVga, &mut ctx));
    assert_eq!(s.mode(), DisplayMode::Standard);
    assert!(s.trap_configuration().trapped);
}

#[test]
fn pre_hires_to_vga_outside_hires_is_a_no_op() {
    let mut s = session(NoHardware);
    let mut ctx = CallContext::new(VM);
    let before = ctx;
    let traps = s.trap_configuration();

    assert!(!call(&mut s, Ordinal::PreHiresToVga, &mut ctx));
    assert_eq!(ctx, before);
    assert!(s.trap_control().calls.is_empty());
    assert_eq!(s.trap_configuration(), traps);
    assert_eq!(s.mode(), DisplayMode::Standard);
}

#[test]
fn enable_traps_during_vga_bridge_keeps_ports_released() {
    let mut s = session(NoHardware);
    enter_hires(&mut s);
    let mut ctx = CallContext::new(VM);
    assert!(call(&mut s, Ordinal::DisplayDriverDisabling, &mut ctx));
    assert!(call(&mut s, Ordinal::PreHiresToVga, &mut ctx));
    let seen = s.trap_control().calls.len();

    assert!(call(&mut s, Ordinal::EnableTraps, &mut ctx));
    assert_eq!(s.trap_control().calls.len(), seen);
    assert!(!s.trap_configuration().trapped);

    assert!(call(&mut s, Ordinal::PostHiresToVga, &mut ctx));
    assert_eq!(
        s.trap_control().calls[seen..],
        [TrapCall::Enable(0x1CE), TrapCall::Enable(0x1CF)]
    );
    assert!(s.trap_configuration().trapped);
}

#[test]
fn driver_disabling_during_vga_bridge_is_not_undone_by_post() {
    let mut s = session(NoHardware);
    enter_hires(&mut s);
    let mut ctx = CallContext::new(VM);
    assert!(call(&mut s, Ordinal::PreHiresToVga, &mut ctx));
    assert!(call(&mut s, Ordinal::DisplayDriverDisabling, &mut ctx));
    assert!(call(&mut s, Ordinal::PostHiresToVga, &mut ctx));

    assert!(!s
        .trap_control()
        .calls
        .iter()
        .any(|call| matches!(call, TrapCall::Enable(_))));
    assert!(!s.trap_configuration().trapped);
    assert_eq!(s.mode(), DisplayMode::Standard);
}

#[test]
fn post_hires_to_vga_without_pre_is_a_no_op() {
    let mut s = session(NoHardware);
    let mut ctx = CallContext::new(VM);
    let before = ctx;
    assert!(!call(&mut s, Ordinal::PostHiresToVga, &mut ctx));
    assert_eq!(ctx, before);
    assert!(s.trap_control().calls.is_empty());
    assert_eq!(s.mode(), DisplayMode::Standard);
}

#[test]
fn set_bank_outside_hires_is_rejected() {
    let mut s = session(FakeAdapter::default());
    let mut ctx = CallContext::new(VM);
    ctx.regs.eax = 3;
    ctx.regs.edx = 5;
    let traps = s.trap_configuration();

    assert!(!call(&mut s, Ordinal::SetBank, &mut ctx));
    assert_eq!(s.trap_configuration(), traps);
    assert_eq!(s.mode(), DisplayMode::Standard);
    assert!(s.trap_control().calls.is_empty());
    assert_eq!(s.hardware().bank, 0);
}

#[test]
fn set_bank_in_hires_goes_to_hardware() {
    let mut s = session(FakeAdapter::default());
    enter_hires(&mut s);

    let mut ctx = CallContext::new(VM);
    ctx.regs.eax = 4;
    ctx.regs.edx = 4;
    assert!(call(&mut s, Ordinal::SetBank, &mut ctx));

    // Split read/write banks are not supported by this adapter: the host retries via VESA.
    ctx.regs.eax = 3;
    ctx.regs.edx = 5;
    assert!(!call(&mut s, Ordinal::SetBank, &mut ctx));

    let mut ctx = CallContext::new(VM);
    assert!(call(&mut s, Ordinal::GetCurrentBankRead, &mut ctx));
    assert_eq!(ctx.regs.edx, 4);
    assert!(call(&mut s, Ordinal::GetCurrentBankWrite, &mut ctx));
    assert_eq!(ctx.regs.edx, 4);
}

#[test]
fn bank_queries_fall_back_without_hardware() {
    let mut s = session(NoHardware);
    enter_hires(&mut s);

    let mut ctx = CallContext::new(VM);
    ctx.regs.ecx = 0x101;
    let before = ctx;
    assert!(!call(&mut s, Ordinal::GetBankSize, &mut ctx));
    assert!(!call(&mut s, Ordinal::GetCurrentBankRead, &mut ctx));
    assert!(!call(&mut s, Ordinal::GetCurrentBankWrite, &mut ctx));
    assert_eq!(ctx, before);
}

#[test]
fn bank_size_is_reported_during_save() {
    let mut s = session(FakeAdapter::default());
    let mut ctx = CallContext::new(VM);
    assert!(call(&mut s, Ordinal::PreHiresSaveRestore, &mut ctx));

    ctx.regs.ecx = 0x101;
    assert!(call(&mut s, Ordinal::GetBankSize, &mut ctx));
    assert_eq!(ctx.regs.edx, 0x10000);
    assert_eq!(ctx.regs.eax, 0);
}

#[test]
fn screen_switch_flag_is_inverted() {
    let mut s = session(NoHardware);
    let mut ctx = CallContext::new(VM);

    // Standard VGA: always safe.
    assert!(!call(&mut s, Ordinal::CheckScreenSwitchOk, &mut ctx));

    enter_hires(&mut s);

    // Known VESA mode: safe (NC).
    ctx.regs.eax = 0xFFFF_FFFF;
    ctx.regs.ecx = 0x112;
    assert!(!call(&mut s, Ordinal::CheckScreenSwitchOk, &mut ctx));

    // Unknown chipset mode nobody can restore: unsafe (CY).
    ctx.regs.eax = 0;
    ctx.regs.ecx = 0x5D;
    assert!(call(&mut s, Ordinal::CheckScreenSwitchOk, &mut ctx));

    // Mode not known to the main VDD at all.
    ctx.regs.ecx = 0;
    assert!(call(&mut s, Ordinal::CheckScreenSwitchOk, &mut ctx));
}

#[test]
fn check_hires_mode_tracks_state() {
    let mut s = session(NoHardware);
    let mut ctx = CallContext::new(VM);
    assert!(!call(&mut s, Ordinal::CheckHiresMode, &mut ctx));
    enter_hires(&mut s);
    assert!(call(&mut s, Ordinal::CheckHiresMode, &mut ctx));
}

#[test]
fn enable_traps_is_idempotent() {
    let mut once = session(NoHardware);
    let mut twice = session(NoHardware);
    let mut ctx = CallContext::new(VM);

    let mut ctx2 = ctx;
    assert!(call(&mut once, Ordinal::DisplayDriverDisabling, &mut ctx));
    assert!(call(&mut twice, Ordinal::DisplayDriverDisabling, &mut ctx2));

    assert!(call(&mut once, Ordinal::EnableTraps, &mut ctx));
    assert!(call(&mut twice, Ordinal::EnableTraps, &mut ctx2));
    assert!(call(&mut twice, Ordinal::EnableTraps, &mut ctx2));

    assert_eq!(once.trap_configuration(), twice.trap_configuration());
    assert!(once.trap_configuration().trapped);
}

#[test]
fn display_driver_disabling_releases_both_ports() {
    let mut s = session(NoHardware);
    let mut ctx = CallContext::new(VM);
    assert!(call(&mut s, Ordinal::DisplayDriverDisabling, &mut ctx));
    assert_eq!(
        s.trap_control().calls,
        [TrapCall::Disable(0x1CE), TrapCall::Disable(0x1CF)]
    );
    assert!(!s.trap_configuration().trapped);
}

#[test]
fn set_hires_mode_defers_vesa_modes() {
    let mut s = session(FakeAdapter::default());
    enter_hires(&mut s);
    let mut ctx = CallContext::new(VM);
    ctx.regs.eax = 0x0118;
    assert!(!call(&mut s, Ordinal::SetHiresMode, &mut ctx));
    ctx.regs.eax = 0x5D;
    assert!(!call(&mut s, Ordinal::SetHiresMode, &mut ctx));
}

#[test]
fn vesa_post_processing_tracks_mode_sets() {
    let mut s = session(NoHardware);
    let mut ctx = CallContext::new(VM);
    ctx.regs.eax = 0x004F;
    ctx.regs.edx = 0x4118_4F02;
    assert!(call(&mut s, Ordinal::VesaCallPostProcessing, &mut ctx));
    assert_eq!(s.mode(), DisplayMode::HiRes);

    // Other VESA functions are just notifications.
    ctx.regs.edx = 0x0000_4F01;
    assert!(call(&mut s, Ordinal::VesaCallPostProcessing, &mut ctx));
    assert_eq!(s.mode(), DisplayMode::HiRes);
}

#[test]
fn chipset_mode_set_through_vesa_is_hires_and_unsafe_to_leave() {
    let mut s = session(NoHardware);
    let mut ctx = CallContext::new(VM);
    ctx.regs.eax = 0x004F;
    ctx.regs.edx = 0x006A_4F02;
    assert!(call(&mut s, Ordinal::VesaCallPostProcessing, &mut ctx));
    assert_eq!(s.mode(), DisplayMode::HiRes);
    assert!(call(&mut s, Ordinal::CheckHiresMode, &mut ctx));

    let mut ctx = CallContext::new(VM);
    ctx.regs.ecx = 0x6A;
    assert!(call(&mut s, Ordinal::CheckScreenSwitchOk, &mut ctx));
}

#[test]
fn vesa_support_services_window_control() {
    let mut s = session(FakeAdapter::default());
    enter_hires(&mut s);

    let mut ctx = CallContext::new(VM);
    ctx.regs.eax = 0x4F05;
    ctx.regs.ebx = 0x0000;
    ctx.regs.edx = 2;
    assert!(call(&mut s, Ordinal::VesaSupport, &mut ctx));
    assert_eq!(ctx.regs.eax & 0xFFFF, 0x004F);
    assert_eq!(s.hardware().bank, 2);

    let mut ctx = CallContext::new(VM);
    ctx.regs.eax = 0x4F00;
    assert!(!call(&mut s, Ordinal::VesaSupport, &mut ctx));
}
