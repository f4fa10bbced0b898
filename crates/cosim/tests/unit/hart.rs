//! # Reference Hart Tests
//!
//! Interrupt priority, enable and delegation rules, and trap entry bookkeeping.

use cosim_core::hart::mode::PrivilegeMode;
use cosim_core::hart::{Interrupt, ReferenceHart, csr};
use cosim_core::interrupt::InterruptTarget;
use pretty_assertions::assert_eq;
use rstest::rstest;

const ALL_INTERRUPTS: u64 = csr::MIP_SSIP
    | csr::MIP_MSIP
    | csr::MIP_STIP
    | csr::MIP_MTIP
    | csr::MIP_SEIP
    | csr::MIP_MEIP;

fn machine_hart() -> ReferenceHart {
    let mut hart = ReferenceHart::new(0x8000_0000);
    hart.mstatus = csr::MSTATUS_MIE;
    hart.mie = ALL_INTERRUPTS;
    hart
}

#[test]
fn test_new_hart_is_quiet() {
    let hart = ReferenceHart::new(0x1000);
    assert_eq!(hart.pc, 0x1000);
    assert_eq!(hart.privilege, PrivilegeMode::Machine);
    assert_eq!(hart.pending_interrupt(), None);
}

#[test]
fn test_priority_order() {
    let mut hart = machine_hart();
    hart.mip = ALL_INTERRUPTS;

    let mut order = Vec::new();
    while let Some(irq) = hart.pending_interrupt() {
        order.push(irq);
        hart.mip &= !irq.mask();
    }
    assert_eq!(order, Interrupt::PRIORITY.to_vec());
    assert_eq!(
        order,
        vec![
            Interrupt::MachineExternal,
            Interrupt::MachineSoftware,
            Interrupt::MachineTimer,
            Interrupt::SupervisorExternal,
            Interrupt::SupervisorSoftware,
            Interrupt::SupervisorTimer,
        ]
    );
}

#[rstest]
#[case(PrivilegeMode::Machine, 0, None)]
#[case(PrivilegeMode::Machine, csr::MSTATUS_MIE, Some(Interrupt::MachineTimer))]
#[case(PrivilegeMode::Supervisor, 0, Some(Interrupt::MachineTimer))]
#[case(PrivilegeMode::User, 0, Some(Interrupt::MachineTimer))]
fn test_machine_interrupt_global_enable(
    #[case] privilege: PrivilegeMode,
    #[case] mstatus: u64,
    #[case] expected: Option<Interrupt>,
) {
    let mut hart = ReferenceHart::new(0);
    hart.privilege = privilege;
    hart.mstatus = mstatus;
    hart.mie = csr::MIE_MTIE;
    hart.mip = csr::MIP_MTIP;
    assert_eq!(hart.pending_interrupt(), expected);
}

#[test]
fn test_disabled_source_is_ignored() {
    let mut hart = machine_hart();
    hart.mie = csr::MIE_MTIE;
    hart.mip = csr::MIP_MEIP | csr::MIP_MTIP;
    assert_eq!(hart.pending_interrupt(), Some(Interrupt::MachineTimer));
}

#[test]
fn test_delegated_interrupt_is_not_taken_in_machine_mode() {
    let mut hart = machine_hart();
    hart.mstatus |= csr::MSTATUS_SIE;
    hart.mideleg = csr::MIP_STIP;
    hart.mip = csr::MIP_STIP;
    assert_eq!(hart.pending_interrupt(), None);
}

#[rstest]
#[case(csr::MIP_SEIP)]
#[case(csr::MIP_MEIP)]
#[case(csr::MIP_MTIP)]
fn test_delegated_source_stays_pending_in_machine_mode(#[case] source: u64) {
    let mut hart = machine_hart();
    hart.mideleg = source;
    hart.mip = source;

    assert_eq!(hart.pending_interrupt(), None);
    hart.take_pending_interrupt();
    assert!(hart.taken.is_empty());
    assert_eq!(hart.mcause, 0);
    assert_eq!(hart.mip, source);
}

#[test]
fn test_machine_mode_skips_delegated_source_for_local_one() {
    let mut hart = machine_hart();
    hart.mideleg = csr::MIP_MEIP;
    hart.mip = csr::MIP_MEIP | csr::MIP_MTIP;
    assert_eq!(hart.pending_interrupt(), Some(Interrupt::MachineTimer));
}

#[test]
fn test_delegated_source_is_taken_after_dropping_to_supervisor() {
    let mut hart = machine_hart();
    hart.mstatus |= csr::MSTATUS_SIE;
    hart.mideleg = csr::MIP_SEIP;
    hart.mip = csr::MIP_SEIP;
    hart.stvec = 0x9000;
    assert_eq!(hart.pending_interrupt(), None);

    hart.privilege = PrivilegeMode::Supervisor;
    hart.take_pending_interrupt();
    assert_eq!(hart.taken, vec![Interrupt::SupervisorExternal]);
    assert_eq!(hart.scause, csr::CAUSE_INTERRUPT_BIT | 9);
    assert_eq!(hart.pc, 0x9000);
}

#[rstest]
#[case(0, None)]
#[case(csr::MSTATUS_SIE, Some(Interrupt::SupervisorTimer))]
fn test_delegated_interrupt_in_supervisor_mode(
    #[case] mstatus: u64,
    #[case] expected: Option<Interrupt>,
) {
    let mut hart = ReferenceHart::new(0);
    hart.privilege = PrivilegeMode::Supervisor;
    hart.mstatus = mstatus;
    hart.mideleg = csr::MIP_STIP;
    hart.mie = csr::MIE_STIE;
    hart.mip = csr::MIP_STIP;
    assert_eq!(hart.pending_interrupt(), expected);
}

#[test]
fn test_supervisor_trap_entry() {
    let mut hart = ReferenceHart::new(0x4000);
    hart.privilege = PrivilegeMode::Supervisor;
    hart.mstatus = csr::MSTATUS_SIE;
    hart.mideleg = csr::MIP_SEIP;
    hart.mie = csr::MIE_SEIE;
    hart.stvec = 0x9000;

    hart.set_pending(csr::MIP_SEIP);
    hart.take_pending_interrupt();

    assert_eq!(hart.taken, vec![Interrupt::SupervisorExternal]);
    assert_eq!(hart.privilege, PrivilegeMode::Supervisor);
    assert_eq!(hart.pc, 0x9000);
    assert_eq!(hart.sepc, 0x4000);
    assert_eq!(hart.scause, csr::CAUSE_INTERRUPT_BIT | 9);
    assert_eq!(hart.mstatus & csr::MSTATUS_SIE, 0);
    assert_ne!(hart.mstatus & csr::MSTATUS_SPIE, 0);
    assert_ne!(hart.mstatus & csr::MSTATUS_SPP, 0);
    assert_eq!(hart.mcause, 0);
    assert_eq!(hart.mepc, 0);
}

#[test]
fn test_machine_trap_from_user_mode() {
    let mut hart = ReferenceHart::new(0x5000);
    hart.privilege = PrivilegeMode::User;
    hart.mie = csr::MIE_MSIE;
    hart.mtvec = 0x8000_0100;

    hart.set_pending(csr::MIP_MSIP);
    hart.take_pending_interrupt();

    assert_eq!(hart.taken, vec![Interrupt::MachineSoftware]);
    assert_eq!(hart.privilege, PrivilegeMode::Machine);
    // Direct mode: every cause lands on the base.
    assert_eq!(hart.pc, 0x8000_0100);
    assert_eq!(hart.mepc, 0x5000);
    assert_eq!(hart.mcause, csr::CAUSE_INTERRUPT_BIT | 3);
    assert_eq!(hart.mstatus & csr::MSTATUS_MPP, 0);
    assert_eq!(hart.mstatus & csr::MSTATUS_MPIE, 0);
}

#[test]
fn test_vectored_handler_offsets() {
    let mut hart = machine_hart();
    hart.mtvec = 0x8000_0000 | csr::TVEC_VECTORED;
    hart.mip = csr::MIP_MEIP;
    hart.take_pending_interrupt();
    assert_eq!(hart.pc, 0x8000_0000 + 4 * 11);
}

#[test]
fn test_trap_entry_masks_further_interrupts() {
    let mut hart = machine_hart();
    hart.mip = csr::MIP_MTIP | csr::MIP_MSIP;
    hart.take_pending_interrupt();
    hart.take_pending_interrupt();

    assert_eq!(hart.taken, vec![Interrupt::MachineSoftware]);
    assert_eq!(hart.pending_interrupt(), None);
}

#[test]
fn test_nothing_pending_changes_nothing() {
    let mut hart = machine_hart();
    let before = hart.clone();
    hart.take_pending_interrupt();
    assert_eq!(hart, before);
}

#[rstest]
#[case(Interrupt::SupervisorSoftware, 1, "SupervisorSoftwareInterrupt")]
#[case(Interrupt::MachineSoftware, 3, "MachineSoftwareInterrupt")]
#[case(Interrupt::SupervisorTimer, 5, "SupervisorTimerInterrupt")]
#[case(Interrupt::MachineTimer, 7, "MachineTimerInterrupt")]
#[case(Interrupt::SupervisorExternal, 9, "SupervisorExternalInterrupt")]
#[case(Interrupt::MachineExternal, 11, "MachineExternalInterrupt")]
fn test_interrupt_encoding(#[case] irq: Interrupt, #[case] code: u64, #[case] name: &str) {
    assert_eq!(irq.code(), code);
    assert_eq!(irq.mask(), 1 << code);
    assert_eq!(irq.cause(), (1 << 63) | code);
    assert_eq!(irq.to_string(), name);
}

#[rstest]
#[case(0, PrivilegeMode::User)]
#[case(1, PrivilegeMode::Supervisor)]
#[case(2, PrivilegeMode::Machine)]
#[case(3, PrivilegeMode::Machine)]
fn test_privilege_from_bits(#[case] bits: u64, #[case] mode: PrivilegeMode) {
    assert_eq!(PrivilegeMode::from_bits(bits), mode);
}
