//! # Interrupt Injector Tests
//!
//! OR-merge semantics against a recording processor, then end-to-end trap entry on
//! the reference hart.

use cosim_core::config::Config;
use cosim_core::hart::mode::PrivilegeMode;
use cosim_core::hart::{Interrupt, ReferenceHart, csr};
use cosim_core::interrupt::{
    InterruptAssertion, InterruptInjector, InterruptSchedule, InterruptTarget,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::init_tracing;

/// Processor stand-in that records evaluation requests.
#[derive(Debug, Default)]
struct RecordingHart {
    mip: u64,
    evaluations: Vec<u64>,
}

impl InterruptTarget for RecordingHart {
    fn pending(&self) -> u64 {
        self.mip
    }

    fn set_pending(&mut self, mip: u64) {
        self.mip = mip;
    }

    fn take_pending_interrupt(&mut self) {
        self.evaluations.push(self.mip);
    }
}

fn example_schedule() -> InterruptSchedule {
    InterruptSchedule::from_entries([
        (0x1000, InterruptAssertion::MACHINE_TIMER),
        (0x2004, InterruptAssertion::MACHINE_EXTERNAL),
    ])
    .unwrap()
}

#[test]
fn test_assert_int_or_merges_and_evaluates() {
    init_tracing();
    let hart = RecordingHart {
        mip: csr::MIP_SSIP,
        ..RecordingHart::default()
    };
    let mut injector = InterruptInjector::new(hart, example_schedule(), false);

    assert!(injector.assert_int(0x1000));
    assert_eq!(injector.processor().mip, csr::MIP_SSIP | csr::MIP_MTIP);

    assert!(injector.assert_int(0x2004));
    assert_eq!(
        injector.processor().mip,
        csr::MIP_SSIP | csr::MIP_MTIP | csr::MIP_MEIP
    );

    let hart = injector.into_inner();
    assert_eq!(
        hart.evaluations,
        vec![
            csr::MIP_SSIP | csr::MIP_MTIP,
            csr::MIP_SSIP | csr::MIP_MTIP | csr::MIP_MEIP,
        ]
    );
}

#[test]
fn test_unscheduled_pc_is_a_no_op() {
    let mut injector = InterruptInjector::new(RecordingHart::default(), example_schedule(), false);

    assert!(!injector.assert_int(0x3000));
    assert!(!injector.assert_int(0x1004));
    assert_eq!(injector.processor().mip, 0);
    assert!(injector.processor().evaluations.is_empty());
}

#[test]
fn test_revisited_pc_reapplies_assertion() {
    let mut injector = InterruptInjector::new(RecordingHart::default(), example_schedule(), false);

    assert!(injector.assert_int(0x1000));
    // The handler cleared the pending bit; a loop brings the PC back.
    injector.processor_mut().mip = 0;
    assert!(injector.assert_int(0x1000));
    assert!(injector.assert_int(0x1000));

    assert_eq!(injector.processor().mip, csr::MIP_MTIP);
    assert_eq!(injector.processor().evaluations.len(), 3);
}

#[test]
fn test_injector_never_clears_bits() {
    let all = csr::MIP_SSIP | csr::MIP_STIP | csr::MIP_MTIP | csr::MIP_MEIP;
    let hart = RecordingHart {
        mip: all,
        ..RecordingHart::default()
    };
    let mut injector = InterruptInjector::new(hart, example_schedule(), false);

    assert!(injector.assert_int(0x2004));
    assert_eq!(injector.processor().mip, all);
}

#[test]
fn test_debug_mode_logs_without_changing_behavior() {
    init_tracing();
    let mut injector = InterruptInjector::new(RecordingHart::default(), example_schedule(), true);
    assert_eq!(injector.schedule().len(), 2);
    assert!(injector.assert_int(0x2004));
    assert_eq!(injector.processor().mip, csr::MIP_MEIP);
}

#[rstest]
#[case(r#"{}"#, false)]
#[case(r#"{ "general": { "debug_interrupts": true } }"#, true)]
fn test_from_config_follows_debug_flag(#[case] json: &str, #[case] debug: bool) {
    init_tracing();
    let config = Config::from_json(json).unwrap();
    let mut injector =
        InterruptInjector::from_config(RecordingHart::default(), example_schedule(), &config.general);
    assert_eq!(injector.is_debug(), debug);
    assert!(injector.assert_int(0x1000));
    assert_eq!(injector.processor().mip, csr::MIP_MTIP);
}

#[test]
fn test_timer_interrupt_enters_vectored_machine_handler() {
    init_tracing();
    let mut hart = ReferenceHart::new(0x1000);
    hart.mstatus = csr::MSTATUS_MIE;
    hart.mie = csr::MIE_MTIE;
    hart.mtvec = 0x8000_0000 | csr::TVEC_VECTORED;

    let mut injector = InterruptInjector::new(&mut hart, example_schedule(), false);
    assert!(injector.assert_int(0x1000));
    drop(injector);

    assert_eq!(hart.taken, vec![Interrupt::MachineTimer]);
    assert_eq!(hart.pc, 0x8000_0000 + 4 * 7);
    assert_eq!(hart.mepc, 0x1000);
    assert_eq!(hart.mcause, csr::CAUSE_INTERRUPT_BIT | 7);
    assert_eq!(hart.mstatus & csr::MSTATUS_MIE, 0);
    assert_ne!(hart.mstatus & csr::MSTATUS_MPIE, 0);
    assert_eq!(hart.mstatus & csr::MSTATUS_MPP, csr::MSTATUS_MPP);
    assert_eq!(hart.privilege, PrivilegeMode::Machine);
}

#[test]
fn test_masked_interrupt_stays_pending() {
    let mut hart = ReferenceHart::new(0x2004);
    hart.mstatus = csr::MSTATUS_MIE;
    // MEIE not set.
    hart.mie = csr::MIE_MTIE;

    let mut injector = InterruptInjector::new(&mut hart, example_schedule(), false);
    assert!(injector.assert_int(0x2004));
    drop(injector);

    assert!(hart.taken.is_empty());
    assert_eq!(hart.mip, csr::MIP_MEIP);
    assert_eq!(hart.pc, 0x2004);
}
