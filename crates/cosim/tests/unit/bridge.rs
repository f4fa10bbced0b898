//! # Coverage Bridge Tests
//!
//! Register-level behavior against a mock transport, and reset/enable semantics of
//! the software bridge model.

use cosim_core::bridge::{BridgeMmio, CoverageBridge, SoftBridge};
use cosim_core::config::BridgeRegisterMap;
use mockall::Sequence;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;

use crate::common::harness::init_tracing;
use crate::common::mocks::bridge::MockMmio;

fn soft_bridge() -> CoverageBridge<SoftBridge> {
    let regs = BridgeRegisterMap::default();
    CoverageBridge::new(SoftBridge::new(regs), regs)
}

#[test]
fn test_register_writes_hit_configured_offsets() {
    init_tracing();
    let regs = BridgeRegisterMap {
        cov_init: 0x100,
        bridge_reset: 0x104,
        meta_reset: 0x108,
        cov_sum: 0x10C,
    };
    let mut mmio = MockMmio::new();
    let mut seq = Sequence::new();
    let _ = mmio
        .expect_write()
        .with(eq(0x100), eq(1_048_576))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    let _ = mmio
        .expect_write()
        .with(eq(0x104), eq(1))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    let _ = mmio
        .expect_write()
        .with(eq(0x104), eq(0))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    let _ = mmio
        .expect_write()
        .with(eq(0x108), eq(1))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    let _ = mmio
        .expect_read()
        .with(eq(0x10C))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(42_u32);

    let mut bridge = CoverageBridge::new(mmio, regs);
    bridge.cov_init(1_048_576);
    bridge.bridge_reset(true);
    bridge.bridge_reset(false);
    bridge.meta_reset(true);
    assert_eq!(bridge.last_covsum(), None);
    assert_eq!(bridge.read_covsum(), 42);
    assert_eq!(bridge.last_covsum(), Some(42));
}

#[test]
fn test_tick_touches_no_register() {
    let mut mmio = MockMmio::new();
    let _ = mmio.expect_read().never();
    let _ = mmio.expect_write().never();

    let mut bridge = CoverageBridge::new(mmio, BridgeRegisterMap::default());
    for _ in 0..100 {
        bridge.tick();
    }
}

#[test]
fn test_covsum_is_non_decreasing_between_resets() {
    init_tracing();
    let mut bridge = soft_bridge();
    bridge.cov_init(1);

    let mut last = bridge.read_covsum();
    for points in [3, 0, 7, 1, 12] {
        bridge.mmio_mut().record(points);
        let now = bridge.read_covsum();
        assert!(now >= last, "coverage went backwards: {last} -> {now}");
        last = now;
    }
    assert_eq!(last, 23);
}

#[test]
fn test_read_does_not_reset_accumulator() {
    let mut bridge = soft_bridge();
    bridge.cov_init(1);
    bridge.mmio_mut().record(5);

    assert_eq!(bridge.read_covsum(), 5);
    assert_eq!(bridge.read_covsum(), 5);
}

#[test]
fn test_bridge_reset_clears_and_holds() {
    let mut bridge = soft_bridge();
    bridge.cov_init(1);
    bridge.mmio_mut().record(9);

    bridge.bridge_reset(true);
    assert_eq!(bridge.read_covsum(), 0);
    bridge.mmio_mut().record(4);
    assert_eq!(bridge.read_covsum(), 0, "accumulated while in reset");

    bridge.bridge_reset(false);
    bridge.mmio_mut().record(4);
    assert_eq!(bridge.read_covsum(), 4);
}

#[test]
fn test_double_bridge_reset_matches_single() {
    let mut once = soft_bridge();
    let mut twice = soft_bridge();
    for bridge in [&mut once, &mut twice] {
        bridge.cov_init(1);
        bridge.mmio_mut().record(6);
    }

    once.bridge_reset(true);
    twice.bridge_reset(true);
    twice.bridge_reset(true);

    assert_eq!(once.mmio(), twice.mmio());
}

#[test]
fn test_disabled_accumulator_ignores_coverage() {
    let mut bridge = soft_bridge();
    bridge.mmio_mut().record(10);
    assert_eq!(bridge.read_covsum(), 0);

    bridge.cov_init(1);
    bridge.mmio_mut().record(10);
    bridge.cov_init(0);
    bridge.mmio_mut().record(10);
    assert_eq!(bridge.read_covsum(), 10);
}

#[test]
fn test_meta_reset_leaves_accumulator_alone() {
    let mut bridge = soft_bridge();
    bridge.cov_init(1);
    bridge.mmio_mut().record(2);
    bridge.mmio_mut().record(3);
    assert_eq!(bridge.mmio().meta_state(), 2);

    bridge.meta_reset(true);
    bridge.meta_reset(false);
    assert_eq!(bridge.mmio().meta_state(), 0);
    assert_eq!(bridge.read_covsum(), 5);
}

#[test]
fn test_soft_bridge_register_readback() {
    init_tracing();
    let regs = BridgeRegisterMap::default();
    let mut soft = SoftBridge::new(regs);

    soft.write(regs.cov_init, 7);
    soft.write(regs.bridge_reset, 1);
    assert_eq!(soft.read(regs.cov_init), 7);
    assert_eq!(soft.read(regs.bridge_reset), 1);
    assert_eq!(soft.read(regs.meta_reset), 0);
    assert!(soft.enabled());
    assert!(soft.in_reset());

    // Read-only and unmapped registers.
    soft.write(regs.cov_sum, 99);
    assert_eq!(soft.covsum(), 0);
    assert_eq!(soft.read(0xFFF0), 0);
}
