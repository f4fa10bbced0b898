//! Interrupt-related CSR fields.
//!
//! Only the machine and supervisor interrupt state touched by interrupt injection
//! and trap entry is modelled here:
//! 1. **Pending bits:** `mip` positions for software, timer, and external sources.
//! 2. **Enable bits:** `mie` positions and the `mstatus` global enables.
//! 3. **Trap bookkeeping:** `mstatus` previous-enable and previous-privilege fields.

/// Machine interrupt enable bit in `mstatus`.
pub const MSTATUS_MIE: u64 = 1 << 3;

/// Supervisor interrupt enable bit in `mstatus`.
pub const MSTATUS_SIE: u64 = 1 << 1;

/// Supervisor previous interrupt enable bit in `mstatus`.
pub const MSTATUS_SPIE: u64 = 1 << 5;

/// Machine previous interrupt enable bit in `mstatus`.
pub const MSTATUS_MPIE: u64 = 1 << 7;

/// Supervisor previous privilege bit in `mstatus`.
pub const MSTATUS_SPP: u64 = 1 << 8;

/// Machine previous privilege field in `mstatus`.
pub const MSTATUS_MPP: u64 = 3 << 11;

/// Shift of the machine previous privilege field.
pub const MSTATUS_MPP_SHIFT: u64 = 11;

/// Supervisor software interrupt pending bit in `mip`.
pub const MIP_SSIP: u64 = 1 << 1;

/// Machine software interrupt pending bit in `mip`.
pub const MIP_MSIP: u64 = 1 << 3;

/// Supervisor timer interrupt pending bit in `mip`.
pub const MIP_STIP: u64 = 1 << 5;

/// Machine timer interrupt pending bit in `mip`.
pub const MIP_MTIP: u64 = 1 << 7;

/// Supervisor external interrupt pending bit in `mip`.
pub const MIP_SEIP: u64 = 1 << 9;

/// Machine external interrupt pending bit in `mip`.
pub const MIP_MEIP: u64 = 1 << 11;

/// Supervisor software interrupt enable bit in `mie`.
pub const MIE_SSIE: u64 = MIP_SSIP;

/// Machine software interrupt enable bit in `mie`.
pub const MIE_MSIE: u64 = MIP_MSIP;

/// Supervisor timer interrupt enable bit in `mie`.
pub const MIE_STIE: u64 = MIP_STIP;

/// Machine timer interrupt enable bit in `mie`.
pub const MIE_MTIE: u64 = MIP_MTIP;

/// Supervisor external interrupt enable bit in `mie`.
pub const MIE_SEIE: u64 = MIP_SEIP;

/// Machine external interrupt enable bit in `mie`.
pub const MIE_MEIE: u64 = MIP_MEIP;

/// Interrupt flag of `mcause`/`scause`.
pub const CAUSE_INTERRUPT_BIT: u64 = 1 << 63;

/// Vectored mode flag in `mtvec`/`stvec`.
pub const TVEC_VECTORED: u64 = 1;

/// Mode field mask in `mtvec`/`stvec`.
pub const TVEC_MODE_MASK: u64 = 3;
