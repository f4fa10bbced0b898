//! Reference hart interrupt model.
//!
//! The ISA reference simulator owns the real processor state; this module models just
//! enough of a RISC-V hart to receive injected interrupts. It provides:
//! 1. **CSR Fields:** `mip`, `mie`, and `mstatus` bit positions.
//! 2. **Privilege Modes:** User, Supervisor, and Machine.
//! 3. **Interrupt Selection:** Priority, enable, and delegation rules for pending interrupts.
//! 4. **Trap Entry:** Cause/EPC bookkeeping and vectored handler dispatch.

/// Interrupt-related CSR fields.
pub mod csr;

/// Privilege mode definitions.
pub mod mode;

use std::fmt;

use tracing::debug;

use crate::interrupt::InterruptTarget;
use mode::PrivilegeMode;

/// Interrupt sources a hart can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interrupt {
    /// Supervisor software interrupt.
    SupervisorSoftware,
    /// Machine software interrupt.
    MachineSoftware,
    /// Supervisor timer interrupt.
    SupervisorTimer,
    /// Machine timer interrupt.
    MachineTimer,
    /// Supervisor external interrupt.
    SupervisorExternal,
    /// Machine external interrupt.
    MachineExternal,
}

impl Interrupt {
    /// Sources in decreasing priority order.
    pub const PRIORITY: [Self; 6] = [
        Self::MachineExternal,
        Self::MachineSoftware,
        Self::MachineTimer,
        Self::SupervisorExternal,
        Self::SupervisorSoftware,
        Self::SupervisorTimer,
    ];

    /// Exception code (the bit position in `mip`/`mie`).
    pub const fn code(self) -> u64 {
        match self {
            Self::SupervisorSoftware => 1,
            Self::MachineSoftware => 3,
            Self::SupervisorTimer => 5,
            Self::MachineTimer => 7,
            Self::SupervisorExternal => 9,
            Self::MachineExternal => 11,
        }
    }

    /// Pending/enable mask for this source.
    pub const fn mask(self) -> u64 {
        1 << self.code()
    }

    /// Value written to `mcause`/`scause` when the interrupt is taken.
    pub const fn cause(self) -> u64 {
        csr::CAUSE_INTERRUPT_BIT | self.code()
    }
}

impl fmt::Display for Interrupt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SupervisorSoftware => "SupervisorSoftwareInterrupt",
            Self::MachineSoftware => "MachineSoftwareInterrupt",
            Self::SupervisorTimer => "SupervisorTimerInterrupt",
            Self::MachineTimer => "MachineTimerInterrupt",
            Self::SupervisorExternal => "SupervisorExternalInterrupt",
            Self::MachineExternal => "MachineExternalInterrupt",
        };
        f.write_str(name)
    }
}

/// Interrupt-visible architectural state of one hart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceHart {
    /// Program counter.
    pub pc: u64,
    /// Current privilege mode.
    pub privilege: PrivilegeMode,
    /// Machine status register.
    pub mstatus: u64,
    /// Machine interrupt enable.
    pub mie: u64,
    /// Machine interrupt pending.
    pub mip: u64,
    /// Machine interrupt delegation.
    pub mideleg: u64,
    /// Machine trap vector.
    pub mtvec: u64,
    /// Supervisor trap vector.
    pub stvec: u64,
    /// Machine exception program counter.
    pub mepc: u64,
    /// Supervisor exception program counter.
    pub sepc: u64,
    /// Machine trap cause.
    pub mcause: u64,
    /// Supervisor trap cause.
    pub scause: u64,
    /// Interrupts entered so far, oldest first.
    pub taken: Vec<Interrupt>,
}

impl ReferenceHart {
    /// Creates a hart in machine mode at `pc` with all interrupts disabled.
    pub fn new(pc: u64) -> Self {
        Self {
            pc,
            ..Self::default()
        }
    }

    /// Returns the highest-priority interrupt that would be taken now, if any.
    ///
    /// An interrupt is taken when it is pending and enabled in `mie`, and either the
    /// hart runs below the interrupt's target privilege or at that privilege with the
    /// matching global enable set. The target is Supervisor when the source is
    /// delegated in `mideleg`, Machine otherwise; a delegated source stays pending
    /// while the hart runs in Machine mode.
    pub fn pending_interrupt(&self) -> Option<Interrupt> {
        let m_global_ie = (self.mstatus & csr::MSTATUS_MIE) != 0;
        let s_global_ie = (self.mstatus & csr::MSTATUS_SIE) != 0;

        Interrupt::PRIORITY.into_iter().find(|irq| {
            let mask = irq.mask();
            if (self.mip & mask) == 0 || (self.mie & mask) == 0 {
                return false;
            }
            let target = self.target_privilege(*irq);
            if self.privilege < target {
                return true;
            }
            self.privilege == target
                && match target {
                    PrivilegeMode::Machine => m_global_ie,
                    PrivilegeMode::Supervisor => s_global_ie,
                    PrivilegeMode::User => false,
                }
        })
    }

    /// Enters the trap handler for `irq`.
    ///
    /// Saves the PC and cause into the target mode's EPC/cause registers, stacks the
    /// interrupt enable and previous privilege in `mstatus`, switches privilege, and
    /// jumps to the (possibly vectored) trap vector.
    pub fn enter_interrupt(&mut self, irq: Interrupt) {
        let code = irq.code();
        let from = self.privilege;

        if self.target_privilege(irq) == PrivilegeMode::Supervisor {
            self.scause = irq.cause();
            self.sepc = self.pc;

            let mut mstatus = self.mstatus;
            if (mstatus & csr::MSTATUS_SIE) != 0 {
                mstatus |= csr::MSTATUS_SPIE;
            } else {
                mstatus &= !csr::MSTATUS_SPIE;
            }
            if from == PrivilegeMode::Supervisor {
                mstatus |= csr::MSTATUS_SPP;
            } else {
                mstatus &= !csr::MSTATUS_SPP;
            }
            self.mstatus = mstatus & !csr::MSTATUS_SIE;

            self.privilege = PrivilegeMode::Supervisor;
            self.pc = handler_address(self.stvec, code);
        } else {
            self.mcause = irq.cause();
            self.mepc = self.pc;

            let mut mstatus = self.mstatus;
            if (mstatus & csr::MSTATUS_MIE) != 0 {
                mstatus |= csr::MSTATUS_MPIE;
            } else {
                mstatus &= !csr::MSTATUS_MPIE;
            }
            mstatus = (mstatus & !csr::MSTATUS_MPP) | (from.bits() << csr::MSTATUS_MPP_SHIFT);
            self.mstatus = mstatus & !csr::MSTATUS_MIE;

            self.privilege = PrivilegeMode::Machine;
            self.pc = handler_address(self.mtvec, code);
        }

        debug!(
            interrupt = %irq,
            %from,
            to = %self.privilege,
            pc = format_args!("{:#x}", self.pc),
            "interrupt taken"
        );
        self.taken.push(irq);
    }

    /// Delegated sources target Supervisor regardless of the current privilege, so
    /// Machine mode never takes them.
    const fn target_privilege(&self, irq: Interrupt) -> PrivilegeMode {
        if (self.mideleg & irq.mask()) != 0 {
            PrivilegeMode::Supervisor
        } else {
            PrivilegeMode::Machine
        }
    }
}

fn handler_address(tvec: u64, code: u64) -> u64 {
    let base = tvec & !csr::TVEC_MODE_MASK;
    if (tvec & csr::TVEC_MODE_MASK) == csr::TVEC_VECTORED {
        base + 4 * code
    } else {
        base
    }
}

impl InterruptTarget for ReferenceHart {
    fn pending(&self) -> u64 {
        self.mip
    }

    fn set_pending(&mut self, mip: u64) {
        self.mip = mip;
    }

    fn take_pending_interrupt(&mut self) {
        if let Some(irq) = self.pending_interrupt() {
            self.enter_interrupt(irq);
        }
    }
}
