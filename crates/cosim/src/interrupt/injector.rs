//! Interrupt injector.

use tracing::info;

use super::assertion::InterruptAssertion;
use super::schedule::InterruptSchedule;
use crate::config::GeneralConfig;

/// The processor state an injector drives.
///
/// Implemented by the reference simulator's hart (or by `ReferenceHart` in-process).
pub trait InterruptTarget {
    /// Current value of the interrupt-pending register.
    fn pending(&self) -> u64;

    /// Overwrites the interrupt-pending register.
    fn set_pending(&mut self, mip: u64);

    /// Evaluates pending interrupts and enters the trap handler if one is taken.
    fn take_pending_interrupt(&mut self);
}

impl<T: InterruptTarget + ?Sized> InterruptTarget for &mut T {
    fn pending(&self) -> u64 {
        (**self).pending()
    }

    fn set_pending(&mut self, mip: u64) {
        (**self).set_pending(mip);
    }

    fn take_pending_interrupt(&mut self) {
        (**self).take_pending_interrupt();
    }
}

/// Replays scheduled interrupts on a processor as it fetches.
///
/// Assertions are only ever OR-merged into the pending register; nothing here clears
/// a pending bit. A PC that is fetched again gets its assertion reapplied.
#[derive(Debug)]
pub struct InterruptInjector<P> {
    processor: P,
    schedule: InterruptSchedule,
    debug: bool,
}

impl<P: InterruptTarget> InterruptInjector<P> {
    /// Creates an injector over `processor`.
    ///
    /// # Arguments
    ///
    /// * `processor` - The hart receiving interrupts. Pass `&mut hart` to keep ownership.
    /// * `schedule` - PC to assertion map; read-only from here on.
    /// * `debug` - Log every schedule entry now and every assertion as it happens.
    pub fn new(processor: P, schedule: InterruptSchedule, debug: bool) -> Self {
        if debug {
            for (pc, value) in schedule.iter() {
                info!(
                    pc = format_args!("{pc:#018x}"),
                    value = %value,
                    "interrupt scheduled"
                );
            }
        }
        Self {
            processor,
            schedule,
            debug,
        }
    }

    /// Creates an injector whose debug logging follows `general.debug_interrupts`.
    pub fn from_config(processor: P, schedule: InterruptSchedule, general: &GeneralConfig) -> Self {
        Self::new(processor, schedule, general.debug_interrupts)
    }

    /// Applies the assertion scheduled at `pc`, if any.
    ///
    /// Called once per fetch. When `pc` is scheduled, the decoded pending bits are
    /// OR-ed into the processor's pending register and the processor is asked to take
    /// any interrupt that is now eligible.
    ///
    /// # Returns
    ///
    /// `true` if an assertion was applied, `false` if `pc` is not scheduled.
    pub fn assert_int(&mut self, pc: u64) -> bool {
        let Some(value) = self.schedule.get(pc) else {
            return false;
        };
        self.apply(pc, value);
        true
    }

    fn apply(&mut self, pc: u64, value: InterruptAssertion) {
        let mip = self.processor.pending() | value.mip_mask();
        self.processor.set_pending(mip);
        if self.debug {
            info!(
                pc = format_args!("{pc:#018x}"),
                value = %value,
                mip = format_args!("{mip:#x}"),
                "interrupt asserted"
            );
        }
        self.processor.take_pending_interrupt();
    }

    /// The schedule being replayed.
    pub const fn schedule(&self) -> &InterruptSchedule {
        &self.schedule
    }

    /// Whether schedule entries and assertions are logged.
    pub const fn is_debug(&self) -> bool {
        self.debug
    }

    /// The processor being driven.
    pub const fn processor(&self) -> &P {
        &self.processor
    }

    /// Mutable access to the processor, e.g. to advance its PC between fetches.
    pub const fn processor_mut(&mut self) -> &mut P {
        &mut self.processor
    }

    /// Releases the processor.
    pub fn into_inner(self) -> P {
        self.processor
    }
}
