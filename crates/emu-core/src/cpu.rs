//! CPU core trait.

use crate::Bus;

/// A CPU core.
///
/// CPUs take the bus by reference on every tick because they access memory
/// on specific cycles. Interrupt inputs are modelled as line levels; edge
/// detection, priority and masking are the CPU's business.
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// Advance the CPU by one bus cycle.
    fn tick<B: Bus>(&mut self, bus: &mut B);

    /// Returns the current program counter.
    fn pc(&self) -> u16;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true if the CPU has stopped executing.
    fn is_halted(&self) -> bool;

    /// Drive the maskable interrupt line (true = asserted).
    fn set_irq_line(&mut self, asserted: bool);

    /// Drive the non-maskable interrupt line (true = asserted).
    fn set_nmi_line(&mut self, asserted: bool);

    /// Assert reset. The reset sequence runs at the next instruction boundary.
    fn reset(&mut self);
}
