//! Trait for components advanced by the master clock.

use crate::Ticks;

/// A component advanced one master clock tick at a time.
///
/// Components track their own phase relative to the crystal and only do
/// work on the ticks that belong to them.
pub trait Tickable {
    /// Advance by one master clock tick.
    fn tick(&mut self);

    /// Advance by several ticks. Must behave exactly like calling `tick()`
    /// `count` times.
    fn tick_n(&mut self, count: Ticks) {
        for _ in 0..count.get() {
            self.tick();
        }
    }
}
