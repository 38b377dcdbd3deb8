//! Length counter.

use crate::tables::LENGTH_TABLE;

/// Silences its channel when it reaches zero. Clocked at half-frame rate.
#[derive(Debug, Clone, Default)]
pub(crate) struct LengthCounter {
    pub(crate) counter: u8,
    pub(crate) halt: bool,
    enabled: bool,
}

impl LengthCounter {
    pub(crate) fn clock(&mut self) {
        if !self.halt && self.counter > 0 {
            self.counter -= 1;
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.counter > 0
    }

    /// Load from the table. Ignored while the channel is disabled.
    pub(crate) fn load(&mut self, index: u8) {
        if self.enabled {
            self.counter = LENGTH_TABLE[usize::from(index & 0x1F)];
        }
    }

    /// Disabling clears the counter; enabling leaves it alone.
    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.counter = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_ignored_while_disabled() {
        let mut length = LengthCounter::default();
        length.load(1);
        assert_eq!(length.counter, 0);
        length.set_enabled(true);
        length.load(1);
        assert_eq!(length.counter, 254);
    }

    #[test]
    fn enabling_never_clears() {
        let mut length = LengthCounter::default();
        length.set_enabled(true);
        length.load(0);
        length.set_enabled(true);
        assert_eq!(length.counter, 10);
        length.set_enabled(false);
        assert_eq!(length.counter, 0);
    }

    #[test]
    fn halt_freezes_counter() {
        let mut length = LengthCounter::default();
        length.set_enabled(true);
        length.load(0);
        length.halt = true;
        length.clock();
        assert_eq!(length.counter, 10);
    }
}
