//! Pulse sweep unit.

/// Which pulse channel a sweep belongs to. Pulse 1 negates with one's
/// complement (an extra -1), pulse 2 with two's complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseUnit {
    One,
    Two,
}

#[derive(Debug, Clone)]
pub(crate) struct Sweep {
    unit: PulseUnit,
    enabled: bool,
    negate: bool,
    shift: u8,
    period: u8,
    divider: u8,
    reload: bool,
}

impl Sweep {
    pub(crate) fn new(unit: PulseUnit) -> Self {
        Self {
            unit,
            enabled: false,
            negate: false,
            shift: 0,
            period: 0,
            divider: 0,
            reload: false,
        }
    }

    /// `$4001`/`$4005`: EPPP NSSS.
    pub(crate) fn write(&mut self, value: u8) {
        self.enabled = value & 0x80 != 0;
        self.period = (value >> 4) & 0x07;
        self.negate = value & 0x08 != 0;
        self.shift = value & 0x07;
        self.reload = true;
    }

    fn target(&self, current: u16) -> u16 {
        let change = current >> self.shift;
        if !self.negate {
            return current + change;
        }
        match self.unit {
            PulseUnit::One => current.wrapping_sub(change).wrapping_sub(1),
            PulseUnit::Two => current.wrapping_sub(change),
        }
    }

    /// Periods under 8 or targets past 11 bits mute the channel even
    /// when the sweep is disabled.
    pub(crate) fn mutes(&self, current: u16) -> bool {
        current < 8 || self.target(current) > 0x7FF
    }

    /// Half-frame clock. Returns the (possibly updated) timer period.
    pub(crate) fn clock(&mut self, current: u16) -> u16 {
        let mut period = current;
        if self.divider == 0 && self.enabled && self.shift > 0 && !self.mutes(current) {
            period = self.target(current);
        }

        if self.divider == 0 || self.reload {
            self.divider = self.period;
            self.reload = false;
        } else {
            self.divider -= 1;
        }
        period
    }
}
