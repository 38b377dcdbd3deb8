//! Master clock configuration and wall-clock time sources.

use std::time::Duration;

use crate::Ticks;

/// Master clock configuration for a system.
///
/// Each system has a master crystal that drives all timing. Components run
/// at divided rates, but everything derives from this frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterClock {
    /// Crystal frequency in Hz (e.g. `21_477_272` for an NTSC console).
    pub frequency_hz: u64,
}

impl MasterClock {
    #[must_use]
    pub const fn new(frequency_hz: u64) -> Self {
        Self { frequency_hz }
    }

    /// Real time taken by `ticks` crystal ticks.
    #[must_use]
    pub fn duration_of(&self, ticks: Ticks) -> Duration {
        let nanos = u128::from(ticks.get()) * 1_000_000_000 / u128::from(self.frequency_hz);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

/// A monotonic time source.
///
/// The emulation loop never reads the system clock directly. Pacing code
/// takes one of these so tests can substitute a fake clock and assert on
/// exact deadlines.
pub trait MonotonicClock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;

    /// Block until `now()` reaches `deadline`. Returns immediately if the
    /// deadline has already passed.
    fn sleep_until(&self, deadline: Duration);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_second_of_ticks() {
        let clock = MasterClock::new(21_477_272);
        assert_eq!(
            clock.duration_of(Ticks::new(21_477_272)),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn ntsc_frame_duration() {
        // 341 dots x 262 lines x 4 crystal ticks per dot
        let clock = MasterClock::new(21_477_272);
        let frame = clock.duration_of(Ticks::new(341 * 262 * 4));
        assert_eq!(frame.as_micros(), 16_639);
    }
}
