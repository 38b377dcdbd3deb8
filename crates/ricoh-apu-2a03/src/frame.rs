//! Frame sequencer.

use tracing::debug;

use crate::Region;
use crate::tables::frame_steps;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    /// Four steps; raises the frame IRQ on the last unless inhibited.
    FourStep,
    /// Five steps; never raises the IRQ.
    FiveStep,
}

/// Housekeeping clocks produced by one sequencer tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameEvents {
    pub quarter: bool,
    pub half: bool,
}

impl FrameEvents {
    const QUARTER: Self = Self {
        quarter: true,
        half: false,
    };
    const BOTH: Self = Self {
        quarter: true,
        half: true,
    };
}

/// A `$4017` write waiting to take effect.
#[derive(Debug, Clone, Copy)]
struct PendingRestart {
    cycles: u8,
    mode: FrameMode,
}

#[derive(Debug, Clone)]
pub struct FrameSequencer {
    steps: &'static ([u32; 4], [u32; 5]),
    mode: FrameMode,
    counter: u32,
    step: usize,
    irq_inhibit: bool,
    irq_flag: bool,
    pending: Option<PendingRestart>,
}

impl FrameSequencer {
    #[must_use]
    pub fn new(region: Region) -> Self {
        Self {
            steps: frame_steps(region),
            mode: FrameMode::FourStep,
            counter: 0,
            step: 0,
            irq_inhibit: false,
            irq_flag: false,
            pending: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> FrameMode {
        self.mode
    }

    #[must_use]
    pub fn irq_flag(&self) -> bool {
        self.irq_flag
    }

    pub fn clear_irq(&mut self) {
        self.irq_flag = false;
    }

    /// `$4017` write. The inhibit bit applies at once; the mode change and
    /// sequence restart land 3 CPU cycles later when written on an even
    /// cycle, 4 on an odd one.
    pub fn write(&mut self, value: u8, odd_cycle: bool) {
        self.irq_inhibit = value & 0x40 != 0;
        if self.irq_inhibit {
            self.irq_flag = false;
        }
        let mode = if value & 0x80 != 0 {
            FrameMode::FiveStep
        } else {
            FrameMode::FourStep
        };
        self.pending = Some(PendingRestart {
            cycles: if odd_cycle { 4 } else { 3 },
            mode,
        });
    }

    /// Advance one CPU cycle.
    pub fn tick(&mut self) -> FrameEvents {
        if let Some(pending) = self.pending.as_mut() {
            pending.cycles -= 1;
            if pending.cycles == 0 {
                let mode = pending.mode;
                self.pending = None;
                return self.restart(mode);
            }
        }

        self.counter += 1;
        match self.mode {
            FrameMode::FourStep => self.tick_four_step(),
            FrameMode::FiveStep => self.tick_five_step(),
        }
    }

    fn restart(&mut self, mode: FrameMode) -> FrameEvents {
        if mode != self.mode {
            debug!(?mode, "frame sequencer mode change");
        }
        self.mode = mode;
        self.counter = 0;
        self.step = 0;
        // Selecting five-step mode clocks every unit immediately
        match mode {
            FrameMode::FiveStep => FrameEvents::BOTH,
            FrameMode::FourStep => FrameEvents::default(),
        }
    }

    fn tick_four_step(&mut self) -> FrameEvents {
        if self.counter < self.steps.0[self.step] {
            return FrameEvents::default();
        }
        let events = match self.step {
            0 | 2 => FrameEvents::QUARTER,
            1 => FrameEvents::BOTH,
            _ => {
                if !self.irq_inhibit {
                    self.irq_flag = true;
                }
                self.counter = 0;
                FrameEvents::BOTH
            }
        };
        self.step = (self.step + 1) % 4;
        events
    }

    fn tick_five_step(&mut self) -> FrameEvents {
        if self.counter < self.steps.1[self.step] {
            return FrameEvents::default();
        }
        let events = match self.step {
            0 | 2 => FrameEvents::QUARTER,
            1 => FrameEvents::BOTH,
            3 => FrameEvents::default(),
            _ => {
                self.counter = 0;
                FrameEvents::BOTH
            }
        };
        self.step = (self.step + 1) % 5;
        events
    }
}
