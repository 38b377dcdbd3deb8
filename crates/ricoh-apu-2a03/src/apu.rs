//! The APU proper: register decoding, channel clocking and resampling.

use emu_core::{Observable, Value};

use crate::channel::Channel;
use crate::dmc::Dmc;
use crate::frame::{FrameEvents, FrameMode, FrameSequencer};
use crate::mixer::{ChannelLevels, mix};
use crate::noise::Noise;
use crate::pulse::Pulse;
use crate::sweep::PulseUnit;
use crate::triangle::Triangle;
use crate::Region;

/// Ricoh 2A03 audio unit, ticked once per CPU cycle.
///
/// The triangle, noise and DMC timers run at the CPU rate; pulse timers
/// run every other cycle. Output is averaged over each output
/// sample period with an integer phase accumulator, so one emulated
/// second yields exactly `sample_rate` samples.
#[derive(Debug, Clone)]
pub struct Apu {
    pulse1: Pulse,
    pulse2: Pulse,
    triangle: Triangle,
    noise: Noise,
    dmc: Dmc,
    frame: FrameSequencer,
    /// Pulse channels step when set.
    odd_cycle: bool,
    cpu_hz: u64,
    sample_rate: u64,
    phase: u64,
    sum: f32,
    count: u32,
}

impl Apu {
    #[must_use]
    pub fn new(region: Region, sample_rate: u32) -> Self {
        Self {
            pulse1: Pulse::new(PulseUnit::One),
            pulse2: Pulse::new(PulseUnit::Two),
            triangle: Triangle::default(),
            noise: Noise::new(region),
            dmc: Dmc::new(region),
            frame: FrameSequencer::new(region),
            odd_cycle: false,
            cpu_hz: u64::from(region.cpu_hz()),
            sample_rate: u64::from(sample_rate),
            phase: 0,
            sum: 0.0,
            count: 0,
        }
    }

    /// Advance one CPU cycle. Returns a sample when an output sample
    /// period has elapsed.
    pub fn tick(&mut self) -> Option<f32> {
        self.triangle.step();
        self.noise.step();
        if self.odd_cycle {
            self.pulse1.step();
            self.pulse2.step();
        }
        self.odd_cycle = !self.odd_cycle;
        self.dmc.step();

        let events = self.frame.tick();
        self.apply(events);

        self.sum += mix(self.levels());
        self.count += 1;
        self.phase += self.sample_rate;
        if self.phase < self.cpu_hz {
            return None;
        }
        self.phase -= self.cpu_hz;
        #[allow(clippy::cast_precision_loss)]
        let sample = self.sum / self.count as f32;
        self.sum = 0.0;
        self.count = 0;
        Some(sample)
    }

    fn apply(&mut self, events: FrameEvents) {
        if events.quarter {
            self.pulse1.quarter_frame();
            self.pulse2.quarter_frame();
            self.triangle.quarter_frame();
            self.noise.quarter_frame();
        }
        if events.half {
            self.pulse1.half_frame();
            self.pulse2.half_frame();
            self.triangle.half_frame();
            self.noise.half_frame();
        }
    }

    #[must_use]
    pub fn levels(&self) -> ChannelLevels {
        ChannelLevels {
            pulse1: self.pulse1.level(),
            pulse2: self.pulse2.level(),
            triangle: self.triangle.level(),
            noise: self.noise.level(),
            dmc: self.dmc.level(),
        }
    }

    /// `$4015` as it would read, without clearing the frame IRQ.
    #[must_use]
    pub fn peek_status(&self) -> u8 {
        let mut status = 0;
        for (bit, active) in [
            self.pulse1.is_active(),
            self.pulse2.is_active(),
            self.triangle.is_active(),
            self.noise.is_active(),
            self.dmc.is_active(),
        ]
        .into_iter()
        .enumerate()
        {
            status |= u8::from(active) << bit;
        }
        status |= u8::from(self.frame.irq_flag()) << 6;
        status |= u8::from(self.dmc.irq_flag()) << 7;
        status
    }

    /// Register read. Only `$4015` is readable; it clears the frame IRQ.
    /// Returns `None` for write-only registers so the bus can apply its
    /// open-bus policy.
    pub fn read(&mut self, addr: u16) -> Option<u8> {
        if addr != 0x4015 {
            return None;
        }
        let status = self.peek_status();
        self.frame.clear_irq();
        Some(status)
    }

    /// Register write (`$4000-$4013`, `$4015`, `$4017`).
    pub fn write(&mut self, addr: u16, value: u8) {
        let register = (addr & 0x03) as u8;
        match addr {
            0x4000..=0x4003 => self.pulse1.write(register, value),
            0x4004..=0x4007 => self.pulse2.write(register, value),
            0x4008..=0x400B => self.triangle.write(register, value),
            0x400C..=0x400F => self.noise.write(register, value),
            0x4010..=0x4013 => self.dmc.write(register, value),
            0x4015 => {
                self.pulse1.set_enabled(value & 0x01 != 0);
                self.pulse2.set_enabled(value & 0x02 != 0);
                self.triangle.set_enabled(value & 0x04 != 0);
                self.noise.set_enabled(value & 0x08 != 0);
                self.dmc.set_enabled(value & 0x10 != 0);
                self.dmc.irq_flag = false;
            }
            0x4017 => self.frame.write(value, self.odd_cycle),
            _ => {}
        }
    }

    /// Frame or DMC interrupt asserted.
    #[must_use]
    pub fn irq_pending(&self) -> bool {
        self.frame.irq_flag() || self.dmc.irq_flag()
    }

    /// Address the DMC wants fetched, if its buffer is empty.
    #[must_use]
    pub fn dmc_dma_request(&self) -> Option<u16> {
        self.dmc.dma_request()
    }

    pub fn dmc_dma_complete(&mut self, byte: u8) {
        self.dmc.dma_complete(byte);
    }

    #[must_use]
    pub fn frame_mode(&self) -> FrameMode {
        self.frame.mode()
    }
}

impl Observable for Apu {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "pulse1.period" => Some(self.pulse1.period().into()),
            "pulse1.length" => Some(self.pulse1.length.counter.into()),
            "pulse1.envelope" => Some(self.pulse1.envelope.level().into()),
            "pulse1.duty" => Some(self.pulse1.duty().into()),
            "pulse2.period" => Some(self.pulse2.period().into()),
            "pulse2.length" => Some(self.pulse2.length.counter.into()),
            "pulse2.envelope" => Some(self.pulse2.envelope.level().into()),
            "pulse2.duty" => Some(self.pulse2.duty().into()),
            "triangle.period" => Some(self.triangle.period().into()),
            "triangle.length" => Some(self.triangle.length.counter.into()),
            "triangle.linear" => Some(self.triangle.linear_counter().into()),
            "noise.period" => Some(self.noise.period().into()),
            "noise.length" => Some(self.noise.length.counter.into()),
            "noise.envelope" => Some(self.noise.envelope.level().into()),
            "dmc.level" => Some(self.dmc.level().into()),
            "dmc.remaining" => Some(self.dmc.bytes_remaining().into()),
            "frame.mode" => Some(u8::from(self.frame.mode() == FrameMode::FiveStep).into()),
            "status" => Some(self.peek_status().into()),
            "irq" => Some(self.irq_pending().into()),
            "output" => Some(mix(self.levels()).into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pulse1.period",
            "pulse1.length",
            "pulse1.envelope",
            "pulse1.duty",
            "pulse2.period",
            "pulse2.length",
            "pulse2.envelope",
            "pulse2.duty",
            "triangle.period",
            "triangle.length",
            "triangle.linear",
            "noise.period",
            "noise.length",
            "noise.envelope",
            "dmc.level",
            "dmc.remaining",
            "frame.mode",
            "status",
            "irq",
            "output",
        ]
    }
}
